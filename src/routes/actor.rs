//! Reviewer identity extractor.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::ApiError;
use crate::workflow::role::{Actor, ReviewerRole};

pub const ROLE_HEADER: &str = "x-reviewer-role";
pub const ADMIN_HEADER: &str = "x-reviewer-admin";

// =============================================================================
// ACTOR EXTRACTOR
// =============================================================================

/// Acting reviewer taken from the `x-reviewer-role` / `x-reviewer-admin`
/// headers. Use as a handler parameter to require an identity.
#[derive(Debug, Clone, Copy)]
pub struct ReviewerActor(pub Actor);

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

impl<S> FromRequestParts<S> for ReviewerActor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let role = match header(parts, ROLE_HEADER) {
            Some(raw) => Some(
                ReviewerRole::parse(raw).ok_or_else(|| ApiError::bad_request(format!("unknown reviewer role: {raw}")))?,
            ),
            None => None,
        };
        let admin = match header(parts, ADMIN_HEADER) {
            Some(raw) => match raw.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => return Err(ApiError::bad_request(format!("invalid {ADMIN_HEADER} value: {raw}"))),
            },
            None => false,
        };

        if role.is_none() && !admin {
            return Err(ApiError::unauthorized(format!("{ROLE_HEADER} or {ADMIN_HEADER} header required")));
        }
        Ok(Self(Actor { role, admin }))
    }
}

#[cfg(test)]
#[path = "actor_test.rs"]
mod tests;
