//! Reviewer roles and the acting reviewer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The four fixed reviewer roles of the monitoring approval flow.
///
/// Declaration order is the default flow order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewerRole {
    Leader,
    Supervisor,
    SectionHead,
    Manager,
}

impl ReviewerRole {
    pub const ALL: [ReviewerRole; 4] = [Self::Leader, Self::Supervisor, Self::SectionHead, Self::Manager];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Leader => "leader",
            Self::Supervisor => "supervisor",
            Self::SectionHead => "section_head",
            Self::Manager => "manager",
        }
    }

    /// Parse the wire name of a role. Accepts the snake_case form only.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "leader" => Some(Self::Leader),
            "supervisor" => Some(Self::Supervisor),
            "section_head" => Some(Self::SectionHead),
            "manager" => Some(Self::Manager),
            _ => None,
        }
    }
}

impl fmt::Display for ReviewerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who is performing an action.
///
/// An actor without a role is only meaningful as an admin; the request
/// extractor refuses requests that carry neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub role: Option<ReviewerRole>,
    pub admin: bool,
}

impl Actor {
    #[must_use]
    pub fn reviewer(role: ReviewerRole) -> Self {
        Self { role: Some(role), admin: false }
    }

    #[must_use]
    pub fn admin() -> Self {
        Self { role: None, admin: true }
    }

    /// True if this actor may act in the column of `role`.
    #[must_use]
    pub fn holds(&self, role: ReviewerRole) -> bool {
        self.admin || self.role == Some(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_every_wire_name() {
        for role in ReviewerRole::ALL {
            assert_eq!(ReviewerRole::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn parse_rejects_unknown_and_display_form() {
        assert_eq!(ReviewerRole::parse("Section Head"), None);
        assert_eq!(ReviewerRole::parse(""), None);
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&ReviewerRole::SectionHead).unwrap();
        assert_eq!(json, "\"section_head\"");
    }

    #[test]
    fn admin_holds_every_role() {
        let admin = Actor::admin();
        assert!(ReviewerRole::ALL.iter().all(|r| admin.holds(*r)));
    }

    #[test]
    fn reviewer_holds_only_own_role() {
        let actor = Actor::reviewer(ReviewerRole::Supervisor);
        assert!(actor.holds(ReviewerRole::Supervisor));
        assert!(!actor.holds(ReviewerRole::Leader));
        assert!(!actor.holds(ReviewerRole::Manager));
    }
}
