//! Service configuration parsed from environment variables.

use std::path::PathBuf;

use crate::listing::{DEFAULT_MAX_PAGE_SIZE, DEFAULT_PAGE_SIZE};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    /// Enables the Postgres work order store when set.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    /// JSON schedule file; the built-in seed schedule is used when unset.
    pub schedule_path: Option<PathBuf>,
    pub page_size: usize,
    pub max_page_size: usize,
    pub cors_allow_any: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: None,
            database_max_connections: DEFAULT_DATABASE_MAX_CONNECTIONS,
            schedule_path: None,
            page_size: DEFAULT_PAGE_SIZE,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            cors_allow_any: true,
        }
    }
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `DATABASE_URL`: Postgres work order store when present
    /// - `DATABASE_MAX_CONNECTIONS`: default 5
    /// - `SCHEDULE_PATH`: JSON schedule file
    /// - `AUDIT_PAGE_SIZE`: default 20
    /// - `AUDIT_MAX_PAGE_SIZE`: default 100
    /// - `CORS_ALLOW_ANY`: default true
    ///
    /// Unparseable values fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let max_page_size = env_parse("AUDIT_MAX_PAGE_SIZE", DEFAULT_MAX_PAGE_SIZE).max(1);
        Self {
            port: env_parse("PORT", DEFAULT_PORT),
            database_url: env_non_empty("DATABASE_URL"),
            database_max_connections: env_parse("DATABASE_MAX_CONNECTIONS", DEFAULT_DATABASE_MAX_CONNECTIONS),
            schedule_path: env_non_empty("SCHEDULE_PATH").map(PathBuf::from),
            page_size: env_parse("AUDIT_PAGE_SIZE", DEFAULT_PAGE_SIZE).clamp(1, max_page_size),
            max_page_size,
            cors_allow_any: env_bool("CORS_ALLOW_ANY").unwrap_or(true),
        }
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
