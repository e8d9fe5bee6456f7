//! Client configuration with environment overrides.
//!
//! Defaults match the storefront's static pages; every value can be overridden
//! through `CARTFLOW_*` environment variables (CLI) or by building a
//! [`ClientConfig`] directly (browser).

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

pub const DEFAULT_ORIGIN: &str = "http://127.0.0.1:8080";
pub const DEFAULT_API_BASE: &str = "/api";
pub const DEFAULT_REDIRECT_DELAY_MS: u64 = 1000;
pub const DEFAULT_NOTICE_TTL_MS: u64 = 3000;
pub const DEFAULT_MAX_NOTICES: usize = 5;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

/// Page paths the client links and redirects to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routes {
    pub home: String,
    pub login: String,
    pub register: String,
    pub admin: String,
    pub orders: String,
    pub cart: String,
}

impl Default for Routes {
    fn default() -> Self {
        Self {
            home: "/index.html".into(),
            login: "/login.html".into(),
            register: "/register.html".into(),
            admin: "/admin.html".into(),
            orders: "/order-list.html".into(),
            cart: "/cart.html".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Absolute origin used to resolve relative URLs outside the browser.
    pub origin: String,
    /// Prefix of every API endpoint.
    pub api_base: String,
    pub routes: Routes,
    pub redirect_delay: Duration,
    pub notice_ttl: Duration,
    /// `None` lets notices accumulate without bound.
    pub max_notices: Option<usize>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.into(),
            api_base: DEFAULT_API_BASE.into(),
            routes: Routes::default(),
            redirect_delay: Duration::from_millis(DEFAULT_REDIRECT_DELAY_MS),
            notice_ttl: Duration::from_millis(DEFAULT_NOTICE_TTL_MS),
            max_notices: Some(DEFAULT_MAX_NOTICES),
        }
    }
}

impl ClientConfig {
    /// Build config from the process environment.
    ///
    /// Optional:
    /// - `CARTFLOW_ORIGIN`: default `http://127.0.0.1:8080`
    /// - `CARTFLOW_API_BASE`: default `/api`
    /// - `CARTFLOW_REDIRECT_DELAY_MS`: default 1000
    /// - `CARTFLOW_NOTICE_TTL_MS`: default 3000
    /// - `CARTFLOW_MAX_NOTICES`: default 5, `0` for unbounded
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidNumber`] for malformed numeric values.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidNumber`] for malformed numeric values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let origin = lookup("CARTFLOW_ORIGIN")
            .map(|v| v.trim().trim_end_matches('/').to_owned())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.origin);
        let api_base = lookup("CARTFLOW_API_BASE")
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.api_base);

        let redirect_delay = parse_millis(&lookup, "CARTFLOW_REDIRECT_DELAY_MS", DEFAULT_REDIRECT_DELAY_MS)?;
        let notice_ttl = parse_millis(&lookup, "CARTFLOW_NOTICE_TTL_MS", DEFAULT_NOTICE_TTL_MS)?;
        let max_notices = match parse_u64(&lookup, "CARTFLOW_MAX_NOTICES")? {
            None => defaults.max_notices,
            Some(0) => None,
            Some(n) => Some(usize::try_from(n).unwrap_or(usize::MAX)),
        };

        Ok(Self { origin, api_base, routes: defaults.routes, redirect_delay, notice_ttl, max_notices })
    }
}

fn parse_u64(lookup: &impl Fn(&str) -> Option<String>, var: &'static str) -> Result<Option<u64>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { var, value: raw }),
    }
}

fn parse_millis(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: u64,
) -> Result<Duration, ConfigError> {
    Ok(Duration::from_millis(parse_u64(lookup, var)?.unwrap_or(default)))
}
