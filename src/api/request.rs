//! Request types for the claim service.

use serde::{Deserialize, Serialize};

use super::response::ApiError;

/// Header carrying the PagerDuty API key.
pub const AUTH_TOKEN_HEADER: &str = "x-pagerduty-auth-token";

/// Query string of `GET /claims`.
///
/// Both bounds are optional at the type level so a missing one is reported
/// as a validation error rather than a generic rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClaimQueryParams {
    /// Start of the window, e.g. `now-1mo`.
    #[serde(default)]
    pub since: Option<String>,
    /// End of the window, e.g. `now`.
    #[serde(default)]
    pub until: Option<String>,
}

/// A validated claim window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimWindow {
    /// Start expression.
    pub since: String,
    /// End expression.
    pub until: String,
}

impl ClaimQueryParams {
    /// Returns the window, or a validation error naming the first missing
    /// bound. Blank values count as missing.
    pub fn validate(self) -> Result<ClaimWindow, ApiError> {
        let since = required(self.since, "since")?;
        let until = required(self.until, "until")?;
        Ok(ClaimWindow { since, until })
    }
}

fn required(value: Option<String>, name: &str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::missing_field(name)),
    }
}
