//! Service settings read from the environment.

use std::path::PathBuf;

/// Default address the HTTP service listens on.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";

/// Environment-driven settings for the HTTP service.
///
/// | Variable                  | Meaning                                   |
/// |---------------------------|-------------------------------------------|
/// | `PAGERDUTY_SCHEDULE_NAME` | Schedule to query (empty matches any)     |
/// | `PDF_BUCKET_NAME`         | Bucket to upload generated claims to      |
/// | `AWS_REGION`              | Region of that bucket                     |
/// | `CLAIM_CONFIG_PATH`       | YAML claim configuration                  |
/// | `CLAIM_LISTEN_ADDR`       | Listen address, default `0.0.0.0:3000`    |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// PagerDuty schedule name query.
    pub schedule_name: String,
    /// Upload bucket, if uploads are enabled.
    pub bucket: Option<String>,
    /// Region of the upload bucket.
    pub region: Option<String>,
    /// Claim configuration file.
    pub config_path: Option<PathBuf>,
    /// HTTP listen address.
    pub listen_addr: String,
}

impl Settings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads settings through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.is_empty());

        Self {
            schedule_name: get("PAGERDUTY_SCHEDULE_NAME").unwrap_or_default(),
            bucket: get("PDF_BUCKET_NAME"),
            region: get("AWS_REGION"),
            config_path: get("CLAIM_CONFIG_PATH").map(PathBuf::from),
            listen_addr: get("CLAIM_LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string()),
        }
    }
}
