//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the claim
//! configuration from a YAML file.

use std::fs;
use std::path::Path;

use crate::error::{ClaimError, ClaimResult};

use super::types::ClaimConfig;

/// Loads and provides access to the claim configuration.
///
/// The configuration file is a single YAML document; see `config/claim.yaml`
/// for the full set of keys:
///
/// ```text
/// rate: "455.00"
/// currency: "RM"
/// label: "Support On-Call Claim"
/// max_rows: 10
/// total_basis: rendered_rows
/// layout:
///   name_anchor: { x: 57.0, y: 56.0 }
///   ...
/// ```
///
/// # Example
///
/// ```no_run
/// use oncall_claim::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/claim.yaml").unwrap();
/// println!("Rate per period: {}", loader.config().rate);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: ClaimConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified YAML file.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - The file is missing or unreadable
    /// - The file contains invalid YAML or mistyped values
    ///
    /// # Example
    ///
    /// ```no_run
    /// use oncall_claim::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/claim.yaml")?;
    /// # Ok::<(), oncall_claim::error::ClaimError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> ClaimResult<Self> {
        let config = Self::load_yaml::<ClaimConfig>(path.as_ref())?;
        Ok(Self { config })
    }

    /// Loads the file when a path is given, otherwise falls back to defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> ClaimResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> ClaimResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| ClaimError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| ClaimError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the loaded claim configuration.
    pub fn config(&self) -> &ClaimConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> ClaimConfig {
        self.config
    }
}
