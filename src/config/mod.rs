//! Configuration loading and management for the claim generator.
//!
//! Claim form settings (rate, row cap, layout anchors) come from a YAML file
//! via [`ConfigLoader`]; service wiring (schedule, bucket, listen address)
//! comes from the environment via [`Settings`].
//!
//! # Example
//!
//! ```no_run
//! use oncall_claim::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/claim.yaml").unwrap().into_config();
//! println!("Claiming {} {} per period", config.currency, config.rate);
//! ```

mod loader;
mod settings;
mod types;

pub use loader::ConfigLoader;
pub use settings::{DEFAULT_LISTEN_ADDR, Settings};
pub use types::{
    Anchor, ClaimConfig, DEFAULT_CURRENCY, DEFAULT_LABEL, DEFAULT_MAX_ROWS, DEFAULT_RATE,
    LayoutConfig, TotalBasis,
};
