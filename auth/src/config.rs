//! CLI Configuration
//!
//! Loads configuration from environment variables.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the JSON fixture file (default: "fixtures.json")
    pub fixtures_path: PathBuf,

    /// Log filter used when `RUST_LOG` is unset (default: "`admin_auth=info`")
    pub log_filter: String,

    /// Emit JSON logs (default: true)
    pub log_json: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            fixtures_path: env::var("ADMIN_AUTH_FIXTURES")
                .map_or_else(|_| PathBuf::from("fixtures.json"), PathBuf::from),
            log_filter: env::var("ADMIN_AUTH_LOG_FILTER")
                .unwrap_or_else(|_| "admin_auth=info".into()),
            log_json: env::var("ADMIN_AUTH_LOG_JSON")
                .ok()
                .map(|v| v.trim().to_ascii_lowercase().parse::<bool>())
                .transpose()
                .context("ADMIN_AUTH_LOG_JSON must be true or false")?
                .unwrap_or(true),
        })
    }

    /// Create a default configuration for testing.
    #[must_use]
    pub fn default_for_test() -> Self {
        Self {
            fixtures_path: PathBuf::from("fixtures/demo.json"),
            log_filter: "admin_auth=debug".into(),
            log_json: false,
        }
    }
}
