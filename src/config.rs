use crate::constants::{
    BASE_URL, DEFAULT_POLL_ATTEMPTS, DEFAULT_POLL_DELAY_MS, DEFAULT_REQUEST_TIMEOUT_SECS,
};
use crate::errors::{AppError, AppResult};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Resolved client configuration with all values filled in (no Options).
///
/// All fields have concrete values, making it safe to access directly
/// without unwrapping. Can be deserialized from a TOML file; unknown keys
/// are rejected to catch typos.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Base URL of the remote API
    pub base_url: String,
    /// Maximum number of status checks before giving up on an export job
    pub poll_attempts: u32,
    /// Delay in milliseconds between consecutive status checks.
    /// Deliberate throttling; the status endpoint rate-limits aggressive
    /// back-to-back polling.
    pub poll_delay_ms: u64,
    /// Per-request timeout in seconds. Bulk archives can be large.
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            poll_attempts: DEFAULT_POLL_ATTEMPTS,
            poll_delay_ms: DEFAULT_POLL_DELAY_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Loads and validates configuration from a TOML file.
    ///
    /// Missing keys fall back to the defaults; unknown keys are rejected.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the TOML is malformed, unknown keys are
    /// present, or `poll_attempts` is zero.
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&contents)
            .map_err(|e| AppError::InvalidInput(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn validate(&self) -> AppResult<()> {
        if self.poll_attempts == 0 {
            return Err(AppError::InvalidInput(
                "Poll attempts must be greater than 0".into(),
            ));
        }
        // Catch malformed hosts before the first request is built
        url::Url::parse(&self.base_url)?;
        Ok(())
    }

    pub(crate) fn poll_delay(&self) -> Duration {
        Duration::from_millis(self.poll_delay_ms)
    }

    pub(crate) fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
