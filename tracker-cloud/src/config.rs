//! Remote sync configuration.

use crate::error::{CloudError, CloudResult};
use serde::{Deserialize, Serialize};

pub const ENV_API_BASE_URL: &str = "TRACKER_API_BASE_URL";
pub const ENV_WRITE_SECRET: &str = "TRACKER_WRITE_SECRET";
pub const ENV_USE_REMOTE: &str = "TRACKER_USE_REMOTE";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "TRACKER_REQUEST_TIMEOUT_SECS";

/// Configuration for the remote gateway.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the entries proxy (e.g., "https://tracker.example.com").
    /// `None` disables remote sync entirely.
    pub api_base_url: Option<String>,

    /// Shared secret sent as `x-write-secret` on writes.
    pub write_secret: Option<String>,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Pull from the remote once at startup.
    pub auto_refresh: bool,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_base_url: None,
            write_secret: None,
            request_timeout_secs: 30,
            auto_refresh: false,
        }
    }
}

impl RemoteConfig {
    /// Reads the configuration from `TRACKER_*` environment variables.
    ///
    /// Unset or empty variables keep their defaults.
    pub fn from_env() -> CloudResult<Self> {
        let mut config = Self {
            api_base_url: env_var(ENV_API_BASE_URL),
            write_secret: env_var(ENV_WRITE_SECRET),
            ..Self::default()
        };
        if let Some(flag) = env_var(ENV_USE_REMOTE) {
            config.auto_refresh = parse_flag(&flag).ok_or_else(|| {
                CloudError::Config(format!("{ENV_USE_REMOTE} must be a boolean, got `{flag}`"))
            })?;
        }
        if let Some(timeout) = env_var(ENV_REQUEST_TIMEOUT_SECS) {
            config.request_timeout_secs = timeout.parse().map_err(|_| {
                CloudError::Config(format!(
                    "{ENV_REQUEST_TIMEOUT_SECS} must be a whole number of seconds, got `{timeout}`"
                ))
            })?;
        }
        Ok(config)
    }

    pub fn is_enabled(&self) -> bool {
        self.api_base_url.is_some()
    }

    /// Full URL of the entries endpoint, if a base URL is configured.
    pub fn entries_url(&self) -> Option<String> {
        self.api_base_url
            .as_deref()
            .map(|base| format!("{}/api/entries", base.trim_end_matches('/')))
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
