//! HTTP request execution configuration.
//!
//! This module defines configuration options for the HTTP client, derived
//! from the `[settings]` section of `.reqrc`.

use crate::config::Settings;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for HTTP request execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Request timeout in seconds.
    ///
    /// Maximum time to wait for a complete response (including connection,
    /// headers, and body download). Defaults to 30 seconds.
    pub timeout_secs: u64,

    /// Follow 3xx redirects, up to `max_redirects` hops.
    pub follow_redirects: bool,

    pub max_redirects: usize,

    /// Reject invalid, self-signed or expired certificates.
    pub validate_ssl: bool,

    /// User-Agent used when a request does not set its own.
    pub user_agent: String,
}

impl ExecutionConfig {
    /// Creates a configuration with the given timeout and default settings
    /// for everything else.
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            timeout_secs,
            ..Self::default()
        }
    }

    /// Returns the timeout as a `std::time::Duration`.
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for ExecutionConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            timeout_secs: settings.timeout,
            follow_redirects: settings.follow_redirects,
            max_redirects: settings.max_redirects,
            validate_ssl: settings.validate_ssl,
            user_agent: settings.user_agent.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_config_new() {
        let config = ExecutionConfig::new(60);
        assert_eq!(config.timeout_secs, 60);
        assert!(config.follow_redirects);
    }

    #[test]
    fn test_execution_config_default() {
        let config = ExecutionConfig::default();
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.max_redirects, 10);
    }

    #[test]
    fn test_timeout_duration() {
        let config = ExecutionConfig::new(45);
        assert_eq!(config.timeout_duration(), Duration::from_secs(45));
    }

    #[test]
    fn test_from_settings() {
        let settings = Settings {
            timeout: 3,
            validate_ssl: false,
            ..Settings::default()
        };
        let config = ExecutionConfig::from(&settings);
        assert_eq!(config.timeout_secs, 3);
        assert!(!config.validate_ssl);
    }
}
