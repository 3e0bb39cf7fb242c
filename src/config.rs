//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use std::env;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend API configuration
    pub api: ApiConfig,
    /// Drive connection poller configuration
    pub poller: PollerConfig,
}

/// Backend API configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the course-assistant backend
    pub base_url: String,
    /// Per-request timeout (in seconds)
    pub request_timeout_secs: u64,
}

/// Drive connection poller configuration
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Delay between status checks (in milliseconds)
    pub interval_ms: u64,
    /// Maximum number of status checks before giving up
    pub max_attempts: u32,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            api: ApiConfig {
                base_url: env::var("COMPANION_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:5000".to_string()),
                request_timeout_secs: env::var("COMPANION_REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(30),
            },
            poller: PollerConfig {
                interval_ms: env::var("COMPANION_POLL_INTERVAL_MS")
                    .ok()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(2000),
                max_attempts: env::var("COMPANION_POLL_MAX_ATTEMPTS")
                    .ok()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(30),
            },
        }
    }
}

impl PollerConfig {
    /// Poll interval as a `Duration`
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}
