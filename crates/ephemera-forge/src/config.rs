//! Polling configuration

use ephemera_context::config::duration_ms;
use ephemera_context::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Delay between status polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);
/// Wall-clock limit on one polling run
pub const DEFAULT_MAX_POLL_DURATION: Duration = Duration::from_secs(300);

/// Forge poller configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    #[serde(rename = "poll_interval_ms", with = "duration_ms")]
    pub poll_interval: Duration,
    #[serde(rename = "max_poll_duration_ms", with = "duration_ms")]
    pub max_poll_duration: Duration,
}

impl ForgeConfig {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_max_poll_duration(mut self, limit: Duration) -> Self {
        self.max_poll_duration = limit;
        self
    }

    /// # Errors
    /// Returns error if either duration is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval.is_zero() {
            return Err(ConfigError::Invalid("poll_interval must be greater than zero".into()));
        }
        if self.max_poll_duration.is_zero() {
            return Err(ConfigError::Invalid(
                "max_poll_duration must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_poll_duration: DEFAULT_MAX_POLL_DURATION,
        }
    }
}
