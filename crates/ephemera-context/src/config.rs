//! Client configuration
//!
//! Defaults point at the production service. Values can be read from a
//! TOML file and overridden from the environment:
//!
//! ```toml
//! [client]
//! base_url = "https://api.sruim.xin"
//! app_id = "..."
//! request_timeout_ms = 10000
//! probe_timeout_ms = 5000
//! ```
//!
//! | Variable | Field |
//! |---|---|
//! | `EPHEMERA_API_BASE` | `base_url` |
//! | `EPHEMERA_APP_ID` | `app_id` |
//! | `EPHEMERA_TIMEOUT_MS` | `request_timeout` |

use crate::error::ConfigError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Production service root
pub const DEFAULT_BASE_URL: &str = "https://api.sruim.xin";
/// Application identifier sent with every request
pub const DEFAULT_APP_ID: &str = "204bb605-dd38-4c3b-90b5-d1055310051b";
/// Per-request budget
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Budget for HEAD probes of model URLs
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Header carrying the application identifier
pub const APP_ID_HEADER: &str = "X-App-ID";

/// Service routes, relative to the base URL
pub mod endpoints {
    pub const DAILY: &str = "/api/context/daily";
    pub const FORGE_CREATE: &str = "/api/forge/create";
    pub const FORGE_ASSETS: &str = "/api/forge/assets";
    pub const PROXY_MODEL: &str = "/api/proxy-model";
    pub const HEALTH: &str = "/health";

    #[must_use]
    pub fn history(year: i32) -> String {
        format!("/api/context/history/{year}")
    }

    #[must_use]
    pub fn fossil(year: i32) -> String {
        format!("/api/context/fossil/{year}")
    }

    #[must_use]
    pub fn forge_status(task_id: &str) -> String {
        format!("/api/forge/status/{task_id}")
    }
}

/// Serde adapter storing a [`Duration`] as integer milliseconds
pub mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Service root, without trailing slash
    pub base_url: String,
    /// Value of the application identifier header
    pub app_id: String,
    /// Per-request budget
    #[serde(rename = "request_timeout_ms", with = "duration_ms")]
    pub request_timeout: Duration,
    /// Budget for model URL HEAD probes
    #[serde(rename = "probe_timeout_ms", with = "duration_ms")]
    pub probe_timeout: Duration,
}

impl ClientConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With service root
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// With application identifier
    #[inline]
    #[must_use]
    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = app_id.into();
        self
    }

    /// With per-request timeout
    #[inline]
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// With probe timeout
    #[inline]
    #[must_use]
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Absolute URL for a service route
    #[must_use]
    pub fn url(&self, route: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), route)
    }

    /// Apply `EPHEMERA_*` overrides from a key lookup such as the environment
    ///
    /// # Errors
    /// Returns error if the timeout override is not an integer
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base) = lookup("EPHEMERA_API_BASE") {
            self = self.with_base_url(base);
        }
        if let Some(app_id) = lookup("EPHEMERA_APP_ID") {
            self.app_id = app_id;
        }
        if let Some(raw) = lookup("EPHEMERA_TIMEOUT_MS") {
            let ms: u64 = raw.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("EPHEMERA_TIMEOUT_MS must be an integer, got '{raw}'"))
            })?;
            self.request_timeout = Duration::from_millis(ms);
        }
        Ok(self)
    }

    /// Check that values are usable
    ///
    /// # Errors
    /// Returns error for an unparsable or non-HTTP base URL, an empty app
    /// id, or a zero timeout
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = url::Url::parse(&self.base_url)
            .map_err(|e| ConfigError::Invalid(format!("base_url '{}': {e}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "base_url '{}' must use http or https",
                self.base_url
            )));
        }
        if self.app_id.trim().is_empty() {
            return Err(ConfigError::Invalid("app_id must not be empty".into()));
        }
        if self.request_timeout.is_zero() || self.probe_timeout.is_zero() {
            return Err(ConfigError::Invalid("timeouts must be greater than zero".into()));
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            app_id: DEFAULT_APP_ID.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

/// Read and deserialize a TOML file
///
/// # Errors
/// Returns `ConfigError::Io` if the file cannot be read and
/// `ConfigError::Parse` if it does not match `T`
pub fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
