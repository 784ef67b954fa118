//! Error types for the context client
//!
//! The taxonomy is deliberately small:
//! - `NotFound`: the service has no content for the requested date
//! - `Transport`: network failure, unexpected status or malformed payload
//! - `Timeout`: the request exceeded its time budget
//! - `Cancelled`: superseded by a newer request, never shown to users
//! - `InvalidDate`: a date string was rejected before any request was made

use crate::date::DateParseError;
use crate::types::ApiErrorBody;
use std::path::PathBuf;
use std::time::Duration;

/// Failure of a context request
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    /// No content exists for the requested date
    #[error("not found: {message}")]
    NotFound { message: String },

    /// Network failure, non-2xx status or undecodable payload
    #[error("transport error: {message}")]
    Transport {
        /// HTTP status, when a response was received
        status: Option<u16>,
        /// Service error code, when the body carried one
        code: Option<String>,
        message: String,
    },

    /// Request exceeded its time budget
    #[error("request timed out after {}ms", after.as_millis())]
    Timeout { after: Duration },

    /// Superseded or aborted
    #[error("request cancelled")]
    Cancelled,

    /// Date input rejected before any request
    #[error(transparent)]
    InvalidDate(#[from] DateParseError),
}

impl ContextError {
    /// Not-found error with the given message
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Transport error without a response
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            code: None,
            message: message.into(),
        }
    }

    /// Transport error built from a non-2xx reply
    pub fn from_status(status: u16, body: Option<ApiErrorBody>) -> Self {
        match body {
            Some(body) => Self::Transport {
                status: Some(status),
                code: Some(body.code),
                message: if body.message.is_empty() {
                    format!("HTTP {status}")
                } else {
                    body.message
                },
            },
            None => Self::Transport {
                status: Some(status),
                code: None,
                message: format!("HTTP {status}"),
            },
        }
    }

    /// Expected "no content for this date" outcome
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Whether a navigator should surface this error as VOID
    ///
    /// Everything except cancellation does; cancellations are swallowed.
    #[inline]
    #[must_use]
    pub fn collapses_to_void(&self) -> bool {
        !self.is_cancelled()
    }

    /// HTTP status, when one was observed
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

/// Errors while loading client configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A value is out of range or unusable
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
