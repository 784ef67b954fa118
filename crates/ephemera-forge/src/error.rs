//! Error types for forge operations

use ephemera_context::ContextError;
use std::time::Duration;

/// Code used when the service gives none
pub const DEFAULT_FORGE_CODE: &str = "forge_error";

/// Forge failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ForgeError {
    /// Service rejected the request
    #[error("forge api error [{code}]: {message}")]
    Api { code: String, message: String },

    /// Network failure or request timeout
    #[error(transparent)]
    Context(ContextError),

    /// Task reached the failed status
    #[error("forge task failed: {0}")]
    TaskFailed(String),

    /// Task did not finish within the polling deadline
    #[error("polling timed out after {}s", after.as_secs())]
    PollTimeout { after: Duration },

    /// Polling was cancelled by the caller
    #[error("forge polling cancelled")]
    Cancelled,
}

impl ForgeError {
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Whether the deadline or a request budget ran out
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::PollTimeout { .. })
            || matches!(self, Self::Context(e) if e.is_timeout())
    }
}

impl From<ContextError> for ForgeError {
    /// Replies the service actually sent become `Api`; everything else
    /// (network, budget, cancellation) keeps its context meaning.
    fn from(value: ContextError) -> Self {
        match value {
            ContextError::Transport {
                status: Some(_),
                code,
                message,
            } => Self::Api {
                code: code.unwrap_or_else(|| DEFAULT_FORGE_CODE.to_string()),
                message,
            },
            ContextError::NotFound { message } => Self::Api {
                code: "not_found".to_string(),
                message,
            },
            ContextError::Cancelled => Self::Cancelled,
            other => Self::Context(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_failures_become_api_errors() {
        let err = ForgeError::from(ContextError::from_status(502, None));
        assert_eq!(
            err,
            ForgeError::Api {
                code: DEFAULT_FORGE_CODE.into(),
                message: "HTTP 502".into()
            }
        );
    }

    #[test]
    fn network_failures_stay_context_errors() {
        let err = ForgeError::from(ContextError::transport("connection refused"));
        assert!(matches!(err, ForgeError::Context(_)));

        let timeout = ForgeError::from(ContextError::Timeout {
            after: Duration::from_secs(10),
        });
        assert!(timeout.is_timeout());
    }

    #[test]
    fn cancellation_maps_through() {
        assert!(ForgeError::from(ContextError::Cancelled).is_cancelled());
    }
}
