//! Context client
//!
//! Fetches daily, historical and fossil contexts. One attempt per call:
//! no caching and no retries. Callers decide what a failure means.

use crate::config::{endpoints, ClientConfig};
use crate::date::CalendarDate;
use crate::error::ContextError;
use crate::transport::ApiTransport;
use crate::types::{DailyContext, FossilContext, HistoryContext};
use async_trait::async_trait;

/// Anything that can produce a daily context
///
/// The navigator depends on this seam rather than on HTTP so that sessions
/// can be driven by scripted sources in tests.
#[async_trait]
pub trait ContextSource: Send + Sync {
    /// Fetch the context for `date`, or for the service's own "today" when
    /// `date` is `None`
    async fn daily_context(&self, date: Option<CalendarDate>) -> Result<DailyContext, ContextError>;
}

/// HTTP client for the context endpoints
#[derive(Debug, Clone)]
pub struct ContextClient {
    transport: ApiTransport,
}

impl ContextClient {
    /// Create a client for the given configuration
    ///
    /// # Errors
    /// Returns error if the HTTP transport cannot be built
    pub fn new(config: ClientConfig) -> Result<Self, ContextError> {
        Ok(Self {
            transport: ApiTransport::new(config)?,
        })
    }

    /// Create a client sharing an existing transport
    #[inline]
    #[must_use]
    pub fn with_transport(transport: ApiTransport) -> Self {
        Self { transport }
    }

    /// Underlying transport
    #[inline]
    #[must_use]
    pub fn transport(&self) -> &ApiTransport {
        &self.transport
    }

    /// Fetch the daily context
    ///
    /// `None` asks for the service's notion of today, which may differ from
    /// the local calendar.
    ///
    /// # Errors
    /// - `NotFound` if the service has no content for the date
    /// - `Transport` on network, status or payload failure
    /// - `Timeout` if the request budget elapses
    #[tracing::instrument(skip(self))]
    pub async fn fetch_daily_context(
        &self,
        date: Option<CalendarDate>,
    ) -> Result<DailyContext, ContextError> {
        let query: Vec<(&str, String)> = date
            .map(|d| vec![("date", d.to_string())])
            .unwrap_or_default();
        let result: Result<DailyContext, ContextError> =
            self.transport.get_data(endpoints::DAILY, &query).await;
        match &result {
            Ok(ctx) => tracing::info!(context_id = %ctx.context_id, "daily context received"),
            Err(e) if e.is_not_found() => tracing::info!("no daily context for date"),
            Err(e) => tracing::warn!(error = %e, "daily context request failed"),
        }
        result
    }

    /// Fetch the context for a past year
    ///
    /// # Errors
    /// Same mapping as [`Self::fetch_daily_context`]
    #[tracing::instrument(skip(self))]
    pub async fn fetch_history_context(&self, year: i32) -> Result<HistoryContext, ContextError> {
        self.transport.get_data(&endpoints::history(year), &[]).await
    }

    /// Fetch the speculative context for a future year
    ///
    /// # Errors
    /// Same mapping as [`Self::fetch_daily_context`]
    #[tracing::instrument(skip(self))]
    pub async fn fetch_fossil_context(&self, year: i32) -> Result<FossilContext, ContextError> {
        self.transport.get_data(&endpoints::fossil(year), &[]).await
    }

    /// Whether the service answers its health endpoint with `OK`
    pub async fn health_check(&self) -> bool {
        match self.transport.get_text(endpoints::HEALTH).await {
            Ok(body) => body == "OK",
            Err(e) => {
                tracing::debug!(error = %e, "health check failed");
                false
            }
        }
    }
}

#[async_trait]
impl ContextSource for ContextClient {
    async fn daily_context(&self, date: Option<CalendarDate>) -> Result<DailyContext, ContextError> {
        self.fetch_daily_context(date).await
    }
}
