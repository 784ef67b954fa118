//! Shared HTTP plumbing
//!
//! Every service call goes through [`ApiTransport`], which adds the
//! application identifier header, bounds the whole exchange (send and body
//! read) by the configured budget, and translates replies into
//! [`ContextError`]:
//!
//! - HTTP 404 → `NotFound`
//! - HTTP 200 with `{ "error": { "code": "not_found", .. } }` → `NotFound`
//! - HTTP 200 with any other `error` code → `Transport`
//! - any other non-2xx → `Transport` carrying status, code and message
//! - undecodable body or missing `data` → `Transport`
//! - budget exceeded → `Timeout`

use crate::config::{ClientConfig, APP_ID_HEADER};
use crate::error::ContextError;
use crate::types::ApiErrorBody;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// HTTP transport bound to one service configuration
#[derive(Debug, Clone)]
pub struct ApiTransport {
    http: Client,
    config: Arc<ClientConfig>,
}

impl ApiTransport {
    /// Build a transport for the given configuration
    ///
    /// # Errors
    /// Returns `Transport` if the app id is not a valid header value or the
    /// underlying client cannot be constructed
    pub fn new(config: ClientConfig) -> Result<Self, ContextError> {
        let mut headers = HeaderMap::new();
        let app_id = HeaderValue::from_str(&config.app_id)
            .map_err(|e| ContextError::transport(format!("invalid app id header: {e}")))?;
        headers.insert(HeaderName::from_static("x-app-id"), app_id);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ContextError::transport(format!("failed to create HTTP client: {e}")))?;

        tracing::debug!(base_url = %config.base_url, header = APP_ID_HEADER, "transport ready");

        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Absolute URL for a route
    #[inline]
    #[must_use]
    pub fn url(&self, route: &str) -> String {
        self.config.url(route)
    }

    /// GET a route and unwrap its `data` envelope
    ///
    /// # Errors
    /// See the module documentation for the error mapping
    pub async fn get_data<T>(
        &self,
        route: &str,
        query: &[(&str, String)],
    ) -> Result<T, ContextError>
    where
        T: DeserializeOwned,
    {
        let url = self.url(route);
        tracing::debug!(%url, ?query, "GET");

        let mut request = self.http.get(&url);
        if !query.is_empty() {
            request = request.query(query);
        }

        within_budget(self.config.request_timeout, async move {
            let response = request.send().await.map_err(map_reqwest)?;
            decode_envelope(response).await
        })
        .await
    }

    /// POST a JSON body to a route and unwrap its `data` envelope
    ///
    /// # Errors
    /// See the module documentation for the error mapping
    pub async fn post_data<B, T>(&self, route: &str, body: &B) -> Result<T, ContextError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(route);
        tracing::debug!(%url, "POST");

        let request = self.http.post(&url).json(body);
        within_budget(self.config.request_timeout, async move {
            let response = request.send().await.map_err(map_reqwest)?;
            decode_envelope(response).await
        })
        .await
    }

    /// GET a route and return the raw body text
    ///
    /// # Errors
    /// Returns `Transport` on network failure and `Timeout` past the budget
    pub async fn get_text(&self, route: &str) -> Result<String, ContextError> {
        let request = self.http.get(self.url(route));
        within_budget(self.config.request_timeout, async move {
            let response = request.send().await.map_err(map_reqwest)?;
            response.text().await.map_err(map_reqwest)
        })
        .await
    }

    /// HEAD an absolute URL, true only for a 2xx reply within the probe budget
    pub async fn probe(&self, url: &str) -> bool {
        let request = self.http.head(url);
        let outcome = within_budget(self.config.probe_timeout, async move {
            request.send().await.map_err(map_reqwest)
        })
        .await;
        match outcome {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(%url, error = %e, "probe failed");
                false
            }
        }
    }
}

/// Run an exchange under a time budget; expiry drops the in-flight request
async fn within_budget<T, F>(budget: Duration, fut: F) -> Result<T, ContextError>
where
    F: Future<Output = Result<T, ContextError>>,
{
    tokio::time::timeout(budget, fut)
        .await
        .unwrap_or(Err(ContextError::Timeout { after: budget }))
}

fn map_reqwest(error: reqwest::Error) -> ContextError {
    ContextError::transport(error.to_string())
}

/// Pull an error body out of either `{ error: {..} }` or a bare `{ code, message }`
fn error_body(value: &Value) -> Option<ApiErrorBody> {
    let candidate = match value.get("error") {
        Some(inner) if inner.is_object() => inner,
        _ => value,
    };
    serde_json::from_value(candidate.clone()).ok()
}

async fn decode_envelope<T: DeserializeOwned>(response: Response) -> Result<T, ContextError> {
    let status = response.status();
    let bytes = response.bytes().await.map_err(map_reqwest)?;

    if !status.is_success() {
        let body = serde_json::from_slice::<Value>(&bytes)
            .ok()
            .and_then(|v| error_body(&v));
        if status == StatusCode::NOT_FOUND {
            let message = body
                .map(|b| b.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "no content available".to_string());
            return Err(ContextError::not_found(message));
        }
        tracing::warn!(status = status.as_u16(), "service returned an error status");
        return Err(ContextError::from_status(status.as_u16(), body));
    }

    let malformed = |detail: String| ContextError::Transport {
        status: Some(status.as_u16()),
        code: None,
        message: format!("malformed payload: {detail}"),
    };

    let mut value: Value = serde_json::from_slice(&bytes).map_err(|e| malformed(e.to_string()))?;

    if let Some(inner) = value.get("error").filter(|e| e.is_object()) {
        let body: ApiErrorBody =
            serde_json::from_value(inner.clone()).map_err(|e| malformed(e.to_string()))?;
        if body.is_not_found() {
            return Err(ContextError::not_found(body.message));
        }
        return Err(ContextError::from_status(status.as_u16(), Some(body)));
    }

    let data = value
        .get_mut("data")
        .map(Value::take)
        .ok_or_else(|| malformed("missing data field".to_string()))?;
    serde_json::from_value(data).map_err(|e| malformed(e.to_string()))
}
