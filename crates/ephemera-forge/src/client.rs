//! Forge client
//!
//! [`ForgeApi`] is the seam the poller and the navigator session depend on;
//! [`ForgeClient`] implements it over HTTP using the shared context transport.

use crate::assets::completed_model_url;
use crate::error::ForgeError;
use crate::model_url::{process_model_url, resolve_with_fallback};
use crate::types::{ForgeAssetsResponse, ForgeCreateRequest, ForgeCreateResponse, ForgeStatusResponse};
use async_trait::async_trait;
use ephemera_context::config::endpoints;
use ephemera_context::{ApiTransport, ClientConfig};

/// Forge service operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ForgeApi: Send + Sync {
    /// Start generating a model for a context
    async fn create_task(&self, request: &ForgeCreateRequest)
        -> Result<ForgeCreateResponse, ForgeError>;

    /// Current status of a task
    async fn poll_status(&self, task_id: &str) -> Result<ForgeStatusResponse, ForgeError>;

    /// Assets generated so far for a context
    async fn list_assets(&self, context_id: &str) -> Result<ForgeAssetsResponse, ForgeError>;
}

/// Finds an already generated model for a context
#[async_trait]
pub trait AssetLookup: Send + Sync {
    /// URL of the first completed asset, if any
    async fn completed_model_url(&self, context_id: &str) -> Result<Option<String>, ForgeError>;
}

#[async_trait]
impl<T> AssetLookup for T
where
    T: ForgeApi + ?Sized,
{
    async fn completed_model_url(&self, context_id: &str) -> Result<Option<String>, ForgeError> {
        let listing = self.list_assets(context_id).await?;
        Ok(completed_model_url(&listing.assets).map(str::to_string))
    }
}

/// HTTP client for the forge endpoints
#[derive(Debug, Clone)]
pub struct ForgeClient {
    transport: ApiTransport,
}

impl ForgeClient {
    /// # Errors
    /// Returns error if the HTTP transport cannot be built
    pub fn new(config: ClientConfig) -> Result<Self, ForgeError> {
        Ok(Self {
            transport: ApiTransport::new(config).map_err(ForgeError::Context)?,
        })
    }

    /// Share a transport with a context client
    #[inline]
    #[must_use]
    pub fn with_transport(transport: ApiTransport) -> Self {
        Self { transport }
    }

    #[inline]
    #[must_use]
    pub fn transport(&self) -> &ApiTransport {
        &self.transport
    }

    /// HEAD a model URL within the probe budget
    pub async fn probe(&self, url: &str) -> bool {
        self.transport.probe(url).await
    }

    /// Mirror URL if it answers a probe, otherwise the proxied origin URL
    pub async fn resolve_model_url(&self, alist: Option<&str>, tripo: Option<&str>) -> String {
        let base = &self.transport.config().base_url;
        resolve_with_fallback(base, alist, tripo, |url| async move {
            self.transport.probe(&url).await
        })
        .await
    }

    /// Make a model URL loadable against this client's service
    #[must_use]
    pub fn process_model_url(&self, url: &str) -> String {
        process_model_url(url, &self.transport.config().base_url)
    }
}

#[async_trait]
impl ForgeApi for ForgeClient {
    #[tracing::instrument(skip(self, request), fields(context_id = %request.context_id))]
    async fn create_task(
        &self,
        request: &ForgeCreateRequest,
    ) -> Result<ForgeCreateResponse, ForgeError> {
        let created: ForgeCreateResponse =
            self.transport.post_data(endpoints::FORGE_CREATE, request).await?;
        tracing::info!(task_id = %created.task_id, status = ?created.status, "forge task created");
        Ok(created)
    }

    #[tracing::instrument(skip(self))]
    async fn poll_status(&self, task_id: &str) -> Result<ForgeStatusResponse, ForgeError> {
        Ok(self
            .transport
            .get_data(&endpoints::forge_status(task_id), &[])
            .await?)
    }

    #[tracing::instrument(skip(self))]
    async fn list_assets(&self, context_id: &str) -> Result<ForgeAssetsResponse, ForgeError> {
        Ok(self
            .transport
            .get_data(endpoints::FORGE_ASSETS, &[("context_id", context_id.to_string())])
            .await?)
    }
}
