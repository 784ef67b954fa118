//! Asset selection

use crate::client::ForgeApi;
use crate::types::{ForgeAsset, ForgeStatus};

/// Best URL of the first completed asset
///
/// Within an asset the curated `selected_url` wins over the mirror, which
/// wins over the generator origin.
#[must_use]
pub fn completed_model_url(assets: &[ForgeAsset]) -> Option<&str> {
    assets
        .iter()
        .find(|a| a.status == ForgeStatus::Completed)
        .and_then(|a| {
            a.selected_url
                .as_deref()
                .or(a.alist_url.as_deref())
                .or(a.tripo_url.as_deref())
        })
}

/// Assets for a context, empty when the listing fails
///
/// A context that never had a forge run is not an error for display.
pub async fn load_assets<A>(api: &A, context_id: &str) -> Vec<ForgeAsset>
where
    A: ForgeApi + ?Sized,
{
    match api.list_assets(context_id).await {
        Ok(listing) => listing.assets,
        Err(e) => {
            tracing::debug!(context_id, error = %e, "asset listing unavailable");
            Vec::new()
        }
    }
}
