//! Ephemera Forge
//!
//! Turns a context's prompt into a 3D model:
//! - [`ForgeClient`]: create, status and asset endpoints
//! - [`ForgePoller`]: create-then-poll with a deadline and explicit cancellation
//! - [`completed_model_url`]: pick a finished model from a context's assets
//! - [`process_model_url`]: make generator URLs loadable through the proxy

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod assets;
pub mod client;
pub mod config;
pub mod error;
pub mod model_url;
pub mod poller;
pub mod types;

pub use assets::{completed_model_url, load_assets};
pub use client::{AssetLookup, ForgeApi, ForgeClient};
pub use config::ForgeConfig;
pub use error::ForgeError;
pub use model_url::{is_proxy_url, process_model_url, resolve_with_fallback, FALLBACK_MODEL_URL};
pub use poller::{CancelHandle, CancelToken, ForgePoller, ForgeProgress};
pub use types::{
    ForgeAsset, ForgeAssetsResponse, ForgeCreateRequest, ForgeCreateResponse, ForgePhase,
    ForgeStatus, ForgeStatusResponse,
};
