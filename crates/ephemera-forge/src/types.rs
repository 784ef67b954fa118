//! Forge wire types and poller status

use serde::{Deserialize, Deserializer, Serialize};

/// Server-side status of a forge task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForgeStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl ForgeStatus {
    /// Completed or failed
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Request to generate a model for a context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgeCreateRequest {
    pub context_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl ForgeCreateRequest {
    /// Request for a context with no modifier or style
    #[inline]
    #[must_use]
    pub fn new(context_id: impl Into<String>) -> Self {
        Self {
            context_id: context_id.into(),
            modifier: None,
            style: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_modifier(mut self, modifier: impl Into<String>) -> Self {
        self.modifier = Some(modifier.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }
}

/// Reply to a create request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgeCreateResponse {
    pub task_id: String,
    pub status: ForgeStatus,
    #[serde(default)]
    pub message: String,
}

/// Snapshot of a task while it is polled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgeStatusResponse {
    pub task_id: String,
    pub status: ForgeStatus,
    #[serde(default)]
    pub tripo_url: Option<String>,
    #[serde(default)]
    pub alist_url: Option<String>,
    #[serde(default)]
    pub selected_url: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    /// Whole percent; fractional or out-of-range values are rounded and clamped
    #[serde(default, deserialize_with = "whole_percent")]
    pub progress_percent: u8,
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_percent<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0);
    if value.is_nan() {
        return Ok(0);
    }
    Ok(value.round().clamp(0.0, 100.0) as u8)
}

impl ForgeStatusResponse {
    /// Initial snapshot derived from a create reply, before any poll
    #[must_use]
    pub fn from_created(created: &ForgeCreateResponse) -> Self {
        Self {
            task_id: created.task_id.clone(),
            status: created.status,
            tripo_url: None,
            alist_url: None,
            selected_url: None,
            error_message: None,
            progress_percent: if created.status == ForgeStatus::Completed { 100 } else { 0 },
        }
    }
}

/// A generated asset attached to a context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgeAsset {
    pub task_id: String,
    pub status: ForgeStatus,
    #[serde(default)]
    pub tripo_url: Option<String>,
    #[serde(default)]
    pub alist_url: Option<String>,
    #[serde(default)]
    pub selected_url: Option<String>,
}

/// All assets known for a context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgeAssetsResponse {
    pub context_id: String,
    #[serde(default)]
    pub assets: Vec<ForgeAsset>,
}

/// Client-side phase of a forge run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ForgePhase {
    #[default]
    Idle,
    Creating,
    Polling,
    Completed,
    Failed,
}
