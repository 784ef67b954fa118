//! Wire types for the context service
//!
//! Field names match the service's JSON. Each record is an immutable
//! snapshot: a newer fetch supersedes it, nothing updates it in place.

use crate::date::CalendarDate;
use serde::{Deserialize, Serialize};

/// A single news headline and body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    /// Headline
    pub title: String,
    /// Body text
    pub content: String,
}

impl NewsItem {
    /// Create a news item
    #[inline]
    #[must_use]
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Context computed by the service for one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyContext {
    /// Opaque id used to correlate forge requests
    pub context_id: String,
    /// Day this context belongs to
    pub date: CalendarDate,
    /// Headlines in display order
    #[serde(default)]
    pub news: Vec<NewsItem>,
    /// Free-text summary
    #[serde(default)]
    pub philosophy: String,
    /// Display theme and generation prompt
    #[serde(default)]
    pub suggested_prompt: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Category tag on a historical event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryCategory {
    Politics,
    Technology,
    Culture,
    Economy,
    Science,
}

/// One event in a historical year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEvent {
    pub title: String,
    pub description: String,
    pub category: HistoryCategory,
}

/// Context for a past year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryContext {
    pub context_id: String,
    pub year: i32,
    pub year_display: String,
    #[serde(default)]
    pub events: Vec<HistoryEvent>,
    #[serde(default)]
    pub symbols: Vec<String>,
    pub synthesis: String,
    pub philosophy: String,
    pub suggested_prompt: String,
}

/// A speculative prediction about a future year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FossilPrediction {
    pub title: String,
    pub description: String,
}

/// Context for a future year, written as if excavated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FossilContext {
    pub context_id: String,
    pub year: i32,
    #[serde(default)]
    pub predictions: Vec<FossilPrediction>,
    #[serde(default)]
    pub symbols: Vec<String>,
    pub synthesis: String,
    pub philosophy: String,
    pub archaeologist_report: String,
    pub suggested_prompt: String,
}

/// Error payload returned by the service
///
/// Appears both as the body of non-2xx replies and nested under `error`
/// in 200 replies that carry an application-level failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub code: String,
    #[serde(default)]
    pub message: String,
}

impl ApiErrorBody {
    /// Code used by the service for "no content for this date"
    pub const NOT_FOUND: &'static str = "not_found";

    /// Whether this is the soft not-found signal
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.code == Self::NOT_FOUND
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn daily_context_decodes_service_json() {
        let json = r#"{
            "context_id": "ctx-42",
            "date": "2026-01-05",
            "news": [
                {"title": "first", "content": "a"},
                {"title": "second", "content": "b"}
            ],
            "philosophy": "all is flux",
            "suggested_prompt": "a glass hourglass"
        }"#;

        let ctx: DailyContext = serde_json::from_str(json).unwrap();
        assert_eq!(ctx.context_id, "ctx-42");
        assert_eq!(ctx.date.to_string(), "2026-01-05");
        assert_eq!(
            ctx.news,
            vec![NewsItem::new("first", "a"), NewsItem::new("second", "b")]
        );
        assert!(ctx.keywords.is_empty());
    }

    #[test]
    fn daily_context_rejects_bad_date() {
        let json = r#"{"context_id": "x", "date": "05/01/2026", "news": [], "philosophy": "", "suggested_prompt": ""}"#;
        assert!(serde_json::from_str::<DailyContext>(json).is_err());
    }

    #[test]
    fn history_category_is_lowercase_on_the_wire() {
        let event: HistoryEvent = serde_json::from_str(
            r#"{"title": "t", "description": "d", "category": "technology"}"#,
        )
        .unwrap();
        assert_eq!(event.category, HistoryCategory::Technology);
    }

    #[test]
    fn api_error_body_detects_not_found() {
        let body: ApiErrorBody = serde_json::from_str(r#"{"code": "not_found"}"#).unwrap();
        assert!(body.is_not_found());
        assert!(body.message.is_empty());

        let other = ApiErrorBody {
            code: "db_error".into(),
            message: "boom".into(),
        };
        assert!(!other.is_not_found());
    }
}
