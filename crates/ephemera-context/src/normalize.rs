//! Context normalization
//!
//! Presentation code consumes [`NormalizedContext`] instead of the wire
//! record so that backend field renames stay contained here.

use crate::date::CalendarDate;
use crate::types::{DailyContext, NewsItem};
use serde::{Deserialize, Serialize};

/// Stable view of a daily context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedContext {
    /// Correlates follow-on forge requests
    pub context_id: String,
    pub date: CalendarDate,
    /// Display theme
    pub theme: String,
    pub summary: String,
    /// Headlines in display order
    pub news_items: Vec<NewsItem>,
    /// Resolved model URL, empty when none is known yet
    pub model_url: String,
    /// Prompt for model generation
    pub generation_prompt: String,
}

impl NormalizedContext {
    /// Whether a model URL has been resolved
    #[inline]
    #[must_use]
    pub fn has_model(&self) -> bool {
        !self.model_url.is_empty()
    }
}

/// Adapt a wire context into its normalized form
///
/// `theme` and `generation_prompt` both come from `suggested_prompt`; they
/// stay separate fields so presentation can diverge later. A missing model
/// URL becomes an empty string; fallback substitution is left to the
/// presentation layer.
#[must_use]
pub fn normalize_daily_context(ctx: &DailyContext, model_url: Option<&str>) -> NormalizedContext {
    NormalizedContext {
        context_id: ctx.context_id.clone(),
        date: ctx.date,
        theme: ctx.suggested_prompt.clone(),
        summary: ctx.philosophy.clone(),
        news_items: ctx.news.clone(),
        model_url: model_url.unwrap_or_default().to_string(),
        generation_prompt: ctx.suggested_prompt.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn context() -> DailyContext {
        DailyContext {
            context_id: "ctx-1".into(),
            date: "2026-01-05".parse().unwrap(),
            news: vec![NewsItem::new("b", "2"), NewsItem::new("a", "1")],
            philosophy: "entropy wins".into(),
            suggested_prompt: "a rusted compass".into(),
            keywords: vec!["time".into()],
        }
    }

    #[test]
    fn theme_and_prompt_share_source() {
        let normalized = normalize_daily_context(&context(), None);
        assert_eq!(normalized.theme, "a rusted compass");
        assert_eq!(normalized.generation_prompt, "a rusted compass");
        assert_eq!(normalized.summary, "entropy wins");
        assert_eq!(normalized.date.to_string(), "2026-01-05");
    }

    #[test]
    fn news_order_is_preserved() {
        let normalized = normalize_daily_context(&context(), None);
        let titles: Vec<_> = normalized.news_items.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "a"]);
    }

    #[test]
    fn missing_model_url_passes_through_empty() {
        let normalized = normalize_daily_context(&context(), None);
        assert_eq!(normalized.model_url, "");
        assert!(!normalized.has_model());

        let with_model = normalize_daily_context(&context(), Some("https://cdn/m.glb"));
        assert_eq!(with_model.model_url, "https://cdn/m.glb");
        assert!(with_model.has_model());
    }
}
