//! Testing utilities for the Ephemera workspace
//!
//! Shared fixtures and scripted fakes for the context and forge seams.

#![allow(missing_docs)]
#![allow(clippy::missing_panics_doc)]

use async_trait::async_trait;
use ephemera_context::{CalendarDate, ContextError, ContextSource, DailyContext, NewsItem};
use ephemera_forge::{
    ForgeApi, ForgeAsset, ForgeAssetsResponse, ForgeCreateRequest, ForgeCreateResponse, ForgeError,
    ForgeStatus, ForgeStatusResponse,
};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use tokio::sync::oneshot;

pub type DailyResult = Result<DailyContext, ContextError>;

/// Parse a `YYYY-MM-DD` literal
pub fn date(s: &str) -> CalendarDate {
    s.parse().unwrap()
}

/// A complete daily context for `date`
pub fn daily_context(date: CalendarDate) -> DailyContext {
    DailyContext {
        context_id: format!("ctx-{date}"),
        date,
        news: vec![
            NewsItem::new("Tide tables revised", "The sea keeps its own calendar."),
            NewsItem::new("Archive reopens", "Dust settles on new shelves."),
        ],
        philosophy: "What is kept is changed by keeping.".to_string(),
        suggested_prompt: format!("a weathered hourglass, {date}"),
        keywords: vec!["time".to_string(), "sand".to_string()],
    }
}

/// A completed asset with only a curated URL
pub fn completed_asset(task_id: &str, url: &str) -> ForgeAsset {
    ForgeAsset {
        task_id: task_id.to_string(),
        status: ForgeStatus::Completed,
        tripo_url: None,
        alist_url: None,
        selected_url: Some(url.to_string()),
    }
}

enum Reply {
    Ready(DailyResult),
    Held(oneshot::Receiver<DailyResult>),
}

/// Handle for a response the source is holding back
#[derive(Debug)]
pub struct HeldReply {
    tx: oneshot::Sender<DailyResult>,
}

impl HeldReply {
    /// Let the waiting request complete with `result`
    pub fn release(self, result: DailyResult) {
        let _ = self.tx.send(result);
    }
}

/// [`ContextSource`] answering from a script keyed by request date
///
/// `None` keys today's (undated) requests. Replies for a key are used in
/// the order they were scripted; an unscripted request gets `NotFound`.
/// Held replies let a test choose when, and in which order, in-flight
/// requests complete.
#[derive(Default)]
pub struct ScriptedContextSource {
    replies: Mutex<HashMap<Option<CalendarDate>, VecDeque<Reply>>>,
    requests: Mutex<Vec<Option<CalendarDate>>>,
}

impl ScriptedContextSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer the next request for `key` immediately
    pub fn respond(&self, key: Option<CalendarDate>, result: DailyResult) -> &Self {
        self.replies
            .lock()
            .entry(key)
            .or_default()
            .push_back(Reply::Ready(result));
        self
    }

    /// Answer the next request for `key` with a context for `date`
    pub fn respond_ok(&self, key: Option<CalendarDate>, date: CalendarDate) -> &Self {
        self.respond(key, Ok(daily_context(date)))
    }

    /// Block the next request for `key` until the returned handle is released
    ///
    /// Dropping the handle completes the request as `Cancelled`.
    pub fn hold(&self, key: Option<CalendarDate>) -> HeldReply {
        let (tx, rx) = oneshot::channel();
        self.replies
            .lock()
            .entry(key)
            .or_default()
            .push_back(Reply::Held(rx));
        HeldReply { tx }
    }

    /// Every request received so far, in arrival order
    pub fn requests(&self) -> Vec<Option<CalendarDate>> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl ContextSource for ScriptedContextSource {
    async fn daily_context(&self, date: Option<CalendarDate>) -> DailyResult {
        self.requests.lock().push(date);
        let reply = self.replies.lock().get_mut(&date).and_then(VecDeque::pop_front);
        match reply {
            Some(Reply::Ready(result)) => result,
            Some(Reply::Held(rx)) => rx.await.unwrap_or(Err(ContextError::Cancelled)),
            None => Err(ContextError::not_found("unscripted request")),
        }
    }
}

/// [`ForgeApi`] serving fixed asset listings
///
/// Creation and polling complete at once; listing a context that was never
/// registered fails the way the service does for an unknown context.
#[derive(Debug, Default)]
pub struct StaticForge {
    assets: HashMap<String, Vec<ForgeAsset>>,
}

impl StaticForge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_assets(mut self, context_id: &str, assets: Vec<ForgeAsset>) -> Self {
        self.assets.insert(context_id.to_string(), assets);
        self
    }
}

#[async_trait]
impl ForgeApi for StaticForge {
    async fn create_task(
        &self,
        request: &ForgeCreateRequest,
    ) -> Result<ForgeCreateResponse, ForgeError> {
        Ok(ForgeCreateResponse {
            task_id: format!("task-{}", request.context_id),
            status: ForgeStatus::Completed,
            message: String::new(),
        })
    }

    async fn poll_status(&self, task_id: &str) -> Result<ForgeStatusResponse, ForgeError> {
        Ok(ForgeStatusResponse {
            task_id: task_id.to_string(),
            status: ForgeStatus::Completed,
            tripo_url: None,
            alist_url: None,
            selected_url: None,
            error_message: None,
            progress_percent: 100,
        })
    }

    async fn list_assets(&self, context_id: &str) -> Result<ForgeAssetsResponse, ForgeError> {
        match self.assets.get(context_id) {
            Some(assets) => Ok(ForgeAssetsResponse {
                context_id: context_id.to_string(),
                assets: assets.clone(),
            }),
            None => Err(ForgeError::Api {
                code: "not_found".to_string(),
                message: format!("no assets for {context_id}"),
            }),
        }
    }
}
