//! Cancellable forge polling
//!
//! A run moves through `Creating`, then `Polling` on a fixed interval until
//! the task reaches a terminal status, the wall-clock deadline passes, or the
//! caller cancels. Cancellation interrupts any in-flight request or sleep and
//! returns the poller to `Idle` rather than `Failed`.

use crate::client::ForgeApi;
use crate::config::ForgeConfig;
use crate::error::ForgeError;
use crate::types::{ForgeCreateRequest, ForgePhase, ForgeStatus, ForgeStatusResponse};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::Instant;

/// Message used when a failed task carries none
pub const DEFAULT_FAILURE_MESSAGE: &str = "Forge failed";

/// Owner side of a cancellation signal
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Signal every token; idempotent
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    #[must_use]
    pub fn token(&self) -> CancelToken {
        CancelToken {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Observer side of a cancellation signal
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// Resolves once cancelled
    ///
    /// If every handle is dropped without cancelling, nothing can cancel any
    /// more and this never resolves.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Run `fut` unless cancellation arrives first
    async fn guard<T, F>(&self, fut: F) -> Result<T, ForgeError>
    where
        F: Future<Output = Result<T, ForgeError>>,
    {
        tokio::select! {
            biased;
            () = self.cancelled() => Err(ForgeError::Cancelled),
            out = fut => out,
        }
    }
}

/// Observable state of the current run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForgeProgress {
    pub phase: ForgePhase,
    /// Latest task snapshot
    pub task: Option<ForgeStatusResponse>,
    /// Display text of the last failure
    pub error: Option<String>,
}

/// Drives a forge task from creation to a terminal status
pub struct ForgePoller {
    api: Arc<dyn ForgeApi>,
    config: ForgeConfig,
    progress: watch::Sender<ForgeProgress>,
}

impl ForgePoller {
    #[must_use]
    pub fn new(api: Arc<dyn ForgeApi>, config: ForgeConfig) -> Self {
        let (progress, _rx) = watch::channel(ForgeProgress::default());
        Self {
            api,
            config,
            progress,
        }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &ForgeConfig {
        &self.config
    }

    /// Follow phase and task changes
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ForgeProgress> {
        self.progress.subscribe()
    }

    /// Current progress snapshot
    #[must_use]
    pub fn progress(&self) -> ForgeProgress {
        self.progress.borrow().clone()
    }

    /// Create a task and poll it to completion
    ///
    /// # Errors
    /// - `Cancelled` if `cancel` fires first (phase returns to `Idle`)
    /// - `TaskFailed` if the task reports `failed`
    /// - `PollTimeout` past the configured deadline
    /// - `Api` / `Context` for service or network failures
    #[tracing::instrument(skip(self, request, cancel), fields(context_id = %request.context_id))]
    pub async fn forge(
        &self,
        request: &ForgeCreateRequest,
        cancel: &CancelToken,
    ) -> Result<ForgeStatusResponse, ForgeError> {
        self.progress.send_modify(|p| {
            p.phase = ForgePhase::Creating;
            p.task = None;
            p.error = None;
        });

        let outcome = self.run(request, cancel).await;

        match &outcome {
            Ok(task) => {
                tracing::info!(task_id = %task.task_id, "forge completed");
                self.progress.send_modify(|p| {
                    p.phase = ForgePhase::Completed;
                    p.task = Some(task.clone());
                });
            }
            Err(e) if e.is_cancelled() => {
                tracing::info!("forge cancelled");
                self.progress.send_modify(|p| p.phase = ForgePhase::Idle);
            }
            Err(e) => {
                tracing::warn!(error = %e, "forge failed");
                self.progress.send_modify(|p| {
                    p.phase = ForgePhase::Failed;
                    p.error = Some(e.to_string());
                });
            }
        }
        outcome
    }

    async fn run(
        &self,
        request: &ForgeCreateRequest,
        cancel: &CancelToken,
    ) -> Result<ForgeStatusResponse, ForgeError> {
        if cancel.is_cancelled() {
            return Err(ForgeError::Cancelled);
        }
        let created = cancel.guard(self.api.create_task(request)).await?;
        let initial = ForgeStatusResponse::from_created(&created);
        self.publish_task(&initial);

        if created.status == ForgeStatus::Completed {
            return Ok(initial);
        }
        self.poll(&created.task_id, cancel).await
    }

    async fn poll(
        &self,
        task_id: &str,
        cancel: &CancelToken,
    ) -> Result<ForgeStatusResponse, ForgeError> {
        let started = Instant::now();
        self.progress.send_modify(|p| p.phase = ForgePhase::Polling);

        loop {
            if cancel.is_cancelled() {
                return Err(ForgeError::Cancelled);
            }

            let status = cancel.guard(self.api.poll_status(task_id)).await?;
            self.publish_task(&status);
            tracing::debug!(
                task_id,
                status = ?status.status,
                progress = status.progress_percent,
                "forge status"
            );

            match status.status {
                ForgeStatus::Completed => return Ok(status),
                ForgeStatus::Failed => {
                    let message = status
                        .error_message
                        .filter(|m| !m.is_empty())
                        .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());
                    return Err(ForgeError::TaskFailed(message));
                }
                ForgeStatus::Pending | ForgeStatus::Processing => {}
            }

            if started.elapsed() > self.config.max_poll_duration {
                tracing::warn!(task_id, "forge polling deadline passed");
                return Err(ForgeError::PollTimeout {
                    after: self.config.max_poll_duration,
                });
            }

            cancel
                .guard(async {
                    tokio::time::sleep(self.config.poll_interval).await;
                    Ok(())
                })
                .await?;
        }
    }

    fn publish_task(&self, task: &ForgeStatusResponse) {
        let task = task.clone();
        self.progress.send_modify(|p| p.task = Some(task));
    }
}

impl std::fmt::Debug for ForgePoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForgePoller")
            .field("config", &self.config)
            .field("progress", &*self.progress.borrow())
            .finish_non_exhaustive()
    }
}
