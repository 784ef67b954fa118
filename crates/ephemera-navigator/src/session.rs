//! Navigator session
//!
//! Composition root for one viewer: owns the [`TimeTravelMachine`], spawns
//! a fetch task for every ticket it issues, and publishes each resulting
//! [`NavigationState`] on a `watch` channel. Nothing else mutates the
//! state; subscribers only ever see snapshots.

use crate::clock::Clock;
use crate::keys::NavAction;
use crate::machine::{Commit, FetchTicket, TimeTravelMachine};
use crate::state::NavigationState;
use ephemera_context::{
    normalize_daily_context, CalendarDate, ContextError, ContextSource, NormalizedContext,
};
use ephemera_forge::AssetLookup;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

struct Shared {
    machine: Mutex<TimeTravelMachine>,
    source: Arc<dyn ContextSource>,
    assets: Option<Arc<dyn AssetLookup>>,
    updates: watch::Sender<NavigationState>,
}

impl Shared {
    /// Run `f` on the machine and publish the state it leaves behind
    fn with_machine<T>(&self, f: impl FnOnce(&mut TimeTravelMachine) -> T) -> T {
        let mut machine = self.machine.lock();
        let out = f(&mut machine);
        let snapshot = machine.state();
        // published under the lock so snapshots reach subscribers in order
        self.updates.send_if_modified(|current| {
            if current == snapshot {
                false
            } else {
                current.clone_from(snapshot);
                true
            }
        });
        out
    }

    fn is_current(&self, ticket: &FetchTicket) -> bool {
        let machine = self.machine.lock();
        machine.is_live() && machine.epoch() == ticket.epoch
    }

    async fn load(&self, ticket: &FetchTicket) -> Result<NormalizedContext, ContextError> {
        let context = self.source.daily_context(ticket.request_date).await?;

        if !self.is_current(ticket) {
            return Err(ContextError::Cancelled);
        }

        let model_url = match &self.assets {
            Some(assets) => match assets.completed_model_url(&context.context_id).await {
                Ok(url) => url,
                Err(e) => {
                    tracing::debug!(context_id = %context.context_id, error = %e, "no assets yet");
                    None
                }
            },
            None => None,
        };

        Ok(normalize_daily_context(&context, model_url.as_deref()))
    }
}

/// One viewer's navigation session
///
/// Must be started inside a tokio runtime. Dropping the session tears it
/// down and aborts outstanding fetches.
pub struct NavigatorSession {
    shared: Arc<Shared>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl NavigatorSession {
    /// Start at today and issue the initial fetch
    #[must_use]
    pub fn start(
        source: Arc<dyn ContextSource>,
        clock: Arc<dyn Clock>,
        assets: Option<Arc<dyn AssetLookup>>,
    ) -> Self {
        let (machine, ticket) = TimeTravelMachine::new(clock);
        let (updates, _rx) = watch::channel(machine.snapshot());
        let session = Self {
            shared: Arc::new(Shared {
                machine: Mutex::new(machine),
                source,
                assets,
                updates,
            }),
            tasks: Mutex::new(Vec::new()),
        };
        session.spawn_fetch(ticket);
        session
    }

    /// Receive every published state
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<NavigationState> {
        self.shared.updates.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> NavigationState {
        self.shared.machine.lock().snapshot()
    }

    /// One day back; false only at the start of the calendar or after shutdown
    pub fn prev(&self) -> bool {
        self.navigate(TimeTravelMachine::prev)
    }

    /// One day forward; false (and nothing happens) at today
    pub fn next(&self) -> bool {
        self.navigate(TimeTravelMachine::next)
    }

    pub fn go_to(&self, date: CalendarDate) -> bool {
        self.navigate(|m| m.go_to(date))
    }

    /// Deep-link entry; false when the date was rejected and the state is `Void`
    pub fn go_to_link(&self, raw: &str) -> bool {
        self.navigate(|m| m.go_to_link(raw))
    }

    pub fn go_to_today(&self) -> bool {
        self.navigate(TimeTravelMachine::go_to_today)
    }

    pub fn open_detail(&self) -> bool {
        self.shared.with_machine(TimeTravelMachine::open_detail)
    }

    pub fn close_detail(&self) -> bool {
        self.shared.with_machine(TimeTravelMachine::close_detail)
    }

    /// Pick up a new local day while the session stays open
    pub fn refresh_today(&self) -> bool {
        self.shared.with_machine(TimeTravelMachine::refresh_today)
    }

    /// Apply a bound action; true if it did anything
    pub fn dispatch(&self, action: NavAction) -> bool {
        tracing::debug!(?action, "dispatch");
        match action {
            NavAction::Prev => self.prev(),
            NavAction::Next => self.next(),
            NavAction::Today => self.go_to_today(),
            NavAction::GoTo(date) => self.go_to(date),
            NavAction::OpenDetail => self.open_detail(),
            NavAction::CloseDetail => self.close_detail(),
        }
    }

    /// Stop accepting results and abort in-flight fetches
    ///
    /// Navigation afterwards is refused: no request goes out and the last
    /// published state stays as it was.
    pub fn shutdown(&self) {
        self.shared.machine.lock().teardown();
        let tasks = std::mem::take(&mut *self.tasks.lock());
        if !tasks.is_empty() {
            tracing::debug!(count = tasks.len(), "aborting outstanding fetches");
        }
        for task in tasks {
            task.abort();
        }
    }

    fn navigate(&self, f: impl FnOnce(&mut TimeTravelMachine) -> Option<FetchTicket>) -> bool {
        match self.shared.with_machine(f) {
            Some(ticket) => {
                self.spawn_fetch(ticket);
                true
            }
            None => false,
        }
    }

    fn spawn_fetch(&self, ticket: FetchTicket) {
        let shared = Arc::clone(&self.shared);
        let task = tokio::spawn(async move {
            let result = shared.load(&ticket).await;
            match shared.with_machine(|m| m.commit(&ticket, result)) {
                Commit::Applied(status) => {
                    tracing::debug!(date = %ticket.date, %status, "published");
                }
                Commit::Discarded(reason) => {
                    tracing::debug!(date = %ticket.date, ?reason, "result discarded");
                }
            }
        });

        let mut tasks = self.tasks.lock();
        tasks.retain(|t| !t.is_finished());
        tasks.push(task);
    }
}

impl Drop for NavigatorSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl fmt::Debug for NavigatorSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigatorSession")
            .field("state", &self.snapshot())
            .field("pending", &self.tasks.lock().len())
            .finish_non_exhaustive()
    }
}
