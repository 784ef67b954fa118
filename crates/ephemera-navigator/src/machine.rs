//! Time-travel state machine
//!
//! Synchronous core of a navigation session. Every date change enters
//! `Loading` and hands out a [`FetchTicket`] stamped with a fresh liveness
//! epoch; a fetch result is committed only if its ticket still carries the
//! current epoch. Late results for superseded dates are thereby dropped
//! without touching state, whatever order the network delivers them in.
//!
//! ```text
//!             date change
//!   ┌──────────────────────────────┐
//!   ▼                              │
//! Loading ──commit(Ok)──▶ Success ─┤
//!   │                              │
//!   └────commit(Err)────▶ Void ────┘
//! ```

use crate::clock::Clock;
use crate::state::{NavigationState, Status, ViewMode};
use ephemera_context::{CalendarDate, ContextError, NormalizedContext};
use std::sync::Arc;

/// Permission to commit the result of one fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    /// Liveness epoch at issue time
    pub epoch: u64,
    /// Date the fetch is for
    pub date: CalendarDate,
    /// Date to send to the service; `None` asks for the service's own today
    pub request_date: Option<CalendarDate>,
}

/// Why a commit changed nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscardReason {
    /// A later date change replaced the ticket
    Superseded,
    /// The session was torn down
    TornDown,
    /// The fetch was cancelled rather than failed
    Cancelled,
    /// A result was already committed for this ticket
    Settled,
}

/// Outcome of [`TimeTravelMachine::commit`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Commit {
    Applied(Status),
    Discarded(DiscardReason),
}

impl Commit {
    #[inline]
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// Date selection and load status for one session
#[derive(Debug)]
pub struct TimeTravelMachine {
    clock: Arc<dyn Clock>,
    state: NavigationState,
    epoch: u64,
    live: bool,
}

impl TimeTravelMachine {
    /// Start at today, loading
    ///
    /// The returned ticket is the initial fetch.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> (Self, FetchTicket) {
        let today = clock.today();
        let mut machine = Self {
            clock,
            state: NavigationState::loading(today),
            epoch: 0,
            live: true,
        };
        let ticket = machine.select(today);
        (machine, ticket)
    }

    /// Step one calendar day back
    ///
    /// Always permitted while live; `None` only at the earliest
    /// representable date.
    pub fn prev(&mut self) -> Option<FetchTicket> {
        let target = self.state.selected_date.prev_day();
        if target == self.state.selected_date {
            return None;
        }
        self.change_date(target)
    }

    /// Step one calendar day forward
    ///
    /// Today is the end of the timeline: `None` and no state change there.
    pub fn next(&mut self) -> Option<FetchTicket> {
        if self.state.is_today {
            return None;
        }
        let target = self.state.selected_date.next_day();
        if target == self.state.selected_date {
            return None;
        }
        self.change_date(target)
    }

    /// Select `date`; `None` only once torn down
    pub fn go_to(&mut self, date: CalendarDate) -> Option<FetchTicket> {
        self.change_date(date)
    }

    /// Select a date given as text from a deep link
    ///
    /// Malformed or impossible dates go straight to `Void` carrying
    /// [`ContextError::InvalidDate`]; no fetch is issued and any in-flight
    /// one is invalidated.
    pub fn go_to_link(&mut self, raw: &str) -> Option<FetchTicket> {
        if !self.live {
            return None;
        }
        match raw.trim().parse::<CalendarDate>() {
            Ok(date) => self.change_date(date),
            Err(e) => {
                self.epoch += 1;
                tracing::info!(input = raw, "rejected deep link date");
                self.state.status = Status::Void;
                self.state.context = None;
                self.state.last_error = Some(Arc::new(ContextError::InvalidDate(e)));
                self.state.view = ViewMode::Totem;
                None
            }
        }
    }

    /// Select today as of now; `None` only once torn down
    pub fn go_to_today(&mut self) -> Option<FetchTicket> {
        let today = self.clock.today();
        self.change_date(today)
    }

    /// Apply a fetch result
    ///
    /// Success enters `Success`; NotFound, Transport, Timeout and invalid
    /// dates all enter `Void` with the error kept. Cancellation is swallowed.
    pub fn commit(
        &mut self,
        ticket: &FetchTicket,
        result: Result<NormalizedContext, ContextError>,
    ) -> Commit {
        if !self.live {
            return Commit::Discarded(DiscardReason::TornDown);
        }
        if ticket.epoch != self.epoch {
            tracing::debug!(
                date = %ticket.date,
                ticket = ticket.epoch,
                current = self.epoch,
                "discarding stale fetch result"
            );
            return Commit::Discarded(DiscardReason::Superseded);
        }
        if self.state.status != Status::Loading {
            return Commit::Discarded(DiscardReason::Settled);
        }

        match result {
            Ok(context) => {
                self.state.status = Status::Success;
                self.state.context = Some(context);
                self.state.last_error = None;
            }
            Err(e) if !e.collapses_to_void() => {
                tracing::debug!(date = %ticket.date, "fetch cancelled");
                return Commit::Discarded(DiscardReason::Cancelled);
            }
            Err(e) => {
                self.state.status = Status::Void;
                self.state.context = None;
                self.state.last_error = Some(Arc::new(e));
                self.state.view = ViewMode::Totem;
            }
        }

        tracing::info!(date = %ticket.date, status = %self.state.status, "fetch committed");
        debug_assert!(self.state.is_consistent());
        Commit::Applied(self.state.status)
    }

    /// Invalidate every outstanding ticket for good
    ///
    /// Later date changes are refused and leave the state as it was.
    pub fn teardown(&mut self) {
        self.live = false;
        self.epoch += 1;
    }

    /// Open the detail drawer; only with a loaded context
    pub fn open_detail(&mut self) -> bool {
        if self.state.status != Status::Success || self.state.view == ViewMode::Detail {
            return false;
        }
        self.state.view = ViewMode::Detail;
        true
    }

    pub fn close_detail(&mut self) -> bool {
        let changed = self.state.view == ViewMode::Detail;
        self.state.view = ViewMode::Totem;
        changed
    }

    /// Re-evaluate `is_today` after the clock has moved
    pub fn refresh_today(&mut self) -> bool {
        let is_today = self.clock.is_today(&self.state.selected_date);
        let changed = is_today != self.state.is_today;
        self.state.is_today = is_today;
        changed
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    #[must_use]
    pub fn snapshot(&self) -> NavigationState {
        self.state.clone()
    }

    #[inline]
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    #[inline]
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.live
    }

    fn change_date(&mut self, date: CalendarDate) -> Option<FetchTicket> {
        if !self.live {
            tracing::debug!(%date, "navigation after teardown ignored");
            return None;
        }
        Some(self.select(date))
    }

    fn select(&mut self, date: CalendarDate) -> FetchTicket {
        self.epoch += 1;
        let is_today = self.clock.is_today(&date);
        self.state = NavigationState {
            selected_date: date,
            is_today,
            status: Status::Loading,
            context: None,
            last_error: None,
            view: ViewMode::Totem,
        };
        tracing::info!(%date, is_today, epoch = self.epoch, "date selected");

        FetchTicket {
            epoch: self.epoch,
            date,
            request_date: (!is_today).then_some(date),
        }
    }
}
