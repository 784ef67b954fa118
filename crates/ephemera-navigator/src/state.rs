//! Navigation state published to the presentation layer

use ephemera_context::{CalendarDate, ContextError, NormalizedContext};
use std::fmt;
use std::sync::Arc;

/// Outcome of loading the selected date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Fetch in flight
    Loading,
    /// Context available
    Success,
    /// No content; the reason is kept in `last_error`
    Void,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Loading => "LOADING",
            Self::Success => "SUCCESS",
            Self::Void => "VOID",
        })
    }
}

/// Whether the detail drawer is open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewMode {
    #[default]
    Totem,
    Detail,
}

/// Snapshot of one session's navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    pub selected_date: CalendarDate,
    /// `selected_date` is the observer's local today
    pub is_today: bool,
    pub status: Status,
    pub context: Option<NormalizedContext>,
    pub last_error: Option<Arc<ContextError>>,
    pub view: ViewMode,
}

impl NavigationState {
    /// Fresh state for `today`, loading
    #[must_use]
    pub fn loading(today: CalendarDate) -> Self {
        Self {
            selected_date: today,
            is_today: true,
            status: Status::Loading,
            context: None,
            last_error: None,
            view: ViewMode::Totem,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status == Status::Loading
    }

    /// Status, payload, error and view agree with each other
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let payload = match self.status {
            Status::Loading => self.context.is_none() && self.last_error.is_none(),
            Status::Success => self.context.is_some() && self.last_error.is_none(),
            Status::Void => self.context.is_none() && self.last_error.is_some(),
        };
        payload && (self.view == ViewMode::Totem || self.status == Status::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_is_loading_and_consistent() {
        let state = NavigationState::loading("2026-10-16".parse().unwrap());
        assert!(state.is_loading());
        assert!(state.is_today);
        assert!(state.is_consistent());
    }

    #[test]
    fn detail_outside_success_is_inconsistent() {
        let mut state = NavigationState::loading("2026-10-16".parse().unwrap());
        state.view = ViewMode::Detail;
        assert!(!state.is_consistent());
    }

    #[test]
    fn status_display() {
        assert_eq!(Status::Void.to_string(), "VOID");
    }
}
