//! Keyboard bindings

use ephemera_context::CalendarDate;

/// Something a user can ask a session to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavAction {
    Prev,
    Next,
    Today,
    GoTo(CalendarDate),
    OpenDetail,
    CloseDetail,
}

/// Action bound to a key, by DOM-style key name or code
///
/// Unbound keys map to `None`.
#[must_use]
pub fn action_for_key(key: &str) -> Option<NavAction> {
    match key {
        "ArrowLeft" => Some(NavAction::Prev),
        "ArrowRight" => Some(NavAction::Next),
        "Escape" => Some(NavAction::CloseDetail),
        "Space" | " " | "Enter" => Some(NavAction::OpenDetail),
        "t" | "T" | "KeyT" => Some(NavAction::Today),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_move_through_time() {
        assert_eq!(action_for_key("ArrowLeft"), Some(NavAction::Prev));
        assert_eq!(action_for_key("ArrowRight"), Some(NavAction::Next));
    }

    #[test]
    fn drawer_and_today_keys() {
        assert_eq!(action_for_key("Escape"), Some(NavAction::CloseDetail));
        assert_eq!(action_for_key(" "), Some(NavAction::OpenDetail));
        assert_eq!(action_for_key("Enter"), Some(NavAction::OpenDetail));
        assert_eq!(action_for_key("T"), Some(NavAction::Today));
    }

    #[test]
    fn unbound_keys_do_nothing() {
        assert_eq!(action_for_key("ArrowUp"), None);
        assert_eq!(action_for_key(""), None);
    }
}
