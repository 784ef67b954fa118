//! Line commands for the interactive browser

use ephemera_navigator::{action_for_key, NavAction};

pub(crate) const HELP: &str = "\
commands:
  prev | left          previous day
  next | right         next day (stops at today)
  today | t            back to today
  goto YYYY-MM-DD      jump to a day
  detail | enter       open the news for this day
  close | esc          back to the totem view
  show                 print the current state again
  quit | q             leave";

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BrowseCommand {
    Action(NavAction),
    /// Raw date text, validated by the session
    Link(String),
    Show,
    Help,
    Quit,
}

/// Parse a line typed at the browse prompt
///
/// Key names (`ArrowLeft`, `Escape`, ...) are accepted as well. Blank or
/// unknown input maps to `None`.
pub(crate) fn parse_command(line: &str) -> Option<BrowseCommand> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "" => return None,
        "prev" | "left" | "p" => BrowseCommand::Action(NavAction::Prev),
        "next" | "right" | "n" => BrowseCommand::Action(NavAction::Next),
        "today" => BrowseCommand::Action(NavAction::Today),
        "detail" | "enter" | "space" | "open" => BrowseCommand::Action(NavAction::OpenDetail),
        "close" | "esc" | "escape" | "back" => BrowseCommand::Action(NavAction::CloseDetail),
        "goto" | "go" if !rest.is_empty() => BrowseCommand::Link(rest.to_string()),
        "show" => BrowseCommand::Show,
        "help" | "?" => BrowseCommand::Help,
        "quit" | "q" | "exit" => BrowseCommand::Quit,
        _ => return action_for_key(word).map(BrowseCommand::Action),
    };
    Some(command)
}
