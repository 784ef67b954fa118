//! Ephemera Navigator
//!
//! Day-by-day navigation through the context timeline:
//! - [`TimeTravelMachine`]: `Loading` / `Success` / `Void` keyed by the
//!   selected date, with liveness epochs that drop stale fetch results
//! - [`NavigatorSession`]: async composition root publishing
//!   [`NavigationState`] snapshots over `tokio::sync::watch`
//! - [`Clock`]: the observer's local "today"
//! - [`action_for_key`]: keyboard bindings
//!
//! # Example
//!
//! ```rust,ignore
//! use ephemera_navigator::{LocalClock, NavigatorSession};
//!
//! let session = NavigatorSession::start(Arc::new(client), Arc::new(LocalClock), None);
//! let mut updates = session.subscribe();
//! session.prev();
//! updates.changed().await?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod clock;
pub mod keys;
pub mod machine;
pub mod session;
pub mod state;

pub use clock::{Clock, FixedClock, LocalClock};
pub use keys::{action_for_key, NavAction};
pub use machine::{Commit, DiscardReason, FetchTicket, TimeTravelMachine};
pub use session::NavigatorSession;
pub use state::{NavigationState, Status, ViewMode};
