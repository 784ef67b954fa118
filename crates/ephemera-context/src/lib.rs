//! Ephemera Context
//!
//! Client side of the daily context service:
//! - [`CalendarDate`]: strict `YYYY-MM-DD` day values with calendar arithmetic
//! - [`ContextClient`]: daily, history and fossil fetches with a bounded timeout
//! - [`ContextError`]: the not-found / transport / timeout taxonomy
//! - [`normalize_daily_context`]: wire record → presentation record
//!
//! # Example
//!
//! ```rust,ignore
//! use ephemera_context::{ClientConfig, ContextClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ContextClient::new(ClientConfig::new())?;
//! let today = client.fetch_daily_context(None).await?;
//! println!("{}: {}", today.date, today.suggested_prompt);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod client;
pub mod config;
pub mod date;
pub mod error;
pub mod normalize;
pub mod transport;
pub mod types;

pub use client::{ContextClient, ContextSource};
pub use config::{load_toml, ClientConfig};
pub use date::{CalendarDate, DateParseError};
pub use error::{ConfigError, ContextError};
pub use normalize::{normalize_daily_context, NormalizedContext};
pub use transport::ApiTransport;
pub use types::{
    ApiErrorBody, DailyContext, FossilContext, FossilPrediction, HistoryCategory, HistoryContext,
    HistoryEvent, NewsItem,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
