//! Calendar dates
//!
//! Provides [`CalendarDate`], a day-granularity date whose canonical text
//! form is `YYYY-MM-DD`. Arithmetic is calendar arithmetic: stepping a day
//! crosses month, year and leap-day boundaries without any notion of
//! elapsed time or time zone.

use chrono::{Datelike, NaiveDate};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// A calendar day with no time-of-day component
///
/// Ordering follows the calendar. Cheap to copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Create from year, month (1-12) and day (1-31)
    ///
    /// # Errors
    /// Returns error if the components do not name a real day
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateParseError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| DateParseError::NoSuchDay(format!("{year:04}-{month:02}-{day:02}")))
    }

    /// Wrap an existing chrono date
    #[inline]
    #[must_use]
    pub const fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Underlying chrono date
    #[inline]
    #[must_use]
    pub const fn as_naive(&self) -> NaiveDate {
        self.0
    }

    /// Calendar year
    #[inline]
    #[must_use]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Month of year (1-12)
    #[inline]
    #[must_use]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Day of month (1-31)
    #[inline]
    #[must_use]
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// The previous calendar day
    ///
    /// Saturates at the earliest representable date.
    #[inline]
    #[must_use]
    pub fn prev_day(&self) -> Self {
        Self(self.0.pred_opt().unwrap_or(self.0))
    }

    /// The next calendar day
    ///
    /// Saturates at the latest representable date.
    #[inline]
    #[must_use]
    pub fn next_day(&self) -> Self {
        Self(self.0.succ_opt().unwrap_or(self.0))
    }

    /// Whether both dates share year, month and day
    #[inline]
    #[must_use]
    pub fn same_day(&self, other: &Self) -> bool {
        self.year() == other.year() && self.month() == other.month() && self.day() == other.day()
    }
}

impl Display for CalendarDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year(), self.month(), self.day())
    }
}

impl FromStr for CalendarDate {
    type Err = DateParseError;

    /// Strict `YYYY-MM-DD` parsing
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        let shape_ok = bytes.len() == 10
            && bytes[4] == b'-'
            && bytes[7] == b'-'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
        if !shape_ok {
            return Err(DateParseError::Malformed(s.to_string()));
        }

        let field = |range: std::ops::Range<usize>| -> Result<u32, DateParseError> {
            s[range]
                .parse::<u32>()
                .map_err(|_| DateParseError::Malformed(s.to_string()))
        };
        let year = i32::try_from(field(0..4)?).map_err(|_| DateParseError::Malformed(s.to_string()))?;
        let month = field(5..7)?;
        let day = field(8..10)?;

        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| DateParseError::NoSuchDay(s.to_string()))
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(value: NaiveDate) -> Self {
        Self(value)
    }
}

impl serde::Serialize for CalendarDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for CalendarDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct CalendarDateVisitor;

        impl<'de> serde::de::Visitor<'de> for CalendarDateVisitor {
            type Value = CalendarDate;

            fn expecting(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
                formatter.write_str("a calendar date formatted as YYYY-MM-DD")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                value.parse().map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_str(CalendarDateVisitor)
    }
}

/// Errors produced when reading a calendar date
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateParseError {
    /// Input is not shaped like `YYYY-MM-DD`
    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    Malformed(String),

    /// Input is well formed but names no real day
    #[error("invalid date '{0}': no such calendar day")]
    NoSuchDay(String),
}

impl DateParseError {
    /// The rejected input
    #[must_use]
    pub fn input(&self) -> &str {
        match self {
            Self::Malformed(s) | Self::NoSuchDay(s) => s,
        }
    }
}
