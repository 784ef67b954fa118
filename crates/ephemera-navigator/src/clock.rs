//! Source of the observer's local calendar day

use ephemera_context::CalendarDate;
use parking_lot::Mutex;
use std::fmt;

/// Supplies "today" in the observer's local time zone
pub trait Clock: Send + Sync + fmt::Debug {
    fn today(&self) -> CalendarDate;

    /// Whether `date` is today (year, month and day all equal)
    fn is_today(&self, date: &CalendarDate) -> bool {
        self.today().same_day(date)
    }
}

/// Wall clock in the system's local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> CalendarDate {
        CalendarDate::from_naive(chrono::Local::now().date_naive())
    }
}

/// Clock pinned to a settable day
#[derive(Debug)]
pub struct FixedClock {
    today: Mutex<CalendarDate>,
}

impl FixedClock {
    #[must_use]
    pub fn new(today: CalendarDate) -> Self {
        Self {
            today: Mutex::new(today),
        }
    }

    /// Move the clock, e.g. across midnight
    pub fn set(&self, today: CalendarDate) {
        *self.today.lock() = today;
    }
}

impl Clock for FixedClock {
    fn today(&self) -> CalendarDate {
        *self.today.lock()
    }
}
