use chrono::{Datelike, Local};

/// Day of the month, 1 to 31.
pub type Day = u32;

/// Source of the current day used to bucket withdrawals.
pub trait Clock: Send + Sync {
    fn today(&self) -> Day;
}

/// Reads the local wall clock on every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> Day {
        Local::now().day()
    }
}

/// Always reports the same day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Day);

impl Clock for FixedClock {
    fn today(&self) -> Day {
        self.0
    }
}

pub fn is_valid_day(day: Day) -> bool {
    (1..=31).contains(&day)
}
