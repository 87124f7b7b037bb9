//! Aggregation windows
//!
//! Callers pick either "last N days" or "all time". Both resolve to an
//! inclusive [`DateRange`] so file selection has a single comparison path.

use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error_handling::HoneypotError;

/// Selector literal for the unbounded window
pub const ALL_TIME: &str = "all";

/// First day considered by the "all time" window
pub fn epoch_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or(NaiveDate::MIN)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateWindow {
    /// Today and the N days before it
    LastDays(u32),
    AllTime,
}

impl DateWindow {
    /// Resolve against `today`, the end of every window
    pub fn resolve(self, today: NaiveDate) -> DateRange {
        let start = match self {
            DateWindow::LastDays(days) => today
                .checked_sub_signed(Duration::days(i64::from(days)))
                .unwrap_or_else(epoch_start),
            DateWindow::AllTime => epoch_start(),
        };
        DateRange { start, end: today }
    }

    /// Resolve against the current UTC date
    pub fn resolve_now(self) -> DateRange {
        self.resolve(Utc::now().date_naive())
    }
}

impl FromStr for DateWindow {
    type Err = HoneypotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(ALL_TIME) {
            return Ok(DateWindow::AllTime);
        }
        s.parse::<u32>()
            .map(DateWindow::LastDays)
            .map_err(|_| HoneypotError::invalid_window(format!("expected '{ALL_TIME}' or a day count, got '{s}'")))
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateWindow::LastDays(days) => write!(f, "{days}"),
            DateWindow::AllTime => f.write_str(ALL_TIME),
        }
    }
}

/// Inclusive calendar range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_last_days_window() {
        let range = DateWindow::LastDays(7).resolve(day(2026, 2, 18));
        assert_eq!(range.start, day(2026, 2, 11));
        assert_eq!(range.end, day(2026, 2, 18));
        assert!(range.contains(day(2026, 2, 11)));
        assert!(range.contains(day(2026, 2, 18)));
        assert!(!range.contains(day(2026, 2, 10)));
        assert!(!range.contains(day(2026, 2, 19)));
    }

    #[test]
    fn test_zero_days_is_today_only() {
        let range = DateWindow::LastDays(0).resolve(day(2026, 2, 18));
        assert_eq!(range.start, range.end);
    }

    #[test]
    fn test_all_time_window() {
        let range = DateWindow::AllTime.resolve(day(2026, 2, 18));
        assert_eq!(range.start, day(1970, 1, 1));
        assert!(range.contains(day(2001, 9, 9)));
    }

    #[test]
    fn test_selector_parsing() {
        assert_eq!("all".parse::<DateWindow>().unwrap(), DateWindow::AllTime);
        assert_eq!(" ALL ".parse::<DateWindow>().unwrap(), DateWindow::AllTime);
        assert_eq!("30".parse::<DateWindow>().unwrap(), DateWindow::LastDays(30));
        let err = "-3".parse::<DateWindow>().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_WINDOW");
        assert!("week".parse::<DateWindow>().is_err());
    }

    #[test]
    fn test_display_round_trips_selector() {
        assert_eq!(DateWindow::AllTime.to_string(), "all");
        assert_eq!(DateWindow::LastDays(14).to_string(), "14");
    }
}
