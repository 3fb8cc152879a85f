//! Month-name resolution to half-open UTC time windows.
//!
//! Month names carry no year, so every window is anchored to a single
//! reference year (see [`EngineConfig::reference_year`](crate::config::EngineConfig)).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::Serialize;

use crate::error::{Result, SalesError};

// ---------------------------------------------------------------------------
// Month
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// Calendar number, 1 for January through 12 for December.
    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    pub fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }

    /// The window covering this month of `year`.
    pub fn window(self, year: i32) -> Result<TimeWindow> {
        TimeWindow::for_month(year, self.number())
    }
}

impl FromStr for Month {
    type Err = SalesError;

    /// Case-insensitive, exact match on the English month name.
    fn from_str(s: &str) -> Result<Self> {
        Month::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| SalesError::InvalidMonth(s.to_string()))
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// TimeWindow
// ---------------------------------------------------------------------------

/// Half-open UTC interval `[start, end)` spanning one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Window for calendar month `month` (1-12) of `year`.
    ///
    /// December ends on January 1st of the following year.
    pub fn for_month(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(SalesError::InvalidArgument(format!(
                "month number out of range: {}",
                month
            )));
        }
        let (next_year, next_month) = if month == 12 {
            let next = year.checked_add(1).ok_or_else(|| {
                SalesError::InvalidArgument(format!("year out of range: {}", year))
            })?;
            (next, 1)
        } else {
            (year, month + 1)
        };
        Ok(Self {
            start: first_instant(year, month)?,
            end: first_instant(next_year, next_month)?,
        })
    }

    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        *instant >= self.start && *instant < self.end
    }

    /// `(year, month)` of the window start.
    pub fn year_month(&self) -> (i32, u32) {
        (self.start.year(), self.start.month())
    }
}

fn first_instant(year: i32, month: u32) -> Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| {
            SalesError::InvalidArgument(format!("unrepresentable date: {}-{:02}-01", year, month))
        })
}

// ---------------------------------------------------------------------------
// Resolution helpers
// ---------------------------------------------------------------------------

/// Resolve a month name to its window in `reference_year`.
///
/// Fails with [`SalesError::InvalidMonth`] unless `name` is one of the twelve
/// English month names (any case).
pub fn resolve_month(name: &str, reference_year: i32) -> Result<TimeWindow> {
    name.parse::<Month>()?.window(reference_year)
}

/// Resolve an optional month. Absent or empty means "no window filter".
pub fn resolve_optional(month: Option<&str>, reference_year: i32) -> Result<Option<TimeWindow>> {
    match month {
        Some(name) if !name.is_empty() => resolve_month(name, reference_year).map(Some),
        _ => Ok(None),
    }
}

/// Resolve a month that the operation cannot do without.
///
/// Absent or empty fails with [`SalesError::MissingMonth`].
pub fn require_month(month: Option<&str>, reference_year: i32) -> Result<TimeWindow> {
    resolve_optional(month, reference_year)?.ok_or(SalesError::MissingMonth)
}
