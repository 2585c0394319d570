//! Return periods (calendar months) and inclusive month ranges

use chrono::{Datelike, Local, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// A GST return period, rendered as `YYYY-MM`.
///
/// Ordering is chronological.
///
/// ```
/// use gstr2a_puller::period::ReturnPeriod;
///
/// let period: ReturnPeriod = "2024-04".parse().unwrap();
/// assert_eq!(period.year(), 2024);
/// assert_eq!(period.month(), 4);
/// assert_eq!(period.to_string(), "2024-04");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReturnPeriod {
    year: i32,
    month: u32,
}

impl ReturnPeriod {
    /// Create a period, validating the month.
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::InvalidMonth(month));
        }
        if !(1000..=9999).contains(&year) {
            return Err(PeriodError::InvalidYear(year));
        }
        Ok(Self { year, month })
    }

    /// Calendar year
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month (1-12)
    pub fn month(&self) -> u32 {
        self.month
    }

    /// The period that contains `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The month before the one containing `date`.
    pub fn previous_month_of(date: NaiveDate) -> Self {
        Self::containing(date).pred()
    }

    /// The month before the current local month; the default pull period.
    pub fn previous_month() -> Self {
        Self::previous_month_of(Local::now().date_naive())
    }

    /// Next calendar month
    pub fn succ(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Previous calendar month
    pub fn pred(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }
}

impl fmt::Display for ReturnPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for ReturnPeriod {
    type Err = PeriodError;

    /// Parse strict `YYYY-MM` (four-digit year, zero-padded month).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || PeriodError::InvalidFormat(s.to_string());

        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        if !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

/// Every period from `start` to `end`, both inclusive, in calendar order.
///
/// Bounds given in reverse order are swapped.
///
/// ```
/// use gstr2a_puller::period::{month_range, ReturnPeriod};
///
/// let start: ReturnPeriod = "2024-11".parse().unwrap();
/// let end: ReturnPeriod = "2025-02".parse().unwrap();
/// let months: Vec<String> = month_range(start, end).iter().map(|p| p.to_string()).collect();
/// assert_eq!(months, ["2024-11", "2024-12", "2025-01", "2025-02"]);
/// ```
pub fn month_range(start: ReturnPeriod, end: ReturnPeriod) -> Vec<ReturnPeriod> {
    let (start, end) = if start <= end { (start, end) } else { (end, start) };

    let mut months = Vec::new();
    let mut current = start;
    while current <= end {
        months.push(current);
        current = current.succ();
    }
    months
}

/// Errors produced while parsing return periods
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PeriodError {
    /// Not in `YYYY-MM` form
    #[error("invalid return period '{0}': expected YYYY-MM")]
    InvalidFormat(String),

    /// Month outside 1-12
    #[error("invalid month {0}: expected 01-12")]
    InvalidMonth(u32),

    /// Year outside four digits
    #[error("invalid year {0}")]
    InvalidYear(i32),
}
