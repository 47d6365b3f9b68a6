//! The selected report month

use chrono::{Datelike, Local, Months, NaiveDate};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

pub const MIN_YEAR: i32 = 1000;
pub const MAX_YEAR: i32 = 9999;

/// `year` if it is a four-digit year
pub fn check_year(year: i32) -> Result<i32, ValidationError> {
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        Ok(year)
    } else {
        Err(ValidationError::InvalidYear(year))
    }
}

/// A calendar month of a four-digit year.
///
/// Always holds a valid month, so the first day of the month and of the
/// following month can be derived without failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Period {
    first_day: NaiveDate,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Result<Self, ValidationError> {
        if !(1..=12).contains(&month) {
            return Err(ValidationError::InvalidMonth(month));
        }
        let year = check_year(year)?;
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first_day| Period { first_day })
            .ok_or(ValidationError::InvalidMonth(month))
    }

    /// The month containing today's local date
    pub fn current() -> Self {
        Self::containing(Local::now().date_naive())
    }

    pub fn containing(date: NaiveDate) -> Self {
        let year = date.year().clamp(MIN_YEAR, MAX_YEAR);
        let first_day = NaiveDate::from_ymd_opt(year, date.month(), 1).unwrap_or(date);
        Period { first_day }
    }

    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// First day of the following month, the exclusive end of this period
    pub fn end_exclusive(&self) -> NaiveDate {
        self.first_day
            .checked_add_months(Months::new(1))
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn days_in_month(&self) -> u32 {
        (self.end_exclusive() - self.first_day).num_days() as u32
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first_day && date < self.end_exclusive()
    }

    /// English month name, e.g. "May"
    pub fn month_name(&self) -> String {
        self.first_day.format("%B").to_string()
    }

    /// Next month; stays put at the last supported month
    pub fn next(&self) -> Self {
        self.shifted_months(1)
    }

    pub fn previous(&self) -> Self {
        self.shifted_months(-1)
    }

    pub fn next_year(&self) -> Self {
        self.shifted_months(12)
    }

    pub fn previous_year(&self) -> Self {
        self.shifted_months(-12)
    }

    fn shifted_months(&self, delta: i32) -> Self {
        let shifted = if delta >= 0 {
            self.first_day.checked_add_months(Months::new(delta as u32))
        } else {
            self.first_day
                .checked_sub_months(Months::new(delta.unsigned_abs()))
        };
        shifted
            .and_then(|date| Period::new(date.year(), date.month()).ok())
            .unwrap_or(*self)
    }

    /// Parse `YYYY-MM` or `MM/YYYY`
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let input = input.trim();
        let invalid = || ValidationError::InvalidPeriod(input.to_string());

        let (year, month) = if let Some((year, month)) = input.split_once('-') {
            (year, month)
        } else if let Some((month, year)) = input.split_once('/') {
            (year, month)
        } else {
            return Err(invalid());
        };

        if year.len() != 4 || month.is_empty() || month.len() > 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;

        Period::new(year, month)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first_day.format("%Y-%m"))
    }
}

impl FromStr for Period {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::parse(s)
    }
}
