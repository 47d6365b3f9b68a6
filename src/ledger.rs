//! Activity entries and the monthly total
//!
//! Activity is kept as the text the user typed. Only working days carry
//! activity, and text that does not parse as a unit count is excluded from
//! the total rather than rejected.

use chrono::NaiveDate;

use crate::calendar::MonthView;
use crate::error::ValidationError;

/// Parse an activity value such as "0.5", "1" or "0,5".
///
/// Returns `None` for empty, negative, non-finite or non-numeric text.
pub fn parse_units(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let value: f64 = text.replace(',', ".").parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// Format a unit count without trailing zeros: 0.5, 1, 10.5
pub fn format_units(units: f64) -> String {
    if units % 1.0 == 0.0 {
        format!("{:.0}", units)
    } else {
        let formatted = format!("{:.2}", units);
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

impl MonthView {
    /// Record `text` as the activity of a working day.
    ///
    /// Weekends, holidays and dates outside the month are rejected and leave
    /// the view untouched.
    pub fn set_activity(&mut self, date: NaiveDate, text: &str) -> Result<(), ValidationError> {
        let index = self
            .index_of(date)
            .ok_or(ValidationError::DateOutOfRange(date))?;
        let day = &mut self.days[index];
        if !day.is_working_day() {
            return Err(ValidationError::NotAWorkingDay(date));
        }

        let text = text.trim();
        if parse_units(text).is_none() {
            tracing::warn!(%date, input = text, "Activity is not a number, excluded from total");
        }
        day.activity = Some(text.to_string());
        Ok(())
    }

    pub fn clear_activity(&mut self, date: NaiveDate) -> Result<(), ValidationError> {
        let index = self
            .index_of(date)
            .ok_or(ValidationError::DateOutOfRange(date))?;
        self.days[index].activity = None;
        Ok(())
    }

    /// Overwrite every working day with `units` and return the new total
    pub fn fill_all_working_days(&mut self, units: f64) -> f64 {
        // Stored unrounded so the total matches units * working days
        let text = units.to_string();
        for day in self.days.iter_mut().filter(|day| day.is_working_day()) {
            day.activity = Some(text.clone());
        }
        self.compute_total()
    }

    /// Sum of parseable activity over working days
    pub fn compute_total(&self) -> f64 {
        self.working_days()
            .filter_map(|day| day.activity.as_deref())
            .filter_map(parse_units)
            .sum()
    }

    /// Units recorded on `date`, if any parse
    pub fn units_on(&self, date: NaiveDate) -> Option<f64> {
        self.get(date)
            .filter(|day| day.is_working_day())
            .and_then(|day| day.activity.as_deref())
            .and_then(parse_units)
    }
}
