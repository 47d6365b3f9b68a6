use chrono::NaiveDate;
use std::time::{Duration, Instant};

use crate::error::ValidationError;
use crate::ledger::parse_units;

/// Utility functions for the cra application

// ===== STRING UTILITIES =====

/// Truncates a string to a maximum number of characters, adding "..." if truncated
pub fn truncate_string(s: &str, max_length: usize) -> String {
    if s.chars().count() <= max_length {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_length.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

// ===== DATE UTILITIES =====

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y.%m.%d", "%Y/%m/%d"];

/// Parses a date in YYYY-MM-DD, YYYY.MM.DD or YYYY/MM/DD format
pub fn parse_date(date_str: &str) -> Result<NaiveDate, ValidationError> {
    let date_str = date_str.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_str, format).ok())
        .ok_or_else(|| ValidationError::InvalidDateFormat(date_str.to_string()))
}

// ===== ACTIVITY UTILITIES =====

/// Validates a unit count given on the command line
pub fn validate_units(text: &str) -> Result<f64, ValidationError> {
    parse_units(text).ok_or_else(|| ValidationError::InvalidActivity(text.to_string()))
}

/// Parses a `DATE=UNITS` assignment such as `2024-05-02=0.5`
pub fn parse_assignment(assignment: &str) -> Result<(NaiveDate, String), ValidationError> {
    let (date, units) = assignment
        .split_once('=')
        .ok_or_else(|| ValidationError::InvalidActivity(assignment.to_string()))?;
    let date = parse_date(date)?;
    validate_units(units)?;
    Ok((date, units.trim().to_string()))
}

// ===== FORMATTING UTILITIES =====

/// Formats a number of days with proper pluralization
pub fn format_days(days: f64) -> String {
    let units = crate::ledger::format_units(days);
    if days == 1.0 {
        format!("{} day", units)
    } else {
        format!("{} days", units)
    }
}

/// Formats a duration for human-readable output
pub fn format_duration(duration: Duration) -> String {
    if duration.as_secs() > 0 {
        format!("{:.2}s", duration.as_secs_f64())
    } else if duration.as_millis() > 0 {
        format!("{}ms", duration.as_millis())
    } else {
        format!("{}μs", duration.as_micros())
    }
}

// ===== PERFORMANCE UTILITIES =====

/// A simple timer for performance measurement
pub struct Timer {
    start: Instant,
    message: String,
}

impl Timer {
    pub fn new(message: &str) -> Self {
        Timer {
            start: Instant::now(),
            message: message.to_string(),
        }
    }

    /// Stops the timer and logs the elapsed time at debug level
    pub fn stop_and_log(self) -> Duration {
        let duration = self.start.elapsed();
        tracing::debug!("{} took {}", self.message, format_duration(duration));
        duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration as StdDuration;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("very long string", 9), "very l...");
        assert_eq!(truncate_string("", 9), "");
        assert_eq!(truncate_string("abc", 3), "abc");
        assert_eq!(truncate_string("abcd", 3), "...");
        assert_eq!(truncate_string("Hélène Dupont", 8), "Hélèn...");
    }

    #[test]
    fn test_parse_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        assert_eq!(parse_date("2024-05-02").unwrap(), expected);
        assert_eq!(parse_date("2024.05.02").unwrap(), expected);
        assert_eq!(parse_date("2024/05/02").unwrap(), expected);
        assert!(parse_date("02/05/2024").is_err());
        assert!(parse_date("invalid-date").is_err());
    }

    #[test]
    fn test_parse_assignment() {
        let (date, units) = parse_assignment("2024-05-02=0.5").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
        assert_eq!(units, "0.5");

        assert!(parse_assignment("2024-05-02").is_err());
        assert!(parse_assignment("2024-05-02=abc").is_err());
        assert!(parse_assignment("yesterday=1").is_err());
    }

    #[test]
    fn test_validate_units() {
        assert_eq!(validate_units("0.5"), Ok(0.5));
        assert_eq!(
            validate_units("-1"),
            Err(ValidationError::InvalidActivity("-1".to_string()))
        );
    }

    #[test]
    fn test_format_days() {
        assert_eq!(format_days(1.0), "1 day");
        assert_eq!(format_days(10.5), "10.5 days");
        assert_eq!(format_days(0.0), "0 days");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(StdDuration::from_secs(2)), "2.00s");
        assert_eq!(format_duration(StdDuration::from_millis(150)), "150ms");
        assert_eq!(format_duration(StdDuration::from_micros(500)), "500μs");
    }

    #[test]
    fn test_timer() {
        let timer = Timer::new("test operation");
        thread::sleep(StdDuration::from_millis(10));
        let duration = timer.stop_and_log();
        assert!(duration.as_millis() >= 10);
    }
}
