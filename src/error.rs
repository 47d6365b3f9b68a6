//! Custom error types for the cra application
//!
//! Library code returns these structured errors; the binary and the
//! interactive loop wrap them in `anyhow` at the outer edge.

use chrono::NaiveDate;
use thiserror::Error;

/// Main error type for the cra application
#[derive(Error, Debug)]
pub enum CraError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Holiday provider errors
    #[error("Holiday error: {0}")]
    Holiday(#[from] HolidayError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Report export errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine the {0} directory")]
    NoProjectDirectory(&'static str),

    #[error("Failed to load configuration file: {0}")]
    LoadFailed(String),

    #[error("Failed to save configuration file: {0}")]
    SaveFailed(String),

    #[error("Failed to create config directory: {0}")]
    DirectoryCreationFailed(String),
}

/// Failures while retrieving public holidays for a year
#[derive(Error, Debug)]
pub enum HolidayError {
    #[error("Failed to reach the holiday provider for {year}: {reason}")]
    ConnectionFailed { year: i32, reason: String },

    #[error("Holiday provider answered {status} for {year}")]
    BadStatus { year: i32, status: u16 },

    #[error("Malformed holiday data for {year}: {reason}")]
    InvalidResponse { year: i32, reason: String },

    #[error("No cached holidays for {0} (offline)")]
    NotCached(i32),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

/// Validation errors
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Invalid month: {0}. Must be between 1 and 12")]
    InvalidMonth(u32),

    #[error("Invalid year: {0}")]
    InvalidYear(i32),

    #[error("Invalid period: {0}. Expected YYYY-MM or MM/YYYY")]
    InvalidPeriod(String),

    #[error("Invalid date format: {0}. Expected YYYY-MM-DD")]
    InvalidDateFormat(String),

    #[error("Invalid activity value: {0}. Expected a non-negative decimal such as 0, 0.5 or 1")]
    InvalidActivity(String),

    #[error("{0} is a weekend or public holiday, activity cannot be recorded")]
    NotAWorkingDay(NaiveDate),

    #[error("{0} is not part of the selected month")]
    DateOutOfRange(NaiveDate),
}

/// Report export errors
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No rendered table available to export")]
    TableUnavailable,

    #[error("Failed to encode PDF: {0}")]
    Encoding(#[from] lopdf::Error),

    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for the cra application
pub type Result<T> = std::result::Result<T, CraError>;
