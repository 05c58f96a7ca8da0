//! Error types for the workforce engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate.
//! Only contract violations and configuration problems surface as errors;
//! collaborator failures (`FetchFailed`, `FetchTimedOut`) are recovered by the
//! rollup functions and only ever appear in logs.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

/// The main error type for the workforce engine.
///
/// # Example
///
/// ```
/// use workforce_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/attendance.yaml".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Configuration file not found: /missing/attendance.yaml"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A configuration value was parsed but is outside its allowed range.
    #[error("Invalid configuration value '{field}': {message}")]
    InvalidConfig {
        /// The offending configuration key.
        field: String,
        /// Why the value was rejected.
        message: String,
    },

    /// A monetary amount was negative, too precise, or too large.
    #[error("Invalid amount for '{field}': {message}")]
    InvalidAmount {
        /// The component or field carrying the amount.
        field: String,
        /// Why the amount was rejected.
        message: String,
    },

    /// A payroll period named a month outside 1-12.
    #[error("Invalid payroll period {month}/{year}")]
    InvalidPeriod {
        /// The month as supplied.
        month: u32,
        /// The year as supplied.
        year: i32,
    },

    /// A working-day count exceeded the days in a month.
    #[error("Invalid working days {working_days}: must not exceed {max}")]
    InvalidWorkingDays {
        /// The count as supplied.
        working_days: u32,
        /// The largest accepted count.
        max: u32,
    },

    /// A date key was not a `YYYY-MM-DD` calendar date.
    #[error("Invalid date key '{key}': {message}")]
    InvalidDateKey {
        /// The key as supplied.
        key: String,
        /// Why the key was rejected.
        message: String,
    },

    /// A date range ended before it started.
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange {
        /// First day of the range.
        start: NaiveDate,
        /// Last day of the range.
        end: NaiveDate,
    },

    /// A raw attendance record could not be decoded.
    #[error("Invalid attendance event at index {index}: {message}")]
    InvalidEvent {
        /// Position of the record in the submitted batch.
        index: usize,
        /// A description of what was wrong with the record.
        message: String,
    },

    /// No payroll record exists with the given id.
    #[error("Payroll record not found: {record_id}")]
    RecordNotFound {
        /// The id that was looked up.
        record_id: Uuid,
    },

    /// Another live payroll record already owns the (employee, month, year) key.
    #[error("Payroll record already exists for employee '{employee_id}' in {month}/{year}")]
    PeriodConflict {
        /// The employee the key belongs to.
        employee_id: String,
        /// The month of the conflicting key.
        month: u32,
        /// The year of the conflicting key.
        year: i32,
    },

    /// An external data source reported a failure.
    #[error("Fetch from {source_name} failed: {message}")]
    FetchFailed {
        /// Which collaborator failed (e.g. "event provider").
        source_name: String,
        /// The collaborator's description of the failure.
        message: String,
    },

    /// An external data source did not answer in time.
    #[error("Fetch for {date} timed out after {timeout_ms}ms")]
    FetchTimedOut {
        /// The day being fetched.
        date: NaiveDate,
        /// The timeout that elapsed.
        timeout_ms: u64,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
