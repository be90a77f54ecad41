//! Error types for the HRMS Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during payroll and analytics work.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the HRMS Engine.
///
/// All fallible operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use hrms_engine::error::EngineError;
///
/// let error = EngineError::MissingField {
///     field: "basic_salary".to_string(),
/// };
/// assert_eq!(error.to_string(), "Missing required field: basic_salary");
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

    /// A required numeric or text field was absent from an input row.
    #[error("Missing required field: {field}")]
    MissingField {
        /// The name of the missing field.
        field: String,
    },

    /// A field was present but held an unusable value.
    #[error("Invalid field '{field}': {message}")]
    InvalidField {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A divisor was zero where the calculation cannot fall back to a default.
    #[error("Division by zero: '{field}' is zero")]
    DivisionByZero {
        /// The field acting as the divisor.
        field: String,
    },

    /// Values and their associated records were not index-aligned.
    #[error("Length mismatch: {values} values but {records} records")]
    LengthMismatch {
        /// Number of numeric values supplied.
        values: usize,
        /// Number of records supplied.
        records: usize,
    },

    /// No salary structure was effective for the employee on the given date.
    #[error("Salary structure not found for employee '{employee_id}' on {date}")]
    SalaryStructureNotFound {
        /// The employee the lookup was for.
        employee_id: String,
        /// The date the structure had to be effective on.
        date: NaiveDate,
    },

    /// No attendance counts were available for the employee and period.
    #[error("Attendance not found for employee '{employee_id}' between {start_date} and {end_date}")]
    AttendanceNotFound {
        /// The employee the lookup was for.
        employee_id: String,
        /// Start of the pay period.
        start_date: NaiveDate,
        /// End of the pay period.
        end_date: NaiveDate,
    },

    /// The external store rejected a write.
    #[error("Store error: {message}")]
    StoreError {
        /// A description of the store failure.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for an [`EngineError::InvalidField`].
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for an [`EngineError::MissingField`].
    pub fn missing_field(field: impl Into<String>) -> Self {
        EngineError::MissingField {
            field: field.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
