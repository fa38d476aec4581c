//! # Error Types
//!
//! Structured error types for desk_core. Every failure the inventory store,
//! the persistence layer or the calculator can report is a variant of
//! [`DeskError`], so the menu front-ends can print a friendly message and
//! decide whether to keep looping.
//!
//! ## Example
//!
//! ```rust
//! use desk_core::errors::{DeskError, DeskResult};
//!
//! fn checked_ratio(a: f64, b: f64) -> DeskResult<f64> {
//!     if b == 0.0 {
//!         return Err(DeskError::DivisionByZero);
//!     }
//!     Ok(a / b)
//! }
//!
//! assert_eq!(checked_ratio(1.0, 0.0).unwrap_err().error_code(), "DIVISION_BY_ZERO");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for desk_core operations
pub type DeskResult<T> = Result<T, DeskError>;

/// Structured error type for inventory and calculator operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum DeskError {
    /// No book with this identifier exists.
    ///
    /// Signed and 64-bit so ids typed at the menu that could never have been
    /// assigned (negative, too large) still report as missing books.
    #[error("Book not found: {book_id}")]
    NotFound { book_id: i64 },

    /// Tried to issue a book that is already checked out
    #[error("Book {book_id} is already issued")]
    AlreadyIssued { book_id: u32 },

    /// Tried to return a book that is not checked out
    #[error("Book {book_id} was not issued")]
    NotIssued { book_id: u32 },

    /// An input value is invalid (empty, wrong format, etc.)
    #[error("Invalid input for '{field}': '{value}' - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Text that should have been a number
    #[error("Invalid number: '{input}'")]
    InvalidNumber { input: String },

    /// Unknown calculator operator
    #[error("Invalid operator: '{symbol}'")]
    InvalidOperator { symbol: String },

    /// Division with a zero divisor
    #[error("Cannot divide by zero")]
    DivisionByZero,

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl DeskError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        DeskError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidNumber error
    pub fn invalid_number(input: impl Into<String>) -> Self {
        DeskError::InvalidNumber { input: input.into() }
    }

    /// Create an InvalidOperator error
    pub fn invalid_operator(symbol: impl Into<String>) -> Self {
        DeskError::InvalidOperator { symbol: symbol.into() }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        DeskError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        DeskError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        DeskError::SerializationError { reason: reason.into() }
    }

    /// Whether a menu loop can report this error and carry on.
    ///
    /// Everything caused by user input is recoverable. Storage failures are
    /// not: the caller should assume the data file is unusable.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            DeskError::FileError { .. } | DeskError::FileLocked { .. } | DeskError::SerializationError { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            DeskError::NotFound { .. } => "NOT_FOUND",
            DeskError::AlreadyIssued { .. } => "ALREADY_ISSUED",
            DeskError::NotIssued { .. } => "NOT_ISSUED",
            DeskError::InvalidInput { .. } => "INVALID_INPUT",
            DeskError::InvalidNumber { .. } => "INVALID_NUMBER",
            DeskError::InvalidOperator { .. } => "INVALID_OPERATOR",
            DeskError::DivisionByZero => "DIVISION_BY_ZERO",
            DeskError::FileError { .. } => "FILE_ERROR",
            DeskError::FileLocked { .. } => "FILE_LOCKED",
            DeskError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = DeskError::AlreadyIssued { book_id: 7 };
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"AlreadyIssued\""));

        let roundtrip: DeskError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(DeskError::NotFound { book_id: 1 }.error_code(), "NOT_FOUND");
        assert_eq!(DeskError::invalid_operator("%").error_code(), "INVALID_OPERATOR");
        assert_eq!(DeskError::DivisionByZero.error_code(), "DIVISION_BY_ZERO");
    }

    #[test]
    fn test_recoverable() {
        assert!(DeskError::NotIssued { book_id: 3 }.is_recoverable());
        assert!(DeskError::invalid_number("abc").is_recoverable());
        assert!(!DeskError::file_error("write", "x.json", "disk full").is_recoverable());
        assert!(!DeskError::serialization("bad json").is_recoverable());
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(DeskError::NotFound { book_id: 42 }.to_string(), "Book not found: 42");
        assert_eq!(
            DeskError::invalid_input("title", "", "must not be empty").to_string(),
            "Invalid input for 'title': '' - must not be empty"
        );
    }
}
