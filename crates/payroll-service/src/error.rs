//! # Service Error Types
//!
//! Error types for the stores and the payroll façade.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Payroll Error Categories                          │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Lookup / Data  │  │    Backend      │  │     Input / Setup       │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  NotFound       │  │  Database       │  │  InvalidRange           │ │
//! │  │  NoData (soft)  │  │  Http / Status  │  │  Validation             │ │
//! │  │                 │  │  Io / Json      │  │  BackendNotConfigured   │ │
//! │  │                 │  │  Unsupported    │  │  Config / Console       │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Backend failures are never retried; they end the single operation that
//! hit them.

use chrono::NaiveDate;
use thiserror::Error;

use payroll_core::{BackendKind, ValidationError};
use payroll_db::DbError;

/// Result type alias for store operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Result type alias for façade operations.
pub type PayrollResult<T> = Result<T, PayrollError>;

// =============================================================================
// Backend Error
// =============================================================================

/// Failure talking to a store (database, HTTP server, or file).
#[derive(Debug, Error)]
pub enum BackendError {
    /// Database query or connection failed.
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    /// HTTP request could not be completed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// REST server answered with a status the contract doesn't allow.
    #[error("Unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// REST base URL could not be parsed or joined.
    #[error("Invalid REST URL: {0}")]
    InvalidUrl(String),

    /// File store read or write failed.
    #[error("File store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A stored or received record is not valid JSON.
    #[error("Malformed record: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store does not implement this operation.
    #[error("{0} is not supported by this store")]
    Unsupported(&'static str),
}

impl From<url::ParseError> for BackendError {
    fn from(err: url::ParseError) -> Self {
        BackendError::InvalidUrl(err.to_string())
    }
}

// =============================================================================
// Payroll Error
// =============================================================================

/// Errors surfaced by [`PayrollService`](crate::PayrollService).
#[derive(Debug, Error)]
pub enum PayrollError {
    /// No record exists for the given name.
    #[error("No employee payroll record found for '{name}'")]
    NotFound { name: String },

    /// An aggregate query returned no entries.
    ///
    /// Only ever logged: `average_salary_by_gender` swallows it.
    #[error("No data retrieved")]
    NoData,

    /// Date range with start after end.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// A store failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// The selector names a backend that was never injected.
    #[error("No {0} backend configured")]
    BackendNotConfigured(BackendKind),

    /// Record or argument failed validation.
    #[error("Validation error: {0}")]
    Validation(ValidationError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading from or prompting on the console failed.
    #[error("Console I/O failed: {0}")]
    Console(std::io::Error),
}

impl PayrollError {
    /// Creates a NotFound error for a name.
    pub fn not_found(name: impl Into<String>) -> Self {
        PayrollError::NotFound { name: name.into() }
    }

    /// Returns true if a store produced this error.
    pub fn is_backend_error(&self) -> bool {
        matches!(self, PayrollError::Backend(_))
    }
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<ValidationError> for PayrollError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::InvalidRange { start, end } => {
                PayrollError::InvalidRange { start, end }
            }
            other => PayrollError::Validation(other),
        }
    }
}

impl From<DbError> for PayrollError {
    fn from(err: DbError) -> Self {
        PayrollError::Backend(BackendError::Database(err))
    }
}

impl From<toml::de::Error> for PayrollError {
    fn from(err: toml::de::Error) -> Self {
        PayrollError::Config(err.to_string())
    }
}
