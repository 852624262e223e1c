//! # payroll-core: Pure Domain Types for the Payroll Service
//!
//! This crate holds the record type, the backend selector, and validation.
//! It has zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Payroll Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    payroll-cli (console)                        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │           payroll-service (PayrollService façade)               │   │
//! │  │      FileStore        DatabaseStore        RestStore            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ payroll-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────────────┐  ┌─────────────┐  ┌─────────────┐        │   │
//! │  │   │      types      │  │    error    │  │ validation  │        │   │
//! │  │   │ EmployeePayroll │  │ Validation  │  │   rules     │        │   │
//! │  │   │  BackendKind    │  │   Error     │  │   checks    │        │   │
//! │  │   └─────────────────┘  └─────────────┘  └─────────────┘        │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (EmployeePayroll, NewEmployee, BackendKind)
//! - [`error`] - Validation error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use payroll_core::{average_salary_by_gender, EmployeePayroll};
//!
//! let start = NaiveDate::from_ymd_opt(2019, 11, 13).unwrap();
//! let roster = vec![
//!     EmployeePayroll::with_details(1, "Mark", 200.0, start, 'M'),
//!     EmployeePayroll::with_details(2, "Bill", 400.0, start, 'M'),
//! ];
//!
//! assert_eq!(average_salary_by_gender(&roster)[&'M'], 300.0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of an employee name, in characters.
pub const MAX_NAME_LENGTH: usize = 100;
