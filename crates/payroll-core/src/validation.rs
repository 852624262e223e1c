//! # Validation Module
//!
//! Input validation for payroll records.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Console / CLI parsing                                        │
//! │  └── Token format (integer id, float salary)                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Name present and bounded                                          │
//! │  ├── Salary finite and non-negative                                    │
//! │  └── Date range ordered                                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend (SQLite NOT NULL, REST server)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use payroll_core::validation::{validate_employee_name, validate_salary};
//!
//! validate_employee_name("Bill").unwrap();
//! validate_salary(100000.0).unwrap();
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::MAX_NAME_LENGTH;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates an employee name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 100 characters
///
/// ## Example
/// ```rust
/// use payroll_core::validation::validate_employee_name;
///
/// assert!(validate_employee_name("Terisa").is_ok());
/// assert!(validate_employee_name("  ").is_err());
/// ```
pub fn validate_employee_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(())
}

/// Validates a salary.
///
/// ## Rules
/// - Must be a finite number
/// - Must be non-negative (zero is allowed)
pub fn validate_salary(salary: f64) -> ValidationResult<()> {
    if !salary.is_finite() {
        return Err(ValidationError::invalid_format(
            "salary",
            "must be a finite number",
        ));
    }

    if salary < 0.0 {
        return Err(ValidationError::Negative {
            field: "salary".to_string(),
        });
    }

    Ok(())
}

/// Validates an inclusive date range.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use payroll_core::validation::validate_date_range;
///
/// let jan = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
/// let feb = NaiveDate::from_ymd_opt(2020, 2, 1).unwrap();
///
/// assert!(validate_date_range(jan, feb).is_ok());
/// assert!(validate_date_range(jan, jan).is_ok());
/// assert!(validate_date_range(feb, jan).is_err());
/// ```
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> ValidationResult<()> {
    if start > end {
        return Err(ValidationError::InvalidRange { start, end });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_employee_name() {
        assert!(validate_employee_name("Bill").is_ok());
        assert!(validate_employee_name("Jeff Bezos").is_ok());

        assert!(validate_employee_name("").is_err());
        assert!(validate_employee_name("   ").is_err());
        assert!(validate_employee_name(&"A".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_salary() {
        assert!(validate_salary(0.0).is_ok());
        assert!(validate_salary(3000000.0).is_ok());

        assert!(matches!(
            validate_salary(-1.0),
            Err(ValidationError::Negative { .. })
        ));
        assert!(validate_salary(f64::NAN).is_err());
        assert!(validate_salary(f64::INFINITY).is_err());
    }
}
