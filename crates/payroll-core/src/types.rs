//! # Domain Types
//!
//! Core domain types used throughout the payroll service.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────┐   ┌─────────────────┐   ┌─────────────────┐      │
//! │  │ EmployeePayroll  │   │   NewEmployee   │   │   BackendKind   │      │
//! │  │  ──────────────  │   │  ─────────────  │   │  ─────────────  │      │
//! │  │  id (i64)        │   │  name           │   │  InMemory       │      │
//! │  │  name            │   │  salary         │   │  File           │      │
//! │  │  salary (f64)    │   │  start_date     │   │  Database       │      │
//! │  │  start_date      │   │  gender         │   │  Rest           │      │
//! │  │  gender          │   └─────────────────┘   └─────────────────┘      │
//! │  └──────────────────┘                                                   │
//! │                                                                         │
//! │  GenderSalaryMap: gender code → average salary                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! - `id`: assigned by the backend on insert, `0` until the record is persisted
//! - `name`: lookup key for roster updates and deletes (first match wins)

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// =============================================================================
// Backend Selector
// =============================================================================

/// Selects which backend a payroll operation targets.
///
/// ## Persistence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  InMemory  → operates on the roster only                               │
/// │  File      → JSON Lines file store          (persistent)               │
/// │  Database  → SQLite repository              (persistent)               │
/// │  Rest      → JSON collection over HTTP      (persistent)               │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// The façade's own roster; nothing is persisted.
    #[default]
    #[serde(alias = "memory")]
    InMemory,
    /// Flat file store.
    File,
    /// Relational database store.
    Database,
    /// REST-backed JSON store.
    Rest,
}

impl BackendKind {
    /// All selectors, in declaration order.
    pub const ALL: [BackendKind; 4] = [
        BackendKind::InMemory,
        BackendKind::File,
        BackendKind::Database,
        BackendKind::Rest,
    ];

    /// Returns true if operations with this selector go through a backend.
    pub fn is_persistent(&self) -> bool {
        !matches!(self, BackendKind::InMemory)
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::InMemory => write!(f, "memory"),
            BackendKind::File => write!(f, "file"),
            BackendKind::Database => write!(f, "database"),
            BackendKind::Rest => write!(f, "rest"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "in_memory" | "console" => Ok(BackendKind::InMemory),
            "file" => Ok(BackendKind::File),
            "database" | "db" => Ok(BackendKind::Database),
            "rest" | "http" => Ok(BackendKind::Rest),
            _ => Err(ValidationError::NotAllowed {
                field: "backend".to_string(),
                allowed: BackendKind::ALL.iter().map(|k| k.to_string()).collect(),
            }),
        }
    }
}

// =============================================================================
// Employee Payroll Record
// =============================================================================

/// An employee payroll record.
///
/// Equality is structural across all fields; the sync check relies on it.
///
/// ## JSON Shape
/// ```json
/// { "id": 3, "name": "Mark", "salary": 3000000.0, "startDate": "2019-11-13", "gender": "M" }
/// ```
/// `id` is left out while it is `0` so that a REST server assigns one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePayroll {
    /// Backend-assigned identifier (`0` before persistence).
    #[serde(default, skip_serializing_if = "is_unsaved_id")]
    pub id: i64,

    /// Employee name, used as the roster lookup key.
    pub name: String,

    /// Salary (non-negative by convention).
    pub salary: f64,

    /// Date the employee joined.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    /// Single-character gender code.
    #[serde(default)]
    pub gender: Option<char>,
}

fn is_unsaved_id(id: &i64) -> bool {
    *id == 0
}

impl EmployeePayroll {
    /// Creates a minimal record, as entered on the console.
    pub fn new(id: i64, name: impl Into<String>, salary: f64) -> Self {
        EmployeePayroll {
            id,
            name: name.into(),
            salary,
            start_date: None,
            gender: None,
        }
    }

    /// Creates a full record.
    pub fn with_details(
        id: i64,
        name: impl Into<String>,
        salary: f64,
        start_date: NaiveDate,
        gender: char,
    ) -> Self {
        EmployeePayroll {
            id,
            name: name.into(),
            salary,
            start_date: Some(start_date),
            gender: Some(gender),
        }
    }

    /// Returns true once a backend has assigned an id.
    #[inline]
    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }

    /// Builds the insert payload for this record (the id is dropped).
    pub fn to_new_employee(&self) -> NewEmployee {
        NewEmployee {
            name: self.name.clone(),
            salary: self.salary,
            start_date: self.start_date,
            gender: self.gender,
        }
    }
}

impl fmt::Display for EmployeePayroll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} salary={:.2}", self.id, self.name, self.salary)?;
        if let Some(date) = self.start_date {
            write!(f, " start={}", date)?;
        }
        if let Some(gender) = self.gender {
            write!(f, " gender={}", gender)?;
        }
        Ok(())
    }
}

// =============================================================================
// Insert Payload
// =============================================================================

/// Fields a backend needs to create a record. The backend assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    pub name: String,
    pub salary: f64,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<char>,
}

impl NewEmployee {
    /// Attaches a backend-assigned id, producing the persisted record.
    pub fn into_record(self, id: i64) -> EmployeePayroll {
        EmployeePayroll {
            id,
            name: self.name,
            salary: self.salary,
            start_date: self.start_date,
            gender: self.gender,
        }
    }
}

// =============================================================================
// Derived Views
// =============================================================================

/// Gender code → average salary.
pub type GenderSalaryMap = BTreeMap<char, f64>;

/// Averages salaries per gender code. Records without a gender are skipped.
///
/// Stores without an aggregate query of their own (file, REST) use this.
pub fn average_salary_by_gender(records: &[EmployeePayroll]) -> GenderSalaryMap {
    let mut totals: BTreeMap<char, (f64, u32)> = BTreeMap::new();

    for record in records {
        if let Some(gender) = record.gender {
            let entry = totals.entry(gender).or_insert((0.0, 0));
            entry.0 += record.salary;
            entry.1 += 1;
        }
    }

    totals
        .into_iter()
        .map(|(gender, (sum, count))| (gender, sum / f64::from(count)))
        .collect()
}

/// Returns true if the record started inside the inclusive range `[start, end]`.
///
/// Records without a start date never match.
pub fn started_within(record: &EmployeePayroll, start: NaiveDate, end: NaiveDate) -> bool {
    record
        .start_date
        .map(|date| date >= start && date <= end)
        .unwrap_or(false)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_backend_kind_parsing() {
        assert_eq!("memory".parse::<BackendKind>().unwrap(), BackendKind::InMemory);
        assert_eq!("DB".parse::<BackendKind>().unwrap(), BackendKind::Database);
        assert_eq!("file".parse::<BackendKind>().unwrap(), BackendKind::File);
        assert_eq!("rest".parse::<BackendKind>().unwrap(), BackendKind::Rest);
        assert!("ftp".parse::<BackendKind>().is_err());
    }

    #[test]
    fn test_backend_kind_persistence() {
        assert!(!BackendKind::InMemory.is_persistent());
        assert!(BackendKind::File.is_persistent());
        assert!(BackendKind::Database.is_persistent());
        assert!(BackendKind::Rest.is_persistent());
    }

    #[test]
    fn test_record_json_uses_rest_field_names() {
        let record = EmployeePayroll::with_details(3, "Mark", 3000000.0, date(2019, 11, 13), 'M');
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["id"], 3);
        assert_eq!(json["startDate"], "2019-11-13");
        assert_eq!(json["gender"], "M");
    }

    #[test]
    fn test_unsaved_record_omits_id() {
        let record = EmployeePayroll::with_details(0, "Manish", 3000000.0, date(2020, 1, 1), 'M');
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("id").is_none());

        let parsed: EmployeePayroll =
            serde_json::from_str(r#"{"name":"Anil","salary":200.5}"#).unwrap();
        assert_eq!(parsed.id, 0);
        assert!(!parsed.is_persisted());
        assert_eq!(parsed.start_date, None);
    }

    #[test]
    fn test_average_salary_by_gender() {
        let records = vec![
            EmployeePayroll::with_details(1, "Bill", 100.0, date(2018, 1, 3), 'M'),
            EmployeePayroll::with_details(2, "Terisa", 300.0, date(2019, 1, 3), 'F'),
            EmployeePayroll::with_details(3, "Charlie", 300.0, date(2020, 1, 3), 'M'),
            EmployeePayroll::new(4, "Nobody", 1000.0),
        ];

        let averages = average_salary_by_gender(&records);
        assert_eq!(averages.len(), 2);
        assert_eq!(averages[&'M'], 200.0);
        assert_eq!(averages[&'F'], 300.0);
        assert!(average_salary_by_gender(&[]).is_empty());
    }

    #[test]
    fn test_started_within_is_inclusive() {
        let record = EmployeePayroll::with_details(1, "Bill", 100.0, date(2018, 1, 3), 'M');
        assert!(started_within(&record, date(2018, 1, 3), date(2018, 1, 3)));
        assert!(!started_within(&record, date(2018, 1, 4), date(2019, 1, 1)));
        assert!(!started_within(&EmployeePayroll::new(2, "X", 1.0), date(2000, 1, 1), date(2100, 1, 1)));
    }

    #[test]
    fn test_new_employee_round_trip_keeps_fields() {
        let record = EmployeePayroll::with_details(0, "Gunjan", 500.0, date(2021, 5, 1), 'F');
        let persisted = record.to_new_employee().into_record(9);
        assert_eq!(persisted.id, 9);
        assert_eq!(persisted.name, record.name);
        assert_eq!(persisted.gender, Some('F'));
    }
}
