//! # Repository Module
//!
//! Database repository implementations for the payroll service.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  DatabaseStore (payroll-service)                                       │
//! │       │                                                                 │
//! │       │  db.employees().update_salary_by_name("Terisa", 3e6)           │
//! │       ▼                                                                 │
//! │  EmployeeRepository                                                    │
//! │  ├── list / list_active / list_by_date_range                           │
//! │  ├── find_by_name                                                      │
//! │  ├── insert                                                            │
//! │  ├── update_salary_by_name / delete_by_name                            │
//! │  └── average_salary_by_gender                                          │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod employee;
