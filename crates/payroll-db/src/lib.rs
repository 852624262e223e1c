//! # payroll-db: Database Layer for the Payroll Service
//!
//! This crate provides database access for employee payroll records.
//! It uses SQLite with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Payroll Data Flow                                │
//! │                                                                         │
//! │  PayrollService::update_salary(name, salary, BackendKind::Database)    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DatabaseStore (payroll-service)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     payroll-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐  ┌────────────┐  │   │
//! │  │   │   Database    │    │    Repository      │  │ Migrations │  │   │
//! │  │   │   (pool.rs)   │◄───│ EmployeeRepository │  │ (embedded) │  │   │
//! │  │   └───────────────┘    └────────────────────┘  └────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (payroll.db)                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Employee repository
//!
//! ## Usage
//!
//! ```rust,ignore
//! use payroll_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("payroll.db")).await?;
//! let employees = db.employees().list().await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::employee::EmployeeRepository;
