//! # payroll-service: Backend Stores and the Payroll Façade
//!
//! This crate routes employee payroll operations to one of several
//! interchangeable backends and keeps an in-memory roster in step with them.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Payroll Service Architecture                     │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                 PayrollService (Roster + Dispatch)               │  │
//! │  │                                                                  │  │
//! │  │  Every operation takes a BackendKind selector                    │  │
//! │  │  InMemory → roster only, otherwise → injected PayrollStore       │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │   FileStore    │  │ DatabaseStore  │  │      RestStore         │    │
//! │  │                │  │                │  │                        │    │
//! │  │ JSON Lines     │  │ payroll-db     │  │ json-server style      │    │
//! │  │ max(id) + 1    │  │ soft delete    │  │ /employees resource    │    │
//! │  │ whole rewrite  │  │ GROUP BY avg   │  │ client-side aggregates │    │
//! │  └────────────────┘  └────────────────┘  └────────────────────────┘    │
//! │                                                                         │
//! │  PayrollConfig: TOML + PAYROLL_* env overrides                          │
//! │  console: prompt-driven record entry                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`service`] - `PayrollService` façade and its builder
//! - [`store`] - `PayrollStore` trait and the three stores
//! - [`config`] - Backend locations and default selector
//! - [`console`] - Reading a record from standard input
//! - [`error`] - Store and façade error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use payroll_core::{BackendKind, EmployeePayroll};
//! use payroll_service::{PayrollConfig, PayrollServiceBuilder};
//!
//! let config = PayrollConfig::load(None)?;
//! let mut service = PayrollServiceBuilder::from_config(&config, &[BackendKind::Database])
//!     .await?
//!     .build();
//!
//! service.add(EmployeePayroll::new(0, "Mark", 3_000_000.0), BackendKind::Database).await?;
//! let averages = service.average_salary_by_gender(BackendKind::Database).await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod console;
pub mod error;
pub mod service;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::PayrollConfig;
pub use console::read_employee;
pub use error::{BackendError, BackendResult, PayrollError, PayrollResult};
pub use service::{BatchFailure, BatchReport, PayrollService, PayrollServiceBuilder};
pub use store::{DatabaseStore, FileStore, PayrollStore, RestStore};
