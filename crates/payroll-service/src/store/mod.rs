//! # Payroll Stores
//!
//! The persistence seam of the payroll service.
//!
//! ## Store Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         PayrollStore                                    │
//! │                                                                         │
//! │  list()                      → every record                            │
//! │  list_active()               → records not removed (default: list)     │
//! │  list_by_date_range(s, e)    → records with s <= start_date <= e       │
//! │  insert(new)                 → stored record with assigned id          │
//! │  update_by_name(name, sal)   → affected count                          │
//! │  delete_by_name(name)        → affected count                          │
//! │  find_by_name(name)          → matches, possibly empty                 │
//! │  average_salary_by_gender()  → gender → average                        │
//! │  count()                     → number of records (default: list len)   │
//! │  replace_all(records)        → overwrite contents (default: error)     │
//! │  health_check()              → reachable? (default: count succeeds)    │
//! │                                                                         │
//! │        ┌────────────┐   ┌───────────────┐   ┌────────────┐             │
//! │        │ FileStore  │   │ DatabaseStore │   │ RestStore  │             │
//! │        │ JSON Lines │   │ SQLite (sqlx) │   │ reqwest    │             │
//! │        └────────────┘   └───────────────┘   └────────────┘             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod database;
pub mod file;
pub mod rest;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::{BackendError, BackendResult};
use payroll_core::{EmployeePayroll, GenderSalaryMap, NewEmployee};

pub use database::DatabaseStore;
pub use file::FileStore;
pub use rest::RestStore;

/// A persistent home for employee payroll records.
///
/// Implementations are injected into [`PayrollService`](crate::PayrollService)
/// at construction; the façade never creates them itself.
#[async_trait]
pub trait PayrollStore: Send + Sync {
    /// Lists every stored record.
    async fn list(&self) -> BackendResult<Vec<EmployeePayroll>>;

    /// Lists records that are still active.
    ///
    /// Only stores with a notion of removal-without-deletion filter anything.
    async fn list_active(&self) -> BackendResult<Vec<EmployeePayroll>> {
        self.list().await
    }

    /// Lists records whose start date lies in `[start, end]`.
    async fn list_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> BackendResult<Vec<EmployeePayroll>>;

    /// Stores a new record; the store assigns its id.
    async fn insert(&self, employee: NewEmployee) -> BackendResult<EmployeePayroll>;

    /// Sets the salary of records with this name, returning how many changed.
    async fn update_by_name(&self, name: &str, salary: f64) -> BackendResult<u64>;

    /// Removes records with this name, returning how many were removed.
    async fn delete_by_name(&self, name: &str) -> BackendResult<u64>;

    /// Finds records with exactly this name, in store order.
    async fn find_by_name(&self, name: &str) -> BackendResult<Vec<EmployeePayroll>>;

    /// Average salary per gender code.
    async fn average_salary_by_gender(&self) -> BackendResult<GenderSalaryMap>;

    /// Number of stored records.
    async fn count(&self) -> BackendResult<usize> {
        Ok(self.list().await?.len())
    }

    /// Overwrites the store's contents with `records`.
    async fn replace_all(&self, _records: &[EmployeePayroll]) -> BackendResult<()> {
        Err(BackendError::Unsupported("replace_all"))
    }

    /// True if the store can currently answer queries.
    async fn health_check(&self) -> bool {
        self.count().await.is_ok()
    }
}
