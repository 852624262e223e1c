//! # Payroll Service
//!
//! The façade every caller goes through. It owns the roster and routes each
//! operation by an explicit [`BackendKind`] selector.
//!
//! ## Dispatch
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    PayrollService::op(selector, ..)                     │
//! │                                                                         │
//! │   InMemory ──────────────► mutate / read roster directly                │
//! │                                                                         │
//! │   File ─────┐                                                           │
//! │   Database ─┼──► store lookup ──► store call ──► refresh roster         │
//! │   Rest ─────┘       │                                                   │
//! │                     └── not injected → BackendNotConfigured             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Deliberate Asymmetries
//! - `update_salary` on a persistent backend touches the roster only when the
//!   backend reports an affected row; a backend hit with no roster match
//!   leaves the two out of step.
//! - `remove` on `Database`/`File` only calls the backend. `Rest` and
//!   `InMemory` only drop the first roster match.
//! - `average_salary_by_gender` never fails; it logs and returns the cached
//!   view instead.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, error, info, warn};

use crate::config::PayrollConfig;
use crate::error::{PayrollError, PayrollResult};
use crate::store::{DatabaseStore, FileStore, PayrollStore, RestStore};
use payroll_core::validation::validate_date_range;
use payroll_core::{BackendKind, EmployeePayroll, GenderSalaryMap};
use payroll_db::Database;

// =============================================================================
// Batch Report
// =============================================================================

/// One record `add_batch` could not add.
#[derive(Debug)]
pub struct BatchFailure {
    pub name: String,
    pub error: PayrollError,
}

/// Outcome of [`PayrollService::add_batch`].
#[derive(Debug, Default)]
pub struct BatchReport {
    pub added: usize,
    pub failed: Vec<BatchFailure>,
}

impl BatchReport {
    /// True when every record was added.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Assembles a [`PayrollService`] from an initial roster and backend handles.
#[derive(Default)]
pub struct PayrollServiceBuilder {
    roster: Vec<EmployeePayroll>,
    stores: HashMap<BackendKind, Arc<dyn PayrollStore>>,
}

impl PayrollServiceBuilder {
    /// Registers the stores for `backends` as described by `config`.
    ///
    /// Only the SQLite database is opened (and migrated) here, and only when
    /// `Database` is requested; the file and REST stores are not touched
    /// until first use. `InMemory` needs no store and is skipped.
    pub async fn from_config(
        config: &PayrollConfig,
        backends: &[BackendKind],
    ) -> PayrollResult<Self> {
        let mut builder = Self::default();

        for &kind in backends {
            if builder.stores.contains_key(&kind) {
                continue;
            }
            let store: Arc<dyn PayrollStore> = match kind {
                BackendKind::InMemory => continue,
                BackendKind::File => Arc::new(FileStore::new(&config.file.path)),
                BackendKind::Database => {
                    Arc::new(DatabaseStore::new(Database::new(config.db_config()).await?))
                }
                BackendKind::Rest => Arc::new(RestStore::new(
                    &config.rest.base_url,
                    config.rest_timeout(),
                )?),
            };
            builder = builder.store(kind, store);
        }

        Ok(builder)
    }

    /// Seeds the roster.
    pub fn roster(mut self, roster: Vec<EmployeePayroll>) -> Self {
        self.roster = roster;
        self
    }

    /// Registers the store answering for `kind`.
    ///
    /// A store registered under `InMemory` is never consulted.
    pub fn store(mut self, kind: BackendKind, store: Arc<dyn PayrollStore>) -> Self {
        if !kind.is_persistent() {
            warn!(backend = %kind, "Ignoring store registered for a non-persistent backend");
            return self;
        }
        self.stores.insert(kind, store);
        self
    }

    pub fn build(self) -> PayrollService {
        info!(
            roster = self.roster.len(),
            backends = self.stores.len(),
            "Payroll service ready"
        );
        PayrollService {
            roster: self.roster,
            gender_salary: GenderSalaryMap::new(),
            stores: self.stores,
        }
    }
}

// =============================================================================
// Payroll Service
// =============================================================================

/// Roster owner and backend dispatcher.
///
/// ## Example
/// ```rust,ignore
/// let mut service = PayrollService::builder()
///     .store(BackendKind::Database, Arc::new(DatabaseStore::new(db)))
///     .build();
///
/// service.read_all(BackendKind::Database).await?;
/// service.update_salary("Terisa", 3_000_000.0, BackendKind::Database).await?;
/// assert!(service.check_in_sync_with_backend("Terisa").await?);
/// ```
pub struct PayrollService {
    roster: Vec<EmployeePayroll>,
    gender_salary: GenderSalaryMap,
    stores: HashMap<BackendKind, Arc<dyn PayrollStore>>,
}

impl PayrollService {
    pub fn builder() -> PayrollServiceBuilder {
        PayrollServiceBuilder::default()
    }

    /// Creates a service with an empty roster and no backends.
    pub fn in_memory() -> Self {
        Self::builder().build()
    }

    /// Current roster, in insertion order.
    pub fn roster(&self) -> &[EmployeePayroll] {
        &self.roster
    }

    /// Last computed gender → average salary view.
    pub fn gender_salary_view(&self) -> &GenderSalaryMap {
        &self.gender_salary
    }

    /// First roster record with this name.
    pub fn find(&self, name: &str) -> Option<&EmployeePayroll> {
        self.roster.iter().find(|r| r.name == name)
    }

    /// Returns true if a store is registered for `kind`.
    pub fn has_backend(&self, kind: BackendKind) -> bool {
        self.stores.contains_key(&kind)
    }

    /// Health of every registered backend, in selector order.
    pub async fn health(&self) -> Vec<(BackendKind, bool)> {
        let mut report = Vec::new();
        for kind in BackendKind::ALL {
            if let Some(store) = self.stores.get(&kind) {
                let healthy = store.health_check().await;
                if !healthy {
                    warn!(backend = %kind, "Backend unhealthy");
                }
                report.push((kind, healthy));
            }
        }
        report
    }

    fn store(&self, kind: BackendKind) -> PayrollResult<Arc<dyn PayrollStore>> {
        self.stores
            .get(&kind)
            .cloned()
            .ok_or(PayrollError::BackendNotConfigured(kind))
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Returns the roster, first replacing it with the backend's listing when
    /// `selector` is persistent.
    pub async fn read_all(&mut self, selector: BackendKind) -> PayrollResult<&[EmployeePayroll]> {
        if selector.is_persistent() {
            self.roster = self.store(selector)?.list().await?;
            debug!(backend = %selector, count = self.roster.len(), "Roster refreshed");
        }
        Ok(&self.roster)
    }

    /// Like [`read_all`](Self::read_all) but skips records the backend has
    /// marked removed.
    pub async fn read_active(
        &mut self,
        selector: BackendKind,
    ) -> PayrollResult<&[EmployeePayroll]> {
        if selector.is_persistent() {
            self.roster = self.store(selector)?.list_active().await?;
            debug!(backend = %selector, count = self.roster.len(), "Roster refreshed (active)");
        }
        Ok(&self.roster)
    }

    /// Replaces the roster with records that started in `[start, end]`.
    ///
    /// Only the database answers range queries; every other selector returns
    /// the roster unchanged. The range is checked for every selector.
    pub async fn read_by_date_range(
        &mut self,
        selector: BackendKind,
        start: NaiveDate,
        end: NaiveDate,
    ) -> PayrollResult<&[EmployeePayroll]> {
        validate_date_range(start, end)?;

        if selector == BackendKind::Database {
            self.roster = self.store(selector)?.list_by_date_range(start, end).await?;
            debug!(%start, %end, count = self.roster.len(), "Roster refreshed by date range");
        }
        Ok(&self.roster)
    }

    /// Average salary per gender.
    ///
    /// With `Database` the cached view is recomputed from the backend; other
    /// selectors return the cached view as it stands. An empty result is
    /// logged as [`PayrollError::NoData`] at `warn` and a backend failure at
    /// `error`; neither reaches the caller.
    pub async fn average_salary_by_gender(&mut self, selector: BackendKind) -> GenderSalaryMap {
        if selector == BackendKind::Database {
            let result = match self.store(selector) {
                Ok(store) => store.average_salary_by_gender().await.map_err(PayrollError::from),
                Err(e) => Err(e),
            };

            match result {
                Ok(view) => self.gender_salary = view,
                Err(e) => error!(error = %e, "Failed to compute average salary by gender"),
            }
        }

        if self.gender_salary.is_empty() {
            warn!(backend = %selector, error = %PayrollError::NoData, "Average salary by gender is empty");
        }

        self.gender_salary.clone()
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Adds a record.
    ///
    /// With a persistent selector the record is inserted and the backend's
    /// copy (carrying its id) is appended to the roster and returned.
    /// Otherwise the record is appended as given. Field values are passed
    /// through unchecked.
    pub async fn add(
        &mut self,
        record: EmployeePayroll,
        selector: BackendKind,
    ) -> PayrollResult<EmployeePayroll> {
        let record = if selector.is_persistent() {
            self.store(selector)?
                .insert(record.to_new_employee())
                .await?
        } else {
            record
        };

        debug!(backend = %selector, id = record.id, name = %record.name, "Employee appended to roster");
        self.roster.push(record.clone());
        Ok(record)
    }

    /// Adds records one at a time. Failures are logged and skipped; the
    /// batch always runs to the end.
    pub async fn add_batch(
        &mut self,
        records: Vec<EmployeePayroll>,
        selector: BackendKind,
    ) -> BatchReport {
        let mut report = BatchReport::default();

        for record in records {
            let name = record.name.clone();
            info!(name = %name, "Employee being added");

            match self.add(record, selector).await {
                Ok(added) => {
                    info!(id = added.id, name = %name, "Employee added");
                    report.added += 1;
                }
                Err(e) => {
                    error!(name = %name, error = %e, "Employee could not be added");
                    report.failed.push(BatchFailure { name, error: e });
                }
            }
        }

        report
    }

    /// Sets the salary of the first roster record named `name`.
    ///
    /// With a persistent selector the backend is updated first; if it reports
    /// no affected rows the roster is left alone. Returns whether a roster
    /// record changed.
    pub async fn update_salary(
        &mut self,
        name: &str,
        salary: f64,
        selector: BackendKind,
    ) -> PayrollResult<bool> {
        if selector.is_persistent() {
            let affected = self.store(selector)?.update_by_name(name, salary).await?;
            if affected == 0 {
                debug!(backend = %selector, name = %name, "Backend matched nobody, roster untouched");
                return Ok(false);
            }
        }

        match self.roster.iter_mut().find(|r| r.name == name) {
            Some(record) => {
                record.salary = salary;
                debug!(name = %name, salary, "Roster salary updated");
                Ok(true)
            }
            None => {
                if selector.is_persistent() {
                    warn!(name = %name, "Backend updated but roster has no such employee");
                }
                Ok(false)
            }
        }
    }

    /// Removes employees named `name`.
    ///
    /// `Database` and `File` delete in the backend and return its affected
    /// count without touching the roster. `Rest` and `InMemory` drop the
    /// first roster match and return `1` or `0`.
    pub async fn remove(&mut self, name: &str, selector: BackendKind) -> PayrollResult<u64> {
        match selector {
            BackendKind::Database | BackendKind::File => {
                let affected = self.store(selector)?.delete_by_name(name).await?;
                debug!(backend = %selector, name = %name, affected, "Employee removed from backend");
                Ok(affected)
            }
            BackendKind::Rest | BackendKind::InMemory => {
                match self.roster.iter().position(|r| r.name == name) {
                    Some(index) => {
                        self.roster.remove(index);
                        debug!(name = %name, "Employee removed from roster");
                        Ok(1)
                    }
                    None => Ok(0),
                }
            }
        }
    }

    // =========================================================================
    // Consistency
    // =========================================================================

    /// Compares the roster's record for `name` with the database's.
    ///
    /// ## Returns
    /// * `Ok(true)` - First backend match equals the roster's first match
    /// * `Ok(false)` - They differ, or the roster has no such record
    /// * `Err(PayrollError::NotFound)` - The database has no such record
    pub async fn check_in_sync_with_backend(&self, name: &str) -> PayrollResult<bool> {
        let backend = self
            .store(BackendKind::Database)?
            .find_by_name(name)
            .await?;

        let stored = backend
            .first()
            .ok_or_else(|| PayrollError::not_found(name))?;

        let in_sync = self.find(name) == Some(stored);
        debug!(name = %name, in_sync, "Checked roster against backend");
        Ok(in_sync)
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// Writes the roster out.
    ///
    /// `InMemory` logs each record; `File` replaces the file's contents with
    /// the roster. `Database` and `Rest` are already current and do nothing.
    pub async fn write(&self, selector: BackendKind) -> PayrollResult<()> {
        match selector {
            BackendKind::InMemory => {
                for record in &self.roster {
                    info!(%record, "Employee payroll");
                }
            }
            BackendKind::File => {
                self.store(selector)?.replace_all(&self.roster).await?;
            }
            BackendKind::Database | BackendKind::Rest => {
                debug!(backend = %selector, "Nothing to write, backend is already current");
            }
        }
        Ok(())
    }

    /// Logs and returns the records held by `selector`.
    ///
    /// `File` reads the file; every other selector shows the roster.
    pub async fn print(&self, selector: BackendKind) -> PayrollResult<Vec<EmployeePayroll>> {
        let records = match selector {
            BackendKind::File => self.store(selector)?.list().await?,
            _ => self.roster.clone(),
        };

        for record in &records {
            info!(backend = %selector, %record, "Employee payroll");
        }
        Ok(records)
    }

    /// Number of entries: the file's record count for `File`, otherwise the
    /// roster length.
    pub async fn count_entries(&self, selector: BackendKind) -> PayrollResult<usize> {
        match selector {
            BackendKind::File => Ok(self.store(selector)?.count().await?),
            _ => Ok(self.roster.len()),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
