//! SQLite-backed store.
//!
//! A thin adapter from [`PayrollStore`] onto the `payroll-db` employee
//! repository. Removal is a soft delete: `list` and `find_by_name` still
//! return removed rows, while `list_active`, `count` and the aggregate ignore
//! them. The store is healthy only when the pool answers and every embedded
//! migration has been applied.

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, warn};

use super::PayrollStore;
use crate::error::BackendResult;
use payroll_core::{EmployeePayroll, GenderSalaryMap, NewEmployee};
use payroll_db::{Database, EmployeeRepository};

/// Store over a `payroll-db` connection pool.
#[derive(Debug, Clone)]
pub struct DatabaseStore {
    db: Database,
}

impl DatabaseStore {
    pub fn new(db: Database) -> Self {
        DatabaseStore { db }
    }

    fn employees(&self) -> EmployeeRepository {
        self.db.employees()
    }
}

#[async_trait]
impl PayrollStore for DatabaseStore {
    async fn list(&self) -> BackendResult<Vec<EmployeePayroll>> {
        Ok(self.employees().list().await?)
    }

    async fn list_active(&self) -> BackendResult<Vec<EmployeePayroll>> {
        Ok(self.employees().list_active().await?)
    }

    async fn list_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> BackendResult<Vec<EmployeePayroll>> {
        Ok(self.employees().list_by_date_range(start, end).await?)
    }

    async fn insert(&self, employee: NewEmployee) -> BackendResult<EmployeePayroll> {
        Ok(self.employees().insert(&employee).await?)
    }

    async fn update_by_name(&self, name: &str, salary: f64) -> BackendResult<u64> {
        Ok(self.employees().update_salary_by_name(name, salary).await?)
    }

    async fn delete_by_name(&self, name: &str) -> BackendResult<u64> {
        Ok(self.employees().delete_by_name(name).await?)
    }

    async fn find_by_name(&self, name: &str) -> BackendResult<Vec<EmployeePayroll>> {
        Ok(self.employees().find_by_name(name).await?)
    }

    async fn average_salary_by_gender(&self) -> BackendResult<GenderSalaryMap> {
        Ok(self.employees().average_salary_by_gender().await?)
    }

    async fn count(&self) -> BackendResult<usize> {
        let count = self.employees().count().await?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    async fn health_check(&self) -> bool {
        if !self.db.health_check().await {
            return false;
        }

        match self.db.migration_status().await {
            Ok((embedded, applied)) if applied >= embedded => {
                debug!(embedded, applied, "Payroll schema current");
                true
            }
            Ok((embedded, applied)) => {
                warn!(embedded, applied, "Payroll schema has pending migrations");
                false
            }
            Err(e) => {
                warn!(error = %e, "Could not read migration status");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use payroll_db::DbConfig;

    async fn store() -> DatabaseStore {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        DatabaseStore::new(db)
    }

    fn new_employee(name: &str, salary: f64, gender: char) -> NewEmployee {
        NewEmployee {
            name: name.to_string(),
            salary,
            start_date: NaiveDate::from_ymd_opt(2019, 11, 13),
            gender: Some(gender),
        }
    }

    #[tokio::test]
    async fn test_insert_returns_assigned_id() {
        let store = store().await;

        let mark = store.insert(new_employee("Mark", 200.0, 'M')).await.unwrap();
        assert!(mark.is_persisted());
        assert_eq!(store.find_by_name("Mark").await.unwrap(), vec![mark]);
    }

    #[tokio::test]
    async fn test_soft_delete_visibility() {
        let store = store().await;
        store.insert(new_employee("Mark", 200.0, 'M')).await.unwrap();
        store.insert(new_employee("Terisa", 300.0, 'F')).await.unwrap();

        assert_eq!(store.delete_by_name("Mark").await.unwrap(), 1);

        assert_eq!(store.list().await.unwrap().len(), 2);
        assert_eq!(store.list_active().await.unwrap().len(), 1);
        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(store.find_by_name("Mark").await.unwrap().len(), 1);

        let averages = store.average_salary_by_gender().await.unwrap();
        assert!(!averages.contains_key(&'M'));
        assert_eq!(averages[&'F'], 300.0);
    }

    #[tokio::test]
    async fn test_update_reports_affected_rows() {
        let store = store().await;
        store.insert(new_employee("Terisa", 300.0, 'F')).await.unwrap();

        assert_eq!(store.update_by_name("Terisa", 3_000_000.0).await.unwrap(), 1);
        assert_eq!(store.update_by_name("Nobody", 1.0).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_replace_all_is_unsupported() {
        let store = store().await;
        assert!(store.replace_all(&[]).await.is_err());
    }

    #[tokio::test]
    async fn test_health_check_follows_pool() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = DatabaseStore::new(db.clone());
        assert!(store.health_check().await);

        db.close().await;
        assert!(!store.health_check().await);
    }

    #[tokio::test]
    async fn test_pending_migrations_are_unhealthy() {
        let config = DbConfig {
            run_migrations: false,
            ..DbConfig::in_memory()
        };
        let db = Database::new(config).await.unwrap();
        let store = DatabaseStore::new(db.clone());
        assert!(!store.health_check().await);

        db.run_migrations().await.unwrap();
        assert!(store.health_check().await);
    }
}
