//! # Employee Payroll Repository
//!
//! Database operations for employee payroll records.
//!
//! ## Row Visibility
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 employee_payroll (is_active column)                     │
//! │                                                                         │
//! │  list / find_by_name          → every row, active or not               │
//! │  list_by_date_range           → every row, active or not               │
//! │  list_active                  → is_active = 1                          │
//! │  update / delete by name      → is_active = 1                          │
//! │  average_salary_by_gender     → is_active = 1, gender NOT NULL         │
//! │                                                                         │
//! │  delete_by_name is a soft delete: it flips is_active to 0, so the      │
//! │  record stays visible to `list` (and to payroll history).              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use payroll_core::{EmployeePayroll, GenderSalaryMap, NewEmployee};

/// Column list shared by every SELECT.
const EMPLOYEE_COLUMNS: &str = "id, name, salary, start_date, gender";

/// Raw row shape; `gender` is stored as one-character TEXT.
#[derive(Debug, sqlx::FromRow)]
struct EmployeeRow {
    id: i64,
    name: String,
    salary: f64,
    start_date: Option<NaiveDate>,
    gender: Option<String>,
}

impl From<EmployeeRow> for EmployeePayroll {
    fn from(row: EmployeeRow) -> Self {
        EmployeePayroll {
            id: row.id,
            name: row.name,
            salary: row.salary,
            start_date: row.start_date,
            gender: row.gender.and_then(|g| g.chars().next()),
        }
    }
}

/// Repository for employee payroll database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = EmployeeRepository::new(pool);
///
/// let everyone = repo.list().await?;
/// let affected = repo.update_salary_by_name("Terisa", 3000000.0).await?;
/// ```
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    pool: SqlitePool,
}

impl EmployeeRepository {
    /// Creates a new EmployeeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        EmployeeRepository { pool }
    }

    /// Lists every employee, ordered by id.
    pub async fn list(&self) -> DbResult<Vec<EmployeePayroll>> {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employee_payroll ORDER BY id");
        self.fetch(&sql).await
    }

    /// Lists employees that have not been removed.
    pub async fn list_active(&self) -> DbResult<Vec<EmployeePayroll>> {
        let sql = format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employee_payroll WHERE is_active = 1 ORDER BY id"
        );
        self.fetch(&sql).await
    }

    /// Lists employees whose start date lies in `[start, end]` (inclusive).
    ///
    /// Rows without a start date never match.
    pub async fn list_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<Vec<EmployeePayroll>> {
        debug!(%start, %end, "Listing employees by start date");

        let sql = format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employee_payroll \
             WHERE start_date BETWEEN ?1 AND ?2 ORDER BY id"
        );

        let rows = sqlx::query_as::<_, EmployeeRow>(&sql)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(EmployeePayroll::from).collect())
    }

    /// Finds employees by exact name, ordered by id.
    ///
    /// Sees the same rows as [`list`](Self::list), removed ones included.
    pub async fn find_by_name(&self, name: &str) -> DbResult<Vec<EmployeePayroll>> {
        let sql =
            format!("SELECT {EMPLOYEE_COLUMNS} FROM employee_payroll WHERE name = ?1 ORDER BY id");

        let rows = sqlx::query_as::<_, EmployeeRow>(&sql)
            .bind(name)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(EmployeePayroll::from).collect())
    }

    /// Inserts a new employee; SQLite assigns the id.
    ///
    /// ## Returns
    /// * `Ok(EmployeePayroll)` - The stored record, carrying its new id
    pub async fn insert(&self, employee: &NewEmployee) -> DbResult<EmployeePayroll> {
        debug!(name = %employee.name, "Inserting employee");

        let result = sqlx::query(
            r#"
            INSERT INTO employee_payroll (name, salary, start_date, gender)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&employee.name)
        .bind(employee.salary)
        .bind(employee.start_date)
        .bind(employee.gender.map(String::from))
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(id, name = %employee.name, "Employee inserted");

        Ok(employee.clone().into_record(id))
    }

    /// Sets the salary of every active employee with this name.
    ///
    /// ## Returns
    /// The number of rows touched; `0` means nobody matched.
    pub async fn update_salary_by_name(&self, name: &str, salary: f64) -> DbResult<u64> {
        debug!(name = %name, salary, "Updating salary");

        let result = sqlx::query(
            "UPDATE employee_payroll SET salary = ?2 WHERE name = ?1 AND is_active = 1",
        )
        .bind(name)
        .bind(salary)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Soft-deletes every active employee with this name.
    ///
    /// ## Returns
    /// The number of rows deactivated.
    pub async fn delete_by_name(&self, name: &str) -> DbResult<u64> {
        debug!(name = %name, "Soft-deleting employee");

        let result = sqlx::query(
            "UPDATE employee_payroll SET is_active = 0 WHERE name = ?1 AND is_active = 1",
        )
        .bind(name)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Average salary of active employees, grouped by gender code.
    pub async fn average_salary_by_gender(&self) -> DbResult<GenderSalaryMap> {
        let rows = sqlx::query_as::<_, (String, f64)>(
            r#"
            SELECT gender, AVG(salary) AS average_salary
            FROM employee_payroll
            WHERE is_active = 1 AND gender IS NOT NULL
            GROUP BY gender
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(groups = rows.len(), "Computed average salary by gender");

        Ok(rows
            .into_iter()
            .filter_map(|(gender, average)| gender.chars().next().map(|g| (g, average)))
            .collect())
    }

    /// Counts active employees (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM employee_payroll WHERE is_active = 1")
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    async fn fetch(&self, sql: &str) -> DbResult<Vec<EmployeePayroll>> {
        let rows = sqlx::query_as::<_, EmployeeRow>(sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Fetched employees");
        Ok(rows.into_iter().map(EmployeePayroll::from).collect())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_employee(name: &str, salary: f64, start: NaiveDate, gender: char) -> NewEmployee {
        NewEmployee {
            name: name.to_string(),
            salary,
            start_date: Some(start),
            gender: Some(gender),
        }
    }

    async fn seeded_repo() -> EmployeeRepository {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.employees();

        repo.insert(&new_employee("Bill", 100000.0, date(2018, 1, 3), 'M'))
            .await
            .unwrap();
        repo.insert(&new_employee("Terisa", 200000.0, date(2019, 11, 13), 'F'))
            .await
            .unwrap();
        repo.insert(&new_employee("Charlie", 300000.0, date(2020, 5, 21), 'M'))
            .await
            .unwrap();

        repo
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let repo = seeded_repo().await;

        let mark = repo
            .insert(&new_employee("Mark", 500.0, date(2021, 1, 1), 'M'))
            .await
            .unwrap();
        assert_eq!(mark.id, 4);
        assert_eq!(repo.find_by_name("Mark").await.unwrap(), vec![mark]);
    }

    #[tokio::test]
    async fn test_insert_without_optional_fields() {
        let repo = seeded_repo().await;

        let minimal = NewEmployee {
            name: "Anil".to_string(),
            salary: 10.0,
            start_date: None,
            gender: None,
        };
        let stored = repo.insert(&minimal).await.unwrap();

        let found = repo.find_by_name("Anil").await.unwrap();
        assert_eq!(found, vec![stored]);
        assert_eq!(found[0].start_date, None);
    }

    #[tokio::test]
    async fn test_update_salary_reports_affected_rows() {
        let repo = seeded_repo().await;

        assert_eq!(repo.update_salary_by_name("Terisa", 3000000.0).await.unwrap(), 1);
        assert_eq!(repo.update_salary_by_name("Nobody", 1.0).await.unwrap(), 0);

        let terisa = repo.find_by_name("Terisa").await.unwrap();
        assert_eq!(terisa[0].salary, 3000000.0);
    }

    #[tokio::test]
    async fn test_delete_is_soft() {
        let repo = seeded_repo().await;

        assert_eq!(repo.delete_by_name("Bill").await.unwrap(), 1);
        assert_eq!(repo.delete_by_name("Bill").await.unwrap(), 0);

        assert_eq!(repo.list().await.unwrap().len(), 3);
        assert_eq!(repo.list_active().await.unwrap().len(), 2);
        assert_eq!(repo.count().await.unwrap(), 2);

        // Lookups by name agree with `list`
        let bill = repo.find_by_name("Bill").await.unwrap();
        assert_eq!(bill.len(), 1);
        assert!(repo.list().await.unwrap().contains(&bill[0]));
        assert_eq!(repo.update_salary_by_name("Bill", 1.0).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_by_date_range_is_inclusive() {
        let repo = seeded_repo().await;

        let in_range = repo
            .list_by_date_range(date(2018, 1, 3), date(2019, 11, 13))
            .await
            .unwrap();
        let names: Vec<_> = in_range.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Bill", "Terisa"]);

        let none = repo
            .list_by_date_range(date(2000, 1, 1), date(2001, 1, 1))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_average_salary_by_gender() {
        let repo = seeded_repo().await;

        let averages = repo.average_salary_by_gender().await.unwrap();
        assert_eq!(averages[&'M'], 200000.0);
        assert_eq!(averages[&'F'], 200000.0);

        repo.delete_by_name("Terisa").await.unwrap();
        let averages = repo.average_salary_by_gender().await.unwrap();
        assert!(!averages.contains_key(&'F'));
    }

    #[tokio::test]
    async fn test_average_salary_on_empty_table() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.employees().average_salary_by_gender().await.unwrap().is_empty());
    }
}
