//! # File Store
//!
//! Keeps payroll records in a JSON Lines file: one record per line.
//!
//! ```text
//! {"id":1,"name":"Bill","salary":100000.0,"startDate":"2018-01-03","gender":"M"}
//! {"id":2,"name":"Terisa","salary":200000.0,"startDate":"2019-11-13","gender":"F"}
//! ```
//!
//! A missing file reads as an empty store. Every write rewrites the whole
//! file; new ids are `max(id) + 1`.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::PayrollStore;
use crate::error::{BackendError, BackendResult};
use payroll_core::{
    average_salary_by_gender, started_within, EmployeePayroll, GenderSalaryMap, NewEmployee,
};

/// JSON Lines backed store.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles.
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Creates a store over `path`. Nothing is touched until the first call.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn read_records(&self) -> BackendResult<Vec<EmployeePayroll>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Payroll file missing, treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str::<EmployeePayroll>(line).map_err(BackendError::from))
            .collect()
    }

    async fn write_records(&self, records: &[EmployeePayroll]) -> BackendResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let mut contents = String::new();
        for record in records {
            contents.push_str(&serde_json::to_string(record)?);
            contents.push('\n');
        }

        tokio::fs::write(&self.path, contents).await?;
        debug!(path = %self.path.display(), count = records.len(), "Payroll file written");
        Ok(())
    }
}

#[async_trait]
impl PayrollStore for FileStore {
    async fn list(&self) -> BackendResult<Vec<EmployeePayroll>> {
        self.read_records().await
    }

    async fn list_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> BackendResult<Vec<EmployeePayroll>> {
        let records = self.read_records().await?;
        Ok(records
            .into_iter()
            .filter(|record| started_within(record, start, end))
            .collect())
    }

    async fn insert(&self, employee: NewEmployee) -> BackendResult<EmployeePayroll> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.read_records().await?;
        let id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let record = employee.into_record(id);

        records.push(record.clone());
        self.write_records(&records).await?;

        debug!(id, name = %record.name, "Employee appended to payroll file");
        Ok(record)
    }

    async fn update_by_name(&self, name: &str, salary: f64) -> BackendResult<u64> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.read_records().await?;
        let mut affected = 0;
        for record in records.iter_mut().filter(|r| r.name == name) {
            record.salary = salary;
            affected += 1;
        }

        if affected > 0 {
            self.write_records(&records).await?;
        }
        Ok(affected)
    }

    async fn delete_by_name(&self, name: &str) -> BackendResult<u64> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.read_records().await?;
        let before = records.len();
        records.retain(|r| r.name != name);
        let affected = (before - records.len()) as u64;

        if affected > 0 {
            self.write_records(&records).await?;
        }
        Ok(affected)
    }

    async fn find_by_name(&self, name: &str) -> BackendResult<Vec<EmployeePayroll>> {
        let records = self.read_records().await?;
        Ok(records.into_iter().filter(|r| r.name == name).collect())
    }

    async fn average_salary_by_gender(&self) -> BackendResult<GenderSalaryMap> {
        let records = self.read_records().await?;
        Ok(average_salary_by_gender(&records))
    }

    async fn replace_all(&self, records: &[EmployeePayroll]) -> BackendResult<()> {
        let _guard = self.write_lock.lock().await;

        self.write_records(records).await?;
        info!(path = %self.path.display(), count = records.len(), "Payroll file replaced");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("payroll.jsonl"));

        assert!(store.list().await.unwrap().is_empty());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_insert_assigns_next_id_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("payroll.jsonl");
        let store = FileStore::new(&path);

        let bill = store
            .insert(new_employee("Bill", 100.0, date(2018, 1, 3), 'M'))
            .await
            .unwrap();
        let terisa = store
            .insert(new_employee("Terisa", 200.0, date(2019, 11, 13), 'F'))
            .await
            .unwrap();
        assert_eq!((bill.id, terisa.id), (1, 2));

        // A fresh handle over the same file sees the same data
        let reopened = FileStore::new(&path);
        assert_eq!(reopened.list().await.unwrap(), vec![bill, terisa]);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.contains("\"startDate\":\"2018-01-03\""));
    }

    #[tokio::test]
    async fn test_update_and_delete_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("payroll.jsonl"));
        store
            .insert(new_employee("Bill", 100.0, date(2018, 1, 3), 'M'))
            .await
            .unwrap();
        store
            .insert(new_employee("Terisa", 200.0, date(2019, 11, 13), 'F'))
            .await
            .unwrap();

        assert_eq!(store.update_by_name("Terisa", 300.0).await.unwrap(), 1);
        assert_eq!(store.update_by_name("Nobody", 1.0).await.unwrap(), 0);
        assert_eq!(store.find_by_name("Terisa").await.unwrap()[0].salary, 300.0);

        assert_eq!(store.delete_by_name("Bill").await.unwrap(), 1);
        assert_eq!(store.delete_by_name("Bill").await.unwrap(), 0);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_range_and_average() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("payroll.jsonl"));
        store
            .replace_all(&[
                EmployeePayroll::with_details(1, "Bill", 100.0, date(2018, 1, 3), 'M'),
                EmployeePayroll::with_details(2, "Terisa", 200.0, date(2019, 11, 13), 'F'),
                EmployeePayroll::with_details(3, "Charlie", 300.0, date(2020, 5, 21), 'M'),
            ])
            .await
            .unwrap();

        let in_range = store
            .list_by_date_range(date(2019, 1, 1), date(2020, 12, 31))
            .await
            .unwrap();
        assert_eq!(in_range.len(), 2);

        let averages = store.average_salary_by_gender().await.unwrap();
        assert_eq!(averages[&'M'], 200.0);
        assert_eq!(averages[&'F'], 200.0);
    }

    #[tokio::test]
    async fn test_corrupt_line_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payroll.jsonl");
        std::fs::write(&path, "{\"name\":\"Bill\",\"salary\":1.0}\nnot json\n").unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(
            store.list().await,
            Err(BackendError::Serialization(_))
        ));
    }
}
