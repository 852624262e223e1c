//! # REST Store
//!
//! Talks to a json-server style collection resource.
//!
//! ## Resource Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET    {base}/employees            → 200 [record, ...]                 │
//! │  GET    {base}/employees?name=<n>   → 200 [record, ...]                 │
//! │  POST   {base}/employees            → 201 record (server-assigned id)   │
//! │  PUT    {base}/employees/{id}       → 200 record                        │
//! │  DELETE {base}/employees/{id}       → 200                               │
//! │                                                                         │
//! │  Any other status → BackendError::UnexpectedStatus                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The server has no range or aggregate endpoints; those are computed here
//! from the full listing. Updates and deletes by name look the matches up
//! first and then issue one request per id.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Response, StatusCode};
use tracing::debug;
use url::Url;

use super::PayrollStore;
use crate::error::{BackendError, BackendResult};
use payroll_core::{
    average_salary_by_gender, started_within, EmployeePayroll, GenderSalaryMap, NewEmployee,
};

const COLLECTION: &str = "employees";

/// HTTP client for the employee collection resource.
#[derive(Debug, Clone)]
pub struct RestStore {
    client: Client,
    base_url: Url,
}

impl RestStore {
    /// Creates a store rooted at `base_url` (e.g. `http://localhost:3000`).
    pub fn new(base_url: &str, timeout: Duration) -> BackendResult<Self> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(RestStore { client, base_url })
    }

    /// Returns the normalized base URL (always ends in `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn collection_url(&self) -> BackendResult<Url> {
        Ok(self.base_url.join(COLLECTION)?)
    }

    fn item_url(&self, id: i64) -> BackendResult<Url> {
        Ok(self.base_url.join(&format!("{COLLECTION}/{id}"))?)
    }

    async fn fetch(&self, url: Url) -> BackendResult<Vec<EmployeePayroll>> {
        let response = self.client.get(url).send().await?;
        let records: Vec<EmployeePayroll> = expect_status(response, StatusCode::OK)
            .await?
            .json()
            .await?;

        debug!(count = records.len(), "Fetched employees over REST");
        Ok(records)
    }
}

/// Passes the response through only if it carries `expected`.
async fn expect_status(response: Response, expected: StatusCode) -> BackendResult<Response> {
    let status = response.status();
    if status != expected {
        return Err(BackendError::UnexpectedStatus {
            status: status.as_u16(),
            url: response.url().to_string(),
        });
    }
    Ok(response)
}

#[async_trait]
impl PayrollStore for RestStore {
    async fn list(&self) -> BackendResult<Vec<EmployeePayroll>> {
        self.fetch(self.collection_url()?).await
    }

    async fn list_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> BackendResult<Vec<EmployeePayroll>> {
        let records = self.list().await?;
        Ok(records
            .into_iter()
            .filter(|record| started_within(record, start, end))
            .collect())
    }

    async fn insert(&self, employee: NewEmployee) -> BackendResult<EmployeePayroll> {
        debug!(name = %employee.name, "Posting employee");

        let response = self
            .client
            .post(self.collection_url()?)
            .json(&employee)
            .send()
            .await?;

        let created: EmployeePayroll = expect_status(response, StatusCode::CREATED)
            .await?
            .json()
            .await?;

        debug!(id = created.id, name = %created.name, "Employee created on server");
        Ok(created)
    }

    async fn update_by_name(&self, name: &str, salary: f64) -> BackendResult<u64> {
        let mut affected = 0;
        for mut record in self.find_by_name(name).await? {
            record.salary = salary;

            let response = self
                .client
                .put(self.item_url(record.id)?)
                .json(&record)
                .send()
                .await?;
            expect_status(response, StatusCode::OK).await?;

            debug!(id = record.id, salary, "Employee salary updated on server");
            affected += 1;
        }
        Ok(affected)
    }

    async fn delete_by_name(&self, name: &str) -> BackendResult<u64> {
        let mut affected = 0;
        for record in self.find_by_name(name).await? {
            let response = self.client.delete(self.item_url(record.id)?).send().await?;
            expect_status(response, StatusCode::OK).await?;

            debug!(id = record.id, "Employee deleted on server");
            affected += 1;
        }
        Ok(affected)
    }

    async fn find_by_name(&self, name: &str) -> BackendResult<Vec<EmployeePayroll>> {
        let mut url = self.collection_url()?;
        url.query_pairs_mut().append_pair("name", name);

        // Servers that ignore the filter still get a correct answer
        let records = self.fetch(url).await?;
        Ok(records.into_iter().filter(|r| r.name == name).collect())
    }

    async fn average_salary_by_gender(&self) -> BackendResult<GenderSalaryMap> {
        let records = self.list().await?;
        Ok(average_salary_by_gender(&records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, Query, State};
    use axum::routing::get;
    use axum::{Json, Router};

    type Db = Arc<Mutex<Vec<EmployeePayroll>>>;

    async fn list_employees(
        State(db): State<Db>,
        Query(params): Query<HashMap<String, String>>,
    ) -> Json<Vec<EmployeePayroll>> {
        let records = db.lock().unwrap();
        let matching = records
            .iter()
            .filter(|r| params.get("name").map_or(true, |n| &r.name == n))
            .cloned()
            .collect();
        Json(matching)
    }

    async fn create_employee(
        State(db): State<Db>,
        Json(employee): Json<NewEmployee>,
    ) -> (axum::http::StatusCode, Json<EmployeePayroll>) {
        let mut records = db.lock().unwrap();
        let id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let record = employee.into_record(id);
        records.push(record.clone());
        (axum::http::StatusCode::CREATED, Json(record))
    }

    async fn replace_employee(
        State(db): State<Db>,
        Path(id): Path<i64>,
        Json(record): Json<EmployeePayroll>,
    ) -> Result<Json<EmployeePayroll>, axum::http::StatusCode> {
        let mut records = db.lock().unwrap();
        let slot = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(axum::http::StatusCode::NOT_FOUND)?;
        *slot = EmployeePayroll { id, ..record };
        Ok(Json(slot.clone()))
    }

    async fn delete_employee(
        State(db): State<Db>,
        Path(id): Path<i64>,
    ) -> axum::http::StatusCode {
        let mut records = db.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            axum::http::StatusCode::NOT_FOUND
        } else {
            axum::http::StatusCode::OK
        }
    }

    async fn spawn_server(db: Db) -> String {
        let app = Router::new()
            .route("/employees", get(list_employees).post(create_employee))
            .route(
                "/employees/{id}",
                axum::routing::put(replace_employee).delete(delete_employee),
            )
            .with_state(db);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seeded() -> Db {
        Arc::new(Mutex::new(vec![
            EmployeePayroll::with_details(1, "Bill", 100.0, date(2018, 1, 3), 'M'),
            EmployeePayroll::with_details(2, "Terisa", 200.0, date(2019, 11, 13), 'F'),
        ]))
    }

    fn client(base: &str) -> RestStore {
        RestStore::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_base_url_normalized() {
        let store = client("http://localhost:3000/api");
        assert_eq!(store.base_url().as_str(), "http://localhost:3000/api/");
        assert_eq!(
            store.item_url(7).unwrap().as_str(),
            "http://localhost:3000/api/employees/7"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            RestStore::new("not a url", Duration::from_secs(1)),
            Err(BackendError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_list_and_find() {
        let base = spawn_server(seeded()).await;
        let store = client(&base);

        assert_eq!(store.list().await.unwrap().len(), 2);

        let found = store.find_by_name("Terisa").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 2);
        assert!(store.find_by_name("Nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_uses_server_id() {
        let db = seeded();
        let base = spawn_server(db.clone()).await;
        let store = client(&base);

        let created = store
            .insert(NewEmployee {
                name: "Anil".into(),
                salary: 500.0,
                start_date: Some(date(2020, 5, 21)),
                gender: Some('M'),
            })
            .await
            .unwrap();

        assert_eq!(created.id, 3);
        assert_eq!(db.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_update_and_delete_by_name() {
        let db = seeded();
        let base = spawn_server(db.clone()).await;
        let store = client(&base);

        assert_eq!(store.update_by_name("Bill", 150.0).await.unwrap(), 1);
        assert_eq!(db.lock().unwrap()[0].salary, 150.0);
        assert_eq!(store.update_by_name("Nobody", 1.0).await.unwrap(), 0);

        assert_eq!(store.delete_by_name("Bill").await.unwrap(), 1);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_client_side_range_and_average() {
        let base = spawn_server(seeded()).await;
        let store = client(&base);

        let in_range = store
            .list_by_date_range(date(2019, 1, 1), date(2019, 12, 31))
            .await
            .unwrap();
        assert_eq!(in_range.len(), 1);

        let averages = store.average_salary_by_gender().await.unwrap();
        assert_eq!(averages[&'M'], 100.0);
        assert_eq!(averages[&'F'], 200.0);
    }

    #[tokio::test]
    async fn test_unexpected_status_is_reported() {
        let app = Router::new().route(
            "/employees",
            get(|| async { axum::http::StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let store = client(&format!("http://{}", addr));
        assert!(matches!(
            store.list().await,
            Err(BackendError::UnexpectedStatus { status: 500, .. })
        ));
    }
}
