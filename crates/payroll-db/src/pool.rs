//! # SQLite Pool
//!
//! Opens the payroll database and hands out repositories over it.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Payroll Database                                │
//! │                                                                         │
//! │  DbConfig::new("payroll.db")      DbConfig::in_memory()                 │
//! │        │  WAL, NORMAL sync              │  sqlite::memory:, 1 conn      │
//! │        └──────────────┬─────────────────┘                               │
//! │                       ▼                                                 │
//! │          Database::new(config).await                                    │
//! │                       │  connect pool, apply embedded migrations        │
//! │                       ▼                                                 │
//! │          db.employees() ──► EmployeeRepository (cheap pool clone)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! An in-memory database lives only as long as its single connection, so
//! its pool is pinned to one connection that is never idled out or recycled,
//! whatever `max_connections` says.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::employee::EmployeeRepository;

const MEMORY_MARKER: &str = ":memory:";

// =============================================================================
// DbConfig
// =============================================================================

/// How to open the payroll database.
///
/// ```rust,ignore
/// let config = DbConfig::new("./data/payroll.db").max_connections(2);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Database file, or `:memory:`.
    pub database_path: PathBuf,

    /// Pool ceiling (default 5).
    pub max_connections: u32,

    /// How long to wait for a free connection (default 30s).
    pub acquire_timeout: Duration,

    /// Apply embedded migrations after connecting (default on).
    pub run_migrations: bool,
}

impl DbConfig {
    /// File-backed database at `path`, created on first connect.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
            run_migrations: true,
        }
    }

    /// Private, throwaway database for tests and scratch runs.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(MEMORY_MARKER),
            max_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// True for configs built by [`DbConfig::in_memory`].
    pub fn is_in_memory(&self) -> bool {
        self.database_path == Path::new(MEMORY_MARKER)
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        if self.is_in_memory() {
            return SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()));
        }

        let options = SqliteConnectOptions::new()
            .filename(&self.database_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);
        Ok(options)
    }
}

// =============================================================================
// Database
// =============================================================================

/// Handle to the payroll database. Clones share one pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connects and, unless disabled, brings the schema up to date.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(path = %config.database_path.display(), "Opening payroll database");

        let options = config.connect_options()?;
        let pool_options = if config.is_in_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
                .max_connections(config.max_connections.max(1))
                .idle_timeout(Duration::from_secs(600))
        };

        let pool = pool_options
            .min_connections(1)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        debug!(
            max_connections = pool.options().get_max_connections(),
            "Pool connected"
        );

        let db = Database { pool };
        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies any pending embedded migrations.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await?;
        info!("Payroll schema up to date");
        Ok(())
    }

    /// `(embedded, applied)` migration counts.
    pub async fn migration_status(&self) -> DbResult<(usize, usize)> {
        migrations::migration_status(&self.pool).await
    }

    /// Repository over the `employee_payroll` table.
    pub fn employees(&self) -> EmployeeRepository {
        EmployeeRepository::new(self.pool.clone())
    }

    /// Closes every connection; later queries fail.
    pub async fn close(&self) {
        info!("Closing payroll database");
        self.pool.close().await;
    }

    /// Runs `SELECT 1`.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}
