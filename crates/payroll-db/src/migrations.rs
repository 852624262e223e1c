//! Embedded schema for the payroll database.
//!
//! The SQL under `migrations/sqlite/` is compiled into the binary and applied
//! by [`Database::new`](crate::Database::new); sqlx records each applied
//! script in `_sqlx_migrations` so re-running is a no-op.
//!
//! New schema changes go in a new `NNN_description.sql` file. Applied
//! scripts are checksummed, so editing one breaks existing databases.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies every script not yet recorded in `_sqlx_migrations`.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    debug!(embedded = MIGRATOR.migrations.len(), "Applying payroll migrations");
    MIGRATOR.run(pool).await?;
    Ok(())
}

/// `(embedded, applied)` script counts.
///
/// Reported by [`Database::migration_status`](crate::Database::migration_status).
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    // The table is missing until the first run; report zero applied
    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
        .unwrap_or(0);

    Ok((total, applied as usize))
}
