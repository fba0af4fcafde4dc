/// Database migration runner
///
/// Runs the SQL migrations embedded from the workspace-root `migrations/`
/// directory using sqlx's migration system. Each migration is a
/// `{timestamp}_{name}.sql` file applied exactly once, tracked in the
/// `_sqlx_migrations` table.

use sqlx::postgres::PgPool;
use tracing::{info, warn};

/// Runs all pending database migrations
///
/// # Errors
///
/// Returns an error if a migration file is malformed, a statement fails, or
/// the connection is lost mid-run; already-applied migrations are skipped.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("running database migrations");

    let migrations = sqlx::migrate!("../migrations");

    match migrations.run(pool).await {
        Ok(()) => {
            info!("database migrations up to date");
            Ok(())
        }
        Err(e) => {
            warn!("migration failed: {}", e);
            Err(e)
        }
    }
}
