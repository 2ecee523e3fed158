/// Schema migrations
///
/// The SQL files under `migrations/` at the crate root are compiled into the
/// binary with `sqlx::migrate!`, so a deployed server carries its own schema
/// and needs no files on disk.
use sqlx::{migrate::MigrateDatabase, postgres::PgPool, Postgres};
use tracing::{debug, info, warn};

/// Applies all pending migrations
///
/// Already-applied migrations are skipped. Each migration runs in its own
/// transaction, so a failure leaves the schema at the last good version.
///
/// # Errors
///
/// Returns an error when a migration statement fails or the connection is
/// lost mid-run.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Applying schema migrations");

    match sqlx::migrate!("./migrations").run(pool).await {
        Ok(()) => {
            info!("Schema is up to date");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}

/// Creates the target database when it does not exist yet
///
/// Convenience for development and test environments; production databases
/// are expected to be provisioned ahead of time.
///
/// # Errors
///
/// Returns an error when the server is unreachable or the connecting role
/// may not create databases.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    if Postgres::database_exists(database_url).await? {
        debug!("Database already exists");
        return Ok(());
    }

    info!("Database missing, creating it");
    Postgres::create_database(database_url).await?;

    Ok(())
}
