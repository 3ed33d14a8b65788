use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::{info, warn};

use crate::error::AppError;

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_RETRY_MS: u64 = 500;

fn is_sqlite_memory(url: &str) -> bool {
    url.starts_with("sqlite::memory:") || url.contains("mode=memory")
}

fn options(url: &str) -> ConnectOptions {
    let mut opt = ConnectOptions::new(url);
    opt.acquire_timeout(Duration::from_secs(2)).sqlx_logging(false);
    if is_sqlite_memory(url) {
        // every connection would open its own empty database
        opt.min_connections(1).max_connections(1);
    } else {
        opt.min_connections(1).max_connections(8);
    }
    opt
}

/// Connect to the journal database. Does NOT run migrations.
///
/// Postgres is retried a few times so the service can start alongside its
/// database container.
pub async fn connect_db(database_url: &str) -> Result<DatabaseConnection, AppError> {
    let opt = options(database_url);
    if !database_url.starts_with("postgres") {
        return Ok(Database::connect(opt).await?);
    }

    let mut attempt = 1;
    loop {
        match Database::connect(opt.clone()).await {
            Ok(conn) => return Ok(conn),
            Err(e) if attempt < CONNECT_ATTEMPTS => {
                warn!(attempt, error = %e, "journal database not reachable yet");
                tokio::time::sleep(Duration::from_millis(CONNECT_RETRY_MS)).await;
                attempt += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Connect and bring the schema up to date.
pub async fn bootstrap_db(database_url: &str) -> Result<DatabaseConnection, AppError> {
    let conn = connect_db(database_url).await?;
    Migrator::up(&conn, None).await?;
    info!("journal schema up to date");
    Ok(conn)
}
