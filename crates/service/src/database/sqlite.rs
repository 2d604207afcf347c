use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use super::DatabaseSetupError;

const MAX_CONNECTIONS: u32 = 5;

pub async fn connect_sqlite(url: &url::Url) -> Result<SqlitePool, DatabaseSetupError> {
    let in_memory = url.as_str().contains(":memory:");
    let options = SqliteConnectOptions::from_str(url.as_str())
        .map_err(DatabaseSetupError::Unavailable)?
        .create_if_missing(true)
        .foreign_keys(true);

    // every connection to an in-memory database gets its own database,
    //  so the pool has to hold on to exactly one
    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(MAX_CONNECTIONS)
    };

    pool_options
        .connect_with(options)
        .await
        .map_err(DatabaseSetupError::Unavailable)
}

pub async fn migrate_sqlite(pool: &SqlitePool) -> Result<(), DatabaseSetupError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(DatabaseSetupError::MigrationFailed)
}
