// SQLite connection pool setup; the schema is applied on every connect.

use crate::config::Config;
use crate::db::migration::run_migrations;
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions, Pool, Sqlite};
use std::time::Duration;
use tracing::info;

pub async fn establish_connection(config: &Config) -> Result<Pool<Sqlite>, sqlx::Error> {
    let max_connections = if config.is_in_memory() {
        1
    } else {
        config.db_max_connections
    };
    connect(&config.database_url, max_connections).await
}

pub async fn connect(
    database_url: &str,
    max_connections: u32,
) -> Result<Pool<Sqlite>, sqlx::Error> {
    let in_memory = database_url.contains(":memory:");

    // Create database if it doesn't exist
    if !in_memory && !Sqlite::database_exists(database_url).await.unwrap_or(false) {
        info!("Creating database at {}", database_url);
        Sqlite::create_database(database_url).await?;
    }

    let mut options = SqlitePoolOptions::new().max_connections(max_connections);
    if in_memory {
        // Each in-memory connection is its own database; never let the pool recycle it.
        options = options
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>);
    }
    let pool = options.connect(database_url).await?;

    if !in_memory {
        sqlx::query("PRAGMA journal_mode=WAL").execute(&pool).await?;
    }

    run_migrations(&pool).await?;

    Ok(pool)
}
