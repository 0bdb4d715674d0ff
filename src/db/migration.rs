use sqlx::SqlitePool;
use tracing::info;

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    info!("Running database migrations...");

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS pending_transactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            store_name TEXT NOT NULL,
            amount REAL NOT NULL,
            currency TEXT NOT NULL,
            date TEXT NOT NULL,
            email_id TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            processed BOOLEAN NOT NULL DEFAULT 0,
            processed_at INTEGER,
            description TEXT,
            description_added_at INTEGER,
            requires_description BOOLEAN NOT NULL DEFAULT 0,
            has_mapping BOOLEAN,
            category TEXT,
            tags TEXT,
            mapping_updated_at INTEGER
        )"
    )
    .execute(pool)
    .await?;

    // One row per store name; upserts conflict on it
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS merchant_mappings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            store_name TEXT NOT NULL UNIQUE,
            category TEXT NOT NULL,
            tags TEXT,
            updated_at INTEGER NOT NULL
        )"
    )
    .execute(pool)
    .await?;

    for table in ["category_usage", "tag_usage"] {
        sqlx::query(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                usage_count INTEGER NOT NULL DEFAULT 0,
                synced_at INTEGER NOT NULL
            )",
            table
        ))
        .execute(pool)
        .await?;
    }

    // Add indexes for common queries
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_pending_created_at
         ON pending_transactions(created_at)"
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_pending_processed
         ON pending_transactions(processed)"
    )
    .execute(pool)
    .await?;

    info!("Database migrations completed successfully");
    Ok(())
}
