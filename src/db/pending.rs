// Pending transaction collection:
// - insert one, list all (newest first)
// - flag updates (processed, description, direct category/tags)
// - delete one, delete many by id, delete all processed

use super::{decode_tags, encode_tags, from_millis, from_optional_millis, to_millis};
use crate::models::{DirectAssignment, NewPendingTransaction, PendingTransaction};
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Pool, QueryBuilder, Row, Sqlite};
use tracing::debug;

const SELECT_COLUMNS: &str = "SELECT id, store_name, amount, currency, date, email_id, created_at,
        processed, processed_at, description, description_added_at, requires_description,
        has_mapping, category, tags, mapping_updated_at
    FROM pending_transactions";

fn row_to_transaction(row: &SqliteRow) -> Result<PendingTransaction, sqlx::Error> {
    let category: Option<String> = row.try_get("category")?;
    let assigned = match category {
        Some(category) => Some(DirectAssignment {
            has_mapping: row.try_get::<Option<bool>, _>("has_mapping")?.unwrap_or(true),
            category,
            tags: decode_tags("tags", row.try_get("tags")?)?.unwrap_or_default(),
            mapping_updated_at: from_millis(
                "mapping_updated_at",
                row.try_get::<Option<i64>, _>("mapping_updated_at")?.unwrap_or_default(),
            )?,
        }),
        None => None,
    };

    Ok(PendingTransaction {
        id: row.try_get("id")?,
        store_name: row.try_get("store_name")?,
        amount: row.try_get("amount")?,
        currency: row.try_get("currency")?,
        date: row.try_get("date")?,
        email_id: row.try_get("email_id")?,
        created_at: from_millis("created_at", row.try_get("created_at")?)?,
        processed: row.try_get("processed")?,
        processed_at: from_optional_millis("processed_at", row.try_get("processed_at")?)?,
        description: row.try_get("description")?,
        description_added_at: from_optional_millis(
            "description_added_at",
            row.try_get("description_added_at")?,
        )?,
        requires_description: row.try_get("requires_description")?,
        assigned,
    })
}

pub async fn insert_pending(
    pool: &Pool<Sqlite>,
    transaction: &NewPendingTransaction,
    created_at: DateTime<Utc>,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"INSERT INTO pending_transactions
           (store_name, amount, currency, date, email_id, created_at,
            processed, requires_description)
           VALUES (?, ?, ?, ?, ?, ?, 0, ?)"#,
    )
    .bind(&transaction.store_name)
    .bind(transaction.amount)
    .bind(&transaction.currency)
    .bind(&transaction.date)
    .bind(&transaction.email_id)
    .bind(to_millis(created_at))
    .bind(transaction.requires_description)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn list_pending(pool: &Pool<Sqlite>) -> Result<Vec<PendingTransaction>, sqlx::Error> {
    let rows = sqlx::query(&format!("{} ORDER BY created_at DESC, id DESC", SELECT_COLUMNS))
        .fetch_all(pool)
        .await?;

    rows.iter().map(row_to_transaction).collect()
}

pub async fn get_pending(
    pool: &Pool<Sqlite>,
    id: i64,
) -> Result<Option<PendingTransaction>, sqlx::Error> {
    let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(row_to_transaction).transpose()
}

/// Returns the number of matched rows.
pub async fn mark_processed(
    pool: &Pool<Sqlite>,
    id: i64,
    processed_at: DateTime<Utc>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE pending_transactions SET processed = 1, processed_at = ? WHERE id = ?",
    )
    .bind(to_millis(processed_at))
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// A `None` description removes it.
pub async fn set_description(
    pool: &Pool<Sqlite>,
    id: i64,
    description: Option<&str>,
    added_at: DateTime<Utc>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE pending_transactions SET description = ?, description_added_at = ? WHERE id = ?",
    )
    .bind(description)
    .bind(to_millis(added_at))
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Writes category and tags onto the transaction itself, bypassing the mapping table.
pub async fn assign_mapping(
    pool: &Pool<Sqlite>,
    id: i64,
    category: &str,
    tags: &[String],
    updated_at: DateTime<Utc>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"UPDATE pending_transactions
           SET category = ?, tags = ?, has_mapping = 1, mapping_updated_at = ?
           WHERE id = ?"#,
    )
    .bind(category)
    .bind(encode_tags(tags)?)
    .bind(to_millis(updated_at))
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_pending(pool: &Pool<Sqlite>, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM pending_transactions WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Single delete-many over the given ids; returns what storage reports as deleted.
pub async fn delete_many(pool: &Pool<Sqlite>, ids: &[i64]) -> Result<u64, sqlx::Error> {
    if ids.is_empty() {
        return Ok(0);
    }

    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new("DELETE FROM pending_transactions WHERE id IN (");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");

    let result = builder.build().execute(pool).await?;
    debug!("Deleted {} of {} requested pending transactions", result.rows_affected(), ids.len());

    Ok(result.rows_affected())
}

pub async fn delete_processed(pool: &Pool<Sqlite>) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM pending_transactions WHERE processed = 1")
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
