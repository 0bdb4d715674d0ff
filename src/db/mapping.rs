// Merchant mapping collection, keyed by store name.

use super::{decode_tags, encode_tags, from_millis, to_millis};
use crate::models::{MerchantMapping, UpsertOutcome};
use crate::reconcile::TagUpdate;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Pool, Row, Sqlite};

fn row_to_mapping(row: &SqliteRow) -> Result<MerchantMapping, sqlx::Error> {
    Ok(MerchantMapping {
        id: row.try_get("id")?,
        store_name: row.try_get("store_name")?,
        category: row.try_get("category")?,
        tags: decode_tags("tags", row.try_get("tags")?)?,
        updated_at: from_millis("updated_at", row.try_get("updated_at")?)?,
    })
}

pub async fn list_mappings(pool: &Pool<Sqlite>) -> Result<Vec<MerchantMapping>, sqlx::Error> {
    let rows = sqlx::query(
        r#"SELECT id, store_name, category, tags, updated_at
           FROM merchant_mappings
           ORDER BY store_name ASC"#,
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(row_to_mapping).collect()
}

pub async fn find_by_store(
    pool: &Pool<Sqlite>,
    store_name: &str,
) -> Result<Option<MerchantMapping>, sqlx::Error> {
    let row = sqlx::query(
        r#"SELECT id, store_name, category, tags, updated_at
           FROM merchant_mappings
           WHERE store_name = ?"#,
    )
    .bind(store_name)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(row_to_mapping).transpose()
}

pub async fn find_by_id(
    pool: &Pool<Sqlite>,
    id: i64,
) -> Result<Option<MerchantMapping>, sqlx::Error> {
    let row = sqlx::query(
        "SELECT id, store_name, category, tags, updated_at FROM merchant_mappings WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(row_to_mapping).transpose()
}

fn stored_tags(tags: &TagUpdate) -> Result<Option<String>, sqlx::Error> {
    tags.stored_tags().map(encode_tags).transpose()
}

/// Insert or replace the mapping for `store_name`.
///
/// The insert attempt and the fallback update share one transaction, and the
/// insert takes the write lock first, so exactly one of several concurrent
/// writers for a new store name sees `created`. Stored data is last-writer-wins.
pub async fn upsert_mapping(
    pool: &Pool<Sqlite>,
    store_name: &str,
    category: &str,
    tags: &TagUpdate,
    updated_at: DateTime<Utc>,
) -> Result<UpsertOutcome, sqlx::Error> {
    let stored = stored_tags(tags)?;
    let mut tx = pool.begin().await?;

    let inserted: Option<i64> = sqlx::query_scalar(
        r#"INSERT INTO merchant_mappings (store_name, category, tags, updated_at)
           VALUES (?, ?, ?, ?)
           ON CONFLICT(store_name) DO NOTHING
           RETURNING id"#,
    )
    .bind(store_name)
    .bind(category)
    .bind(stored.as_deref())
    .bind(to_millis(updated_at))
    .fetch_optional(&mut *tx)
    .await?;

    let outcome = match inserted {
        Some(id) => UpsertOutcome { id, created: true },
        None => {
            let id: i64 = sqlx::query_scalar(
                r#"UPDATE merchant_mappings
                   SET category = ?1,
                       updated_at = ?2,
                       tags = CASE WHEN ?3 THEN tags ELSE ?4 END
                   WHERE store_name = ?5
                   RETURNING id"#,
            )
            .bind(category)
            .bind(to_millis(updated_at))
            .bind(tags.keeps_existing())
            .bind(stored.as_deref())
            .bind(store_name)
            .fetch_one(&mut *tx)
            .await?;
            UpsertOutcome { id, created: false }
        }
    };

    tx.commit().await?;

    Ok(outcome)
}

/// Returns false when no mapping has this id.
pub async fn update_mapping(
    pool: &Pool<Sqlite>,
    id: i64,
    category: &str,
    tags: &TagUpdate,
    updated_at: DateTime<Utc>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"UPDATE merchant_mappings
           SET category = ?1,
               updated_at = ?2,
               tags = CASE WHEN ?3 THEN tags ELSE ?4 END
           WHERE id = ?5"#,
    )
    .bind(category)
    .bind(to_millis(updated_at))
    .bind(tags.keeps_existing())
    .bind(stored_tags(tags)?)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_mapping(pool: &Pool<Sqlite>, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM merchant_mappings WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
