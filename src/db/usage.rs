// Category and tag usage lists used to rank suggestions.
// A sync replaces the whole list; nothing is merged.

use super::to_millis;
use crate::models::UsageEntry;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Sqlite};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageKind {
    Category,
    Tag,
}

impl UsageKind {
    fn table(self) -> &'static str {
        match self {
            UsageKind::Category => "category_usage",
            UsageKind::Tag => "tag_usage",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            UsageKind::Category => "categories",
            UsageKind::Tag => "tags",
        }
    }
}

/// Delete-all then insert-all inside one SQL transaction. Returns the inserted count.
pub async fn replace_usage(
    pool: &Pool<Sqlite>,
    kind: UsageKind,
    entries: &[UsageEntry],
    synced_at: DateTime<Utc>,
) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(&format!("DELETE FROM {}", kind.table()))
        .execute(&mut *tx)
        .await?;

    let insert = format!(
        "INSERT INTO {} (name, usage_count, synced_at) VALUES (?, ?, ?)",
        kind.table()
    );
    let mut inserted = 0;
    for entry in entries {
        let result = sqlx::query(&insert)
            .bind(&entry.name)
            .bind(entry.usage_count)
            .bind(to_millis(synced_at))
            .execute(&mut *tx)
            .await?;
        inserted += result.rows_affected();
    }

    tx.commit().await?;

    info!("Synced {} {}", inserted, kind.label());
    Ok(inserted)
}

/// Names ordered by usage count, highest first.
pub async fn top_names(
    pool: &Pool<Sqlite>,
    kind: UsageKind,
    limit: i64,
) -> Result<Vec<String>, sqlx::Error> {
    let names: Vec<String> = sqlx::query_scalar(&format!(
        "SELECT name FROM {} ORDER BY usage_count DESC, name ASC LIMIT ?",
        kind.table()
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(names)
}
