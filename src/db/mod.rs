pub mod connection;
pub mod mapping;
pub mod migration;
pub mod pending;
pub mod usage;

use chrono::{DateTime, Utc};

// Timestamps are stored as Unix milliseconds, tag lists as JSON text.

pub(crate) fn to_millis(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

pub(crate) fn from_millis(column: &str, millis: i64) -> Result<DateTime<Utc>, sqlx::Error> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: format!("timestamp out of range: {}", millis).into(),
    })
}

pub(crate) fn from_optional_millis(
    column: &str,
    millis: Option<i64>,
) -> Result<Option<DateTime<Utc>>, sqlx::Error> {
    millis.map(|m| from_millis(column, m)).transpose()
}

pub(crate) fn encode_tags(tags: &[String]) -> Result<String, sqlx::Error> {
    serde_json::to_string(tags).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

pub(crate) fn decode_tags(
    column: &str,
    raw: Option<String>,
) -> Result<Option<Vec<String>>, sqlx::Error> {
    raw.map(|json| {
        serde_json::from_str(&json).map_err(|e| sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: Box::new(e),
        })
    })
    .transpose()
}
