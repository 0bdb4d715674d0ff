//! Shared fixtures for the test modules

mod api_tests;

use crate::{
    config::Config,
    db::{connection, pending},
    models::{MerchantMapping, NewPendingTransaction, PendingTransaction},
    state::AppState,
};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;

pub(crate) fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).expect("valid test timestamp")
}

pub(crate) fn transaction(
    id: i64,
    store_name: &str,
    amount: f64,
    currency: &str,
    date: &str,
    created_secs: i64,
) -> PendingTransaction {
    PendingTransaction {
        id,
        store_name: store_name.to_string(),
        amount,
        currency: currency.to_string(),
        date: date.to_string(),
        email_id: format!("email-{}", id),
        created_at: at(created_secs),
        processed: false,
        processed_at: None,
        description: None,
        description_added_at: None,
        requires_description: false,
        assigned: None,
    }
}

pub(crate) fn new_transaction(
    store_name: &str,
    amount: f64,
    currency: &str,
    date: &str,
) -> NewPendingTransaction {
    NewPendingTransaction {
        store_name: store_name.to_string(),
        amount,
        currency: currency.to_string(),
        date: date.to_string(),
        email_id: format!("email-{}-{}", store_name, date),
        requires_description: false,
    }
}

pub(crate) fn mapping(
    id: i64,
    store_name: &str,
    category: &str,
    tags: Option<&[&str]>,
) -> MerchantMapping {
    MerchantMapping {
        id,
        store_name: store_name.to_string(),
        category: category.to_string(),
        tags: tags.map(|t| t.iter().map(|s| s.to_string()).collect()),
        updated_at: at(1_700_000_000),
    }
}

/// Insert a pending transaction and return its id.
pub(crate) async fn seed_pending(
    pool: &SqlitePool,
    store_name: &str,
    amount: f64,
    currency: &str,
    date: &str,
    created_secs: i64,
) -> i64 {
    let transaction = new_transaction(store_name, amount, currency, date);
    pending::insert_pending(pool, &transaction, at(created_secs))
        .await
        .expect("Failed to insert pending transaction")
}

pub(crate) async fn test_pool() -> SqlitePool {
    connection::connect("sqlite::memory:", 1)
        .await
        .expect("Failed to open in-memory database")
}

pub(crate) async fn test_state() -> Arc<AppState> {
    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        ..Config::default()
    };
    let db_pool = connection::establish_connection(&config)
        .await
        .expect("Failed to open in-memory database");

    Arc::new(AppState { config, db_pool })
}
