use super::{at, new_transaction, seed_pending, test_state};
use crate::{api::create_router, db::pending, state::AppState};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

async fn setup() -> (Router, Arc<AppState>) {
    let state = test_state().await;
    (create_router(state.clone()), state)
}

/// Send a request and return status plus parsed JSON body.
async fn json_request(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    let body = match body {
        Some(v) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&v).unwrap())
        }
        None => Body::empty(),
    };

    let request = builder.body(body).unwrap();
    let response = router.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let json: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

#[tokio::test]
async fn test_create_pending_requires_fields() {
    let (router, _) = setup().await;

    let (status, body) = json_request(
        &router,
        "POST",
        "/api/pending",
        Some(json!({ "store_name": "Acme", "amount": 10, "currency": "USD",
                     "date": "2024-01-01" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("email_id"));

    let (status, _) = json_request(
        &router,
        "POST",
        "/api/pending",
        Some(json!({ "store_name": "Acme", "amount": "ten", "currency": "USD",
                     "date": "2024-01-01", "email_id": "m1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let (router, _) = setup().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/mappings")
        .header("Content-Type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_and_list_pending_with_join() {
    let (router, _) = setup().await;

    let (status, body) = json_request(
        &router,
        "POST",
        "/api/pending",
        Some(json!({ "store_name": "Acme", "amount": "12.50", "currency": "EUR",
                     "date": "2024-01-05", "email_id": "msg-1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_i64().unwrap();

    let (_, body) = json_request(&router, "GET", "/api/pending", None).await;
    let docs = body["data"].as_array().unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0]["id"], id);
    assert_eq!(docs[0]["amount"], 12.5);
    assert_eq!(docs[0]["has_mapping"], false);
    assert!(docs[0]["category"].is_null());

    json_request(
        &router,
        "POST",
        "/api/mappings",
        Some(json!({ "store_name": "Acme", "category": "Bills", "tags": ["home"] })),
    )
    .await;

    let (_, body) = json_request(&router, "GET", "/api/pending", None).await;
    assert_eq!(body["data"][0]["has_mapping"], true);
    assert_eq!(body["data"][0]["category"], "Bills");
    assert_eq!(body["data"][0]["tags"], json!(["home"]));

    let (_, body) = json_request(&router, "GET", "/api/pending?join=false", None).await;
    assert!(body["data"][0].get("has_mapping").is_none());
}

#[tokio::test]
async fn test_mapping_upsert_scenario() {
    let (router, _) = setup().await;

    let (status, body) = json_request(
        &router,
        "POST",
        "/api/mappings",
        Some(json!({ "store_name": "Acme", "category": "Bills" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["created"], true);

    let (status, body) = json_request(
        &router,
        "POST",
        "/api/mappings",
        Some(json!({ "store_name": "Acme", "category": "Utilities" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["created"], false);

    let request = Request::builder()
        .uri("/api/mappings")
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-total-count"], "1");

    let (_, body) = json_request(&router, "GET", "/api/mappings", None).await;
    let mappings = body["data"].as_array().unwrap();
    assert_eq!(mappings.len(), 1);
    assert_eq!(mappings[0]["category"], "Utilities");

    let uri = "/api/mappings/category?store_name=Acme";
    let (_, body) = json_request(&router, "GET", uri, None).await;
    assert_eq!(body["data"]["category"], "Utilities");
    let uri = "/api/mappings/category?store_name=Nope";
    let (_, body) = json_request(&router, "GET", uri, None).await;
    assert!(body["data"]["category"].is_null());
}

#[tokio::test]
async fn test_concurrent_upserts_report_one_creation() {
    let (router, _) = setup().await;
    let payload = json!({ "store_name": "Acme", "category": "Bills" });

    let (first, second) = tokio::join!(
        json_request(&router, "POST", "/api/mappings", Some(payload.clone())),
        json_request(&router, "POST", "/api/mappings", Some(payload.clone())),
    );

    let responses = [first, second];
    let created = responses
        .iter()
        .filter(|(_, body)| body["data"]["created"] == true)
        .count();
    assert_eq!(created, 1, "Exactly one concurrent writer may report creation");

    let statuses: Vec<StatusCode> = responses.iter().map(|(status, _)| *status).collect();
    assert!(statuses.contains(&StatusCode::CREATED));
    assert!(statuses.contains(&StatusCode::OK));
    assert_eq!(responses[0].1["data"]["id"], responses[1].1["data"]["id"]);

    let (_, body) = json_request(&router, "GET", "/api/mappings", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_mapping_upsert_empty_tags_clears_field() {
    let (router, state) = setup().await;
    seed_pending(&state.db_pool, "Bolt", 7.0, "EUR", "2024-01-03", 100).await;

    let (status, _) = json_request(
        &router,
        "POST",
        "/api/mappings",
        Some(json!({ "store_name": "Bolt", "category": "Transport", "tags": ["work"] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = json_request(&router, "GET", "/api/mappings", None).await;
    assert_eq!(body["data"][0]["tags"], json!(["work"]));

    let (status, body) = json_request(
        &router,
        "POST",
        "/api/mappings",
        Some(json!({ "store_name": "Bolt", "category": "Transport", "tags": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["created"], false);

    let (_, body) = json_request(&router, "GET", "/api/mappings", None).await;
    assert_eq!(body["data"][0]["store_name"], "Bolt");
    assert!(body["data"][0].get("tags").is_none(), "Tags field must be absent");

    let (_, body) = json_request(&router, "GET", "/api/pending", None).await;
    assert_eq!(body["data"][0]["has_mapping"], true);
    assert!(body["data"][0]["tags"].is_null());
}

#[tokio::test]
async fn test_mapping_upsert_rejects_blank_fields() {
    let (router, state) = setup().await;

    let (status, _) = json_request(
        &router,
        "POST",
        "/api/mappings",
        Some(json!({ "store_name": "  ", "category": "Bills" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = json_request(
        &router,
        "POST",
        "/api/mappings",
        Some(json!({ "store_name": "Acme" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM merchant_mappings")
        .fetch_one(&state.db_pool)
        .await
        .unwrap();
    assert_eq!(count, 0, "Rejected writes must not touch storage");
}

#[tokio::test]
async fn test_mapping_update_clears_tags_with_empty_list() {
    let (router, _) = setup().await;

    let (_, body) = json_request(
        &router,
        "POST",
        "/api/mappings",
        Some(json!({ "store_name": "Bolt", "category": "Transport",
                     "tags": ["work", "taxi"] })),
    )
    .await;
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = json_request(
        &router,
        "PUT",
        "/api/mappings",
        Some(json!({ "_id": id.to_string(), "category": "Travel", "tags": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["category"], "Travel");
    assert!(body["data"].get("tags").is_none(), "Tags field must be absent");

    let (status, _) = json_request(
        &router,
        "PUT",
        "/api/mappings",
        Some(json!({ "id": id + 99, "category": "Travel" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let delete = json!({ "id": id });
    let (status, _) = json_request(&router, "DELETE", "/api/mappings", Some(delete.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = json_request(&router, "DELETE", "/api/mappings", Some(delete)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deduplicate_endpoint() {
    let (router, state) = setup().await;
    let pool = &state.db_pool;

    let t1 = seed_pending(pool, "A", 10.0, "USD", "2024-01-01", 100).await;
    let t2 = seed_pending(pool, "A", 10.0, "USD", "2024-01-01", 200).await;
    seed_pending(pool, "B", 5.0, "EUR", "2024-01-02", 150).await;

    let (status, body) = json_request(&router, "POST", "/api/pending/deduplicate", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleted_count"], 1);
    assert_eq!(body["data"]["removed_ids"], json!([t2]));

    let (_, body) = json_request(&router, "POST", "/api/pending/deduplicate", None).await;
    assert_eq!(body["data"]["deleted_count"], 0);

    let (_, body) = json_request(&router, "GET", "/api/pending", None).await;
    let ids: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&t1));
}

#[tokio::test]
async fn test_deduplicate_empty_store() {
    let (router, _) = setup().await;

    let (status, body) = json_request(&router, "POST", "/api/pending/deduplicate", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleted_count"], 0);
}

#[tokio::test]
async fn test_summary_and_flag_endpoints() {
    let (router, state) = setup().await;
    let pool = &state.db_pool;

    let unmapped = seed_pending(pool, "Kiosk", 1.0, "EUR", "2024-01-01", 100).await;
    let mut courier = new_transaction("Wolt", 20.0, "EUR", "2024-01-02");
    courier.requires_description = true;
    let courier = pending::insert_pending(pool, &courier, at(110)).await.unwrap();

    json_request(
        &router,
        "POST",
        "/api/mappings",
        Some(json!({ "store_name": "Wolt", "category": "Food" })),
    )
    .await;

    let (_, body) = json_request(&router, "GET", "/api/pending/summary", None).await;
    assert_eq!(body["data"]["action_required"][0]["id"], unmapped);
    assert_eq!(body["data"]["waiting"]["needs_description"][0]["id"], courier);

    let (status, body) = json_request(
        &router,
        "POST",
        &format!("/api/pending/{}/description", courier),
        Some(json!({ "description": "  dinner  " })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], courier);
    assert_eq!(body["data"]["description"], "dinner");
    assert!(body["data"]["description_added_at"].is_string());

    // Unmapped transactions may still be marked processed
    let (status, body) = json_request(
        &router,
        "POST",
        &format!("/api/pending/{}/processed", unmapped),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["matched"], 1);

    let uri = "/api/pending/summary?history_limit=1";
    let (_, body) = json_request(&router, "GET", uri, None).await;
    assert!(body["data"]["action_required"].as_array().unwrap().is_empty());
    assert_eq!(body["data"]["waiting"]["ready"][0]["description"], "dinner");
    assert_eq!(body["data"]["history"][0]["id"], unmapped);
    assert_eq!(body["data"]["history_total"], 1);

    let (_, body) = json_request(&router, "DELETE", "/api/pending/processed", None).await;
    assert_eq!(body["data"]["count"], 1);
}

#[tokio::test]
async fn test_pending_id_errors() {
    let (router, _) = setup().await;

    let (status, _) = json_request(&router, "POST", "/api/pending/abc/processed", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = json_request(&router, "POST", "/api/pending/999/processed", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = json_request(&router, "DELETE", "/api/pending/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = json_request(
        &router,
        "POST",
        "/api/pending/999/mapping",
        Some(json!({ "category": "Food" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = json_request(
        &router,
        "POST",
        "/api/pending/999/description",
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_direct_assignment_endpoint() {
    let (router, state) = setup().await;

    let id = seed_pending(&state.db_pool, "Kiosk", 2.0, "EUR", "2024-01-01", 100).await;

    let (status, body) = json_request(
        &router,
        "POST",
        &format!("/api/pending/{}/mapping", id),
        Some(json!({ "category": " Snacks " })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id);
    assert_eq!(body["data"]["assigned"]["category"], "Snacks");
    assert_eq!(body["data"]["assigned"]["has_mapping"], true);

    let (_, body) = json_request(&router, "GET", "/api/pending", None).await;
    let doc = &body["data"][0];
    assert_eq!(doc["assigned"]["category"], "Snacks");
    assert_eq!(doc["assigned"]["tags"], json!([]));
    assert_eq!(doc["has_mapping"], false, "Join-on-read only looks at the mapping table");
}

#[tokio::test]
async fn test_usage_sync_and_common() {
    let (router, _) = setup().await;

    let (status, body) = json_request(
        &router,
        "POST",
        "/api/categories/sync",
        Some(json!({ "categories": [
            { "name": "Food", "usage_count": 4 },
            { "name": "Rent", "usage_count": 9 }
        ] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["count"], 2);

    let (_, body) = json_request(&router, "GET", "/api/categories/common", None).await;
    assert_eq!(body["data"]["names"], json!(["Rent", "Food"]));
    assert_eq!(body["data"]["count"], 2);

    let (status, _) = json_request(&router, "POST", "/api/tags/sync", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = json_request(
        &router,
        "POST",
        "/api/tags/sync",
        Some(json!({ "tags": [{ "name": "work" }] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["count"], 1);

    let (_, body) = json_request(&router, "GET", "/api/tags/common", None).await;
    assert_eq!(body["data"]["names"], json!(["work"]));
}

#[tokio::test]
async fn test_method_and_route_errors() {
    let (router, _) = setup().await;

    let (status, body) = json_request(&router, "PATCH", "/api/mappings", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "Method not allowed");

    let (status, _) = json_request(&router, "GET", "/api/pending/deduplicate", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let (status, body) = json_request(&router, "GET", "/api/nothing-here", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}
