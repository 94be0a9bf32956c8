//! End-to-end handler tests against a live MongoDB.
//!
//! Run with: MONGODB_URI=mongodb://localhost:27017 cargo test -p dayplan-server -- --ignored

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use mongodb::bson::doc;
use serde_json::Value;
use tower::ServiceExt;

use dayplan_server::{build_router, AppState, WritePolicy};
use dayplan_store::{Store, StoreConfig};

async fn connect() -> Store {
    let uri = std::env::var("MONGODB_URI").expect("MONGODB_URI required");
    let config = StoreConfig::new(uri).with_database("dayplan_test");
    Store::connect(config).await.expect("store connection failed")
}

async fn app(bucket: &str) -> (Router, Store) {
    let store = connect().await;
    store.delete_many(bucket, doc! {}).await.expect("bucket cleanup failed");
    let router = build_router(Arc::new(AppState::new(store.clone(), WritePolicy::Lenient)));
    (router, store)
}

/// Percent-encode a JSON payload into the `data` form field.
fn form_body(json: &str) -> String {
    let mut body = String::from("data=");
    for byte in json.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                body.push(byte as char)
            }
            _ => body.push_str(&format!("%{byte:02X}")),
        }
    }
    body
}

async fn post_day(router: &Router, bucket: &str, date: &str, json: &str) -> StatusCode {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/updateTodos/{bucket}/day/{date}"))
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form_body(json)))
                .unwrap(),
        )
        .await
        .unwrap();
    response.status()
}

async fn get_json(router: &Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn infos(body: &Value) -> Vec<&str> {
    let mut infos: Vec<&str> = body["todos"]
        .as_array()
        .expect("todos array")
        .iter()
        .map(|t| t["info"].as_str().unwrap())
        .collect();
    infos.sort_unstable();
    infos
}

#[tokio::test]
#[ignore = "requires database"]
async fn replace_then_read_day() {
    let bucket = "api_replace_day";
    let (router, _store) = app(bucket).await;

    let status = post_day(&router, bucket, "2022-05-01", r#"{"todos":[{"info":"buy milk"}]}"#).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get_json(&router, &format!("/getTodos/{bucket}/day/2022-05-01")).await;
    assert_eq!(status, StatusCode::OK);

    let todos = body["todos"].as_array().unwrap();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0]["info"], "buy milk");
    assert_eq!(todos[0]["month"], "202205");
    assert_eq!(todos[0]["day"], "2022-05-01");
    assert!(todos[0]["id"].as_str().is_some());
}

#[tokio::test]
#[ignore = "requires database"]
async fn replace_discards_previous_entries() {
    let bucket = "api_replace_discards";
    let (router, _store) = app(bucket).await;

    post_day(&router, bucket, "2022-05-01", r#"{"todos":[{"info":"old"}]}"#).await;
    post_day(
        &router,
        bucket,
        "2022-05-01",
        r#"{"todos":[{"info":"new one"},{"info":"new two"}]}"#,
    )
    .await;

    let (_, body) = get_json(&router, &format!("/getTodos/{bucket}/day/2022-05-01")).await;
    assert_eq!(infos(&body), vec!["new one", "new two"]);
}

#[tokio::test]
#[ignore = "requires database"]
async fn empty_todo_list_clears_the_day() {
    let bucket = "api_clear_day";
    let (router, _store) = app(bucket).await;

    post_day(&router, bucket, "2022-05-01", r#"{"todos":[{"info":"doomed"}]}"#).await;
    post_day(&router, bucket, "2022-05-01", r#"{"todos":[]}"#).await;

    let (_, body) = get_json(&router, &format!("/getTodos/{bucket}/day/2022-05-01")).await;
    assert!(body["todos"].as_array().unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires database"]
async fn month_window_includes_neighbors_only() {
    let bucket = "api_month_window";
    let (router, _store) = app(bucket).await;

    post_day(&router, bucket, "2022-04-30", r#"{"todos":[{"info":"april"}]}"#).await;
    post_day(&router, bucket, "2022-05-15", r#"{"todos":[{"info":"may"}]}"#).await;
    post_day(&router, bucket, "2022-06-01", r#"{"todos":[{"info":"june"}]}"#).await;
    post_day(&router, bucket, "2022-08-01", r#"{"todos":[{"info":"august"}]}"#).await;

    let (status, body) = get_json(&router, &format!("/getTodos/{bucket}/month/202205")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(infos(&body), vec!["april", "june", "may"]);

    let (_, body) = get_json(&router, &format!("/getTodos/{bucket}/month/202201")).await;
    assert!(body["todos"].as_array().unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires database"]
async fn malformed_payload_is_rejected_and_day_is_retained() {
    let bucket = "api_malformed";
    let (router, _store) = app(bucket).await;

    post_day(&router, bucket, "2022-05-01", r#"{"todos":[{"info":"survivor"}]}"#).await;

    let status = post_day(&router, bucket, "2022-05-01", "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = get_json(&router, &format!("/getTodos/{bucket}/day/2022-05-01")).await;
    assert_eq!(infos(&body), vec!["survivor"]);
}

#[tokio::test]
#[ignore = "requires database"]
async fn invalid_path_parameters_are_400() {
    let bucket = "api_bad_params";
    let (router, _store) = app(bucket).await;

    let (status, _) = get_json(&router, &format!("/getTodos/{bucket}/month/abc123")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get_json(&router, &format!("/getTodos/{bucket}/day/2022-99-99")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get_json(&router, "/getTodos/bad%24name/day/2022-05-01").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let status = post_day(&router, bucket, "not-a-date", r#"{"todos":[]}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires database"]
async fn health_probe() {
    let (router, _store) = app("api_health").await;
    let (status, body) = get_json(&router, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
