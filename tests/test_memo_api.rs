//! End-to-end tests for `POST /api/memos`:
//! start the real router on an ephemeral port, backed by the in-memory store,
//! and talk to it over HTTP.

use memo_api::storage::{InMemoryConnector, InMemoryMemoStore, PgPoolConnector};
use memo_api::{transport, ConnectionManager, Connector, MemoService};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;

async fn spawn_server<C: Connector + 'static>(connector: C) -> String {
    let manager = ConnectionManager::new(connector);
    let state = transport::http::AppState {
        memo_service: Arc::new(MemoService::new(Arc::new(manager))),
    };
    let router = transport::http::create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn spawn_memory_server() -> (String, Arc<InMemoryMemoStore>) {
    let store = Arc::new(InMemoryMemoStore::new());
    let base = spawn_server(InMemoryConnector::with_store(store.clone())).await;
    (base, store)
}

fn memo_body() -> Value {
    json!({
        "content": "Hello <script>alert(1)</script>",
        "styles": {
            "color": "#2C1810",
            "fontSize": "32px",
            "fontWeight": "bold",
            "fontStyle": "normal"
        },
        "bgColor": "#FFF8E1"
    })
}

#[tokio::test]
async fn create_memo_strips_script_and_returns_identity() {
    let (base, store) = spawn_memory_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/api/memos", base))
        .json(&memo_body())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Memo saved successfully.");
    let id = body["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());
    assert!(body["createdAt"].as_str().is_some());

    let stored = store.memos().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, id);
    assert_eq!(stored[0].content, "Hello");
    assert_eq!(stored[0].styles.color, "#2C1810");
    assert_eq!(stored[0].bg_color, "#FFF8E1");
}

#[tokio::test]
async fn font_size_out_of_range_is_rejected() {
    let (base, store) = spawn_memory_server().await;
    let mut body = memo_body();
    body["styles"]["fontSize"] = json!("100px");

    let resp = reqwest::Client::new()
        .post(format!("{}/api/memos", base))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["kind"], "invalid_font_size");
    assert_eq!(body["error"], "Font size must be between 16 and 72 pixels");
    assert!(body.get("details").is_none());
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn schema_errors_list_every_field() {
    let (base, _store) = spawn_memory_server().await;
    let resp = reqwest::Client::new()
        .post(format!("{}/api/memos", base))
        .json(&json!({ "content": 42, "styles": {} }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Invalid request data");
    assert_eq!(body["kind"], "schema_invalid");
    let paths: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["path"].as_str().unwrap())
        .collect();
    assert_eq!(
        paths,
        vec![
            "content",
            "styles.color",
            "styles.fontSize",
            "styles.fontWeight",
            "styles.fontStyle",
            "bgColor"
        ]
    );
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let (base, _store) = spawn_memory_server().await;
    let resp = reqwest::Client::new()
        .post(format!("{}/api/memos", base))
        .header("content-type", "application/json")
        .body("{\"content\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["kind"], "schema_invalid");
}

#[tokio::test]
async fn invalid_color_and_enum_messages() {
    let (base, _store) = spawn_memory_server().await;
    let client = reqwest::Client::new();

    let mut body = memo_body();
    body["bgColor"] = json!("white");
    let resp = client.post(format!("{}/api/memos", base)).json(&body).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["kind"], "invalid_color");

    let mut body = memo_body();
    body["styles"]["fontWeight"] = json!("semibold");
    let resp = client.post(format!("{}/api/memos", base)).json(&body).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["kind"], "invalid_enum");
    assert_eq!(json["error"], "Font weight must be 'normal' or 'bold'");
}

#[tokio::test]
async fn options_is_an_empty_200() {
    let (base, _store) = spawn_memory_server().await;
    let resp = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, format!("{}/api/memos", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.bytes().await.unwrap().is_empty());
}

#[tokio::test]
async fn cors_preflight_allows_any_origin() {
    let (base, _store) = spawn_memory_server().await;
    let resp = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, format!("{}/api/memos", base))
        .header("origin", "https://memo.example.com")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let headers = resp.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    let methods = headers["access-control-allow-methods"].to_str().unwrap();
    assert!(methods.contains("POST") && methods.contains("OPTIONS"));
    let allowed = headers["access-control-allow-headers"].to_str().unwrap();
    assert!(allowed.contains("content-type"));
    assert!(allowed.contains("x-csrf-token"));
    assert!(resp.bytes().await.unwrap().is_empty());
}

#[tokio::test]
async fn other_methods_are_not_allowed() {
    let (base, _store) = spawn_memory_server().await;
    let client = reqwest::Client::new();
    for method in [reqwest::Method::GET, reqwest::Method::PUT, reqwest::Method::DELETE] {
        let resp = client
            .request(method.clone(), format!("{}/api/memos", base))
            .header("origin", "https://memo.example.com")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED, "{method}");
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"], "Method not allowed");
    }
}

#[tokio::test]
async fn misconfigured_store_is_a_generic_500() {
    // The server starts fine; the broken connection string only shows up on the first write.
    let base = spawn_server(PgPoolConnector::with_url("not a connection string")).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/api/memos", base))
        .json(&memo_body())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Internal server error" }));

    let health = client.get(format!("{}/health", base)).send().await.unwrap();
    assert_eq!(health.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn health_is_ok_with_a_working_store() {
    let (base, _store) = spawn_memory_server().await;
    let resp = reqwest::get(format!("{}/health", base)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_posts_share_one_store() {
    let (base, store) = spawn_memory_server().await;
    let client = reqwest::Client::new();

    let mut tasks = Vec::new();
    for i in 0..10 {
        let client = client.clone();
        let url = format!("{}/api/memos", base);
        let mut body = memo_body();
        body["content"] = json!(format!("memo {}", i));
        tasks.push(tokio::spawn(async move {
            client.post(url).json(&body).send().await.unwrap().status()
        }));
    }
    for t in tasks {
        assert_eq!(t.await.unwrap(), StatusCode::CREATED);
    }
    assert_eq!(store.len().await, 10);
}
