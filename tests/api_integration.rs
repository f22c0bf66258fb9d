use astrator_server::db::models::{Design, DesignPatch, DesignSummary, NewDesign};
use astrator_server::db::services::{DesignStore, MemoryDesignStore, StoreError};
use astrator_server::server::config::ServerConfig;
use astrator_server::web::create_axum_router;
use async_trait::async_trait;
use axum::body::Bytes;
use axum_test::TestServer;
use serde_json::{Value, json};
use std::sync::Arc;

fn server_with(store: Arc<dyn DesignStore>, config: ServerConfig) -> TestServer {
    let app = create_axum_router(store, Arc::new(config));
    TestServer::new(app).unwrap()
}

fn sample_server() -> TestServer {
    server_with(
        Arc::new(MemoryDesignStore::with_samples()),
        ServerConfig::default(),
    )
}

#[tokio::test]
async fn health_endpoint_returns_ok() {
    let server = sample_server();
    let resp = server.get("/api/health").await;
    assert_eq!(resp.status_code(), 200);
    assert_eq!(resp.text(), "OK");
}

#[tokio::test]
async fn list_returns_sample_designs() {
    let server = sample_server();
    let resp = server.get("/api/designs").await;
    assert_eq!(resp.status_code(), 200);

    let body: Value = resp.json();
    assert_eq!(
        body,
        json!({
            "designs": [
                {"id": 1, "name": "Design 1", "updated_at": "2023-01-01"},
                {"id": 2, "name": "Design 2", "updated_at": "2023-01-02"}
            ]
        })
    );
}

#[tokio::test]
async fn create_echoes_payload_with_next_id() {
    let server = sample_server();
    let resp = server
        .post("/api/designs")
        .json(&json!({"name": "Logo", "data": {"elements": [1]}}))
        .await;

    assert_eq!(resp.status_code(), 201);
    let body: Value = resp.json();
    assert_eq!(body, json!({"id": 3, "name": "Logo", "data": {"elements": [1]}}));
}

#[tokio::test]
async fn create_without_name_is_untitled() {
    let server = sample_server();
    let resp = server.post("/api/designs").json(&json!({})).await;

    assert_eq!(resp.status_code(), 201);
    let body: Value = resp.json();
    assert_eq!(body["name"], "Untitled");
    assert_eq!(body["data"], json!({}));
}

#[tokio::test]
async fn create_rejects_non_json_content_types() {
    let server = sample_server();

    for content_type in ["text/plain", "application/x-www-form-urlencoded", "text/json"] {
        let resp = server
            .post("/api/designs")
            .bytes(Bytes::from_static(br#"{"name": "Logo"}"#))
            .content_type(content_type)
            .await;
        assert_eq!(resp.status_code(), 400, "content type {content_type}");
        let body: Value = resp.json();
        assert_eq!(body["error"], "Request must be JSON");
    }

    let resp = server
        .post("/api/designs")
        .bytes(Bytes::from_static(br#"{"name": "Logo"}"#))
        .await;
    assert_eq!(resp.status_code(), 400);
    let body: Value = resp.json();
    assert_eq!(body["error"], "Request must be JSON");
}

#[tokio::test]
async fn create_rejects_malformed_and_non_object_bodies() {
    let server = sample_server();

    let resp = server
        .post("/api/designs")
        .bytes(Bytes::from_static(b"{not json"))
        .content_type("application/json")
        .await;
    assert_eq!(resp.status_code(), 400);
    let body: Value = resp.json();
    assert!(body["error"].as_str().unwrap().starts_with("Malformed JSON body"));

    let resp = server.post("/api/designs").json(&json!([1, 2, 3])).await;
    assert_eq!(resp.status_code(), 400);
    let body: Value = resp.json();
    assert!(body.get("error").is_some());
}

#[tokio::test]
async fn create_with_null_name_is_untitled_but_non_string_name_is_rejected() {
    let server = sample_server();

    let resp = server.post("/api/designs").json(&json!({"name": null})).await;
    assert_eq!(resp.status_code(), 201);
    let body: Value = resp.json();
    assert_eq!(body["name"], "Untitled");

    let resp = server.post("/api/designs").json(&json!({"name": 7})).await;
    assert_eq!(resp.status_code(), 400);
    let body: Value = resp.json();
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));

    // The rejected create did not consume an id.
    let list: Value = server.get("/api/designs").await.json();
    assert_eq!(list["designs"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn created_design_can_be_fetched_and_listed() {
    let server = sample_server();
    server
        .post("/api/designs")
        .json(&json!({"name": "Poster", "data": {"elements": [{"kind": "circle"}]}}))
        .await;

    let resp = server.get("/api/designs/3").await;
    assert_eq!(resp.status_code(), 200);
    let body: Value = resp.json();
    assert_eq!(body["name"], "Poster");
    assert_eq!(body["data"]["elements"][0]["kind"], "circle");

    let list: Value = server.get("/api/designs").await.json();
    let names: Vec<&str> = list["designs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Design 1", "Design 2", "Poster"]);
}

#[tokio::test]
async fn get_unknown_design_returns_placeholder() {
    let server = sample_server();
    for id in [7, 42, 1000] {
        let resp = server.get(&format!("/api/designs/{id}")).await;
        assert_eq!(resp.status_code(), 200);
        let body: Value = resp.json();
        assert_eq!(
            body,
            json!({"id": id, "name": format!("Design {id}"), "data": {"elements": []}})
        );
    }
}

#[tokio::test]
async fn get_ids_beyond_32_bits_return_placeholder() {
    let server = sample_server();
    for id in [2_147_483_648_i64, 99_999_999_999] {
        let resp = server.get(&format!("/api/designs/{id}")).await;
        assert_eq!(resp.status_code(), 200, "id {id}");
        let body: Value = resp.json();
        assert_eq!(body["id"], id);
        assert_eq!(body["data"]["elements"], json!([]));
    }
}

#[tokio::test]
async fn get_with_non_integer_id_is_not_found() {
    let server = sample_server();
    for path in [
        "/api/designs/abc",
        "/api/designs/-1",
        "/api/designs/99999999999999999999",
    ] {
        let resp = server.get(path).await;
        assert_eq!(resp.status_code(), 404, "path {path}");
        assert!(resp.text().contains("404 - Page Not Found"));
    }
}

#[tokio::test]
async fn update_returns_success_for_any_id() {
    let server = sample_server();
    for id in [1, 55] {
        let resp = server
            .put(&format!("/api/designs/{id}"))
            .json(&json!({"name": "Changed"}))
            .await;
        assert_eq!(resp.status_code(), 200);
        let body: Value = resp.json();
        assert_eq!(body, json!({"status": "success", "id": id}));
    }

    // The unknown id was not created by the update.
    let list: Value = server.get("/api/designs").await.json();
    assert_eq!(list["designs"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn update_changes_only_named_fields() {
    let server = sample_server();
    server
        .put("/api/designs/2")
        .json(&json!({"data": {"elements": ["rect"]}, "extra": true}))
        .await;

    let body: Value = server.get("/api/designs/2").await.json();
    assert_eq!(body["name"], "Design 2");
    assert_eq!(body["data"], json!({"elements": ["rect"]}));
}

#[tokio::test]
async fn update_accepts_any_valid_json_body() {
    let server = sample_server();
    for body in [json!([1, 2]), json!({"name": 5}), json!("x"), json!(null)] {
        let resp = server.put("/api/designs/1").json(&body).await;
        assert_eq!(resp.status_code(), 200, "body {body}");
        let reply: Value = resp.json();
        assert_eq!(reply, json!({"status": "success", "id": 1}));
    }

    let body: Value = server.get("/api/designs/1").await.json();
    assert_eq!(body["name"], "Design 1");
    assert_eq!(body["data"], json!({"elements": []}));
}

#[tokio::test]
async fn update_takes_well_typed_fields_only() {
    let server = sample_server();
    server
        .put("/api/designs/2")
        .json(&json!({"name": 5, "data": {"elements": ["line"]}}))
        .await;

    let body: Value = server.get("/api/designs/2").await.json();
    assert_eq!(body["name"], "Design 2");
    assert_eq!(body["data"], json!({"elements": ["line"]}));
}

#[tokio::test]
async fn update_rejects_malformed_json() {
    let server = sample_server();
    let resp = server
        .put("/api/designs/1")
        .bytes(Bytes::from_static(b"{not json"))
        .content_type("application/json")
        .await;
    assert_eq!(resp.status_code(), 400);
    let body: Value = resp.json();
    assert!(body["error"].as_str().unwrap().starts_with("Malformed JSON body"));
}

#[tokio::test]
async fn update_rejects_non_json() {
    let server = sample_server();
    let resp = server.put("/api/designs/1").text("name=Changed").await;
    assert_eq!(resp.status_code(), 400);
    let body: Value = resp.json();
    assert_eq!(body["error"], "Request must be JSON");

    let body: Value = server.get("/api/designs/1").await.json();
    assert_eq!(body["name"], "Design 1");
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let config = ServerConfig {
        max_content_length: 64,
        ..ServerConfig::default()
    };
    let server = server_with(Arc::new(MemoryDesignStore::with_samples()), config);

    let big_name = "x".repeat(512);
    let resp = server
        .post("/api/designs")
        .json(&json!({"name": big_name}))
        .await;
    assert_eq!(resp.status_code(), 413);
}

#[tokio::test]
async fn pages_render() {
    let server = sample_server();

    let resp = server.get("/").await;
    assert_eq!(resp.status_code(), 200);
    assert!(resp.text().contains("Welcome to Astrator"));

    let resp = server.get("/design").await;
    assert_eq!(resp.status_code(), 200);
    assert!(resp.text().contains("design-canvas"));

    let resp = server.get("/design/12").await;
    assert_eq!(resp.status_code(), 200);
    assert!(resp.text().contains("data-design-id=\"12\""));

    let resp = server.get("/design/twelve").await;
    assert_eq!(resp.status_code(), 404);
}

#[tokio::test]
async fn unknown_path_renders_custom_404() {
    let server = sample_server();
    let resp = server.get("/nonexistent-path").await;
    assert_eq!(resp.status_code(), 404);
    let ct = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    assert!(ct.contains("text/html"), "expected HTML content-type");
    assert!(resp.text().contains("404 - Page Not Found"));
}

struct FailingStore;

#[async_trait]
impl DesignStore for FailingStore {
    async fn list(&self) -> Result<Vec<DesignSummary>, StoreError> {
        Err(StoreError::IdSpaceExhausted)
    }

    async fn create(&self, _new_design: NewDesign) -> Result<Design, StoreError> {
        Err(StoreError::IdSpaceExhausted)
    }

    async fn get(&self, _id: i64) -> Result<Option<Design>, StoreError> {
        Err(StoreError::IdSpaceExhausted)
    }

    async fn update(&self, _id: i64, _patch: DesignPatch) -> Result<Option<Design>, StoreError> {
        Err(StoreError::IdSpaceExhausted)
    }
}

#[tokio::test]
async fn store_failure_renders_custom_500() {
    let server = server_with(Arc::new(FailingStore), ServerConfig::default());

    let resp = server.get("/api/designs").await;
    assert_eq!(resp.status_code(), 500);
    assert!(resp.text().contains("500 - Internal Server Error"));

    let resp = server.post("/api/designs").json(&json!({"name": "Logo"})).await;
    assert_eq!(resp.status_code(), 500);
}
