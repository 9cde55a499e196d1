//! Web API file endpoint tests.
//!
//! Integration tests for listing, upload, download, edit, replace, rename,
//! and delete, each running against an isolated temporary storage root.

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use filebay::config::{ApiConfig, StorageConfig};
use filebay::store::FileStore;
use filebay::web::handlers::AppState;
use filebay::web::middleware::ApiKeyState;
use filebay::web::router::{create_health_router, create_router};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;

/// Create a test server over a fresh temporary storage root.
fn create_test_server() -> (TestServer, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = StorageConfig {
        root: dir.path().join("storage").to_str().unwrap().to_string(),
        max_upload_mb: 1,
        max_edit_bytes: 1000,
        ..StorageConfig::default()
    };

    let store = FileStore::new(&config).expect("Failed to create store");
    let app_state = Arc::new(AppState::new(store));
    let api_key_state = Arc::new(ApiKeyState::new(&ApiConfig::default().key));

    let router = create_router(app_state, api_key_state).merge(create_health_router());
    let server = TestServer::new(router).expect("Failed to create test server");

    (server, dir)
}

/// Upload a single named file and return the stored name.
async fn upload(server: &TestServer, name: &str, content: &[u8]) -> String {
    let form = MultipartForm::new().add_part(
        "files",
        Part::bytes(content.to_vec()).file_name(name.to_string()),
    );

    let response = server.post("/files").multipart(form).await;
    response.assert_status_ok();

    let body: Value = response.json();
    body["data"]["saved"][0].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let (server, _dir) = create_test_server();

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_list_empty() {
    let (server, _dir) = create_test_server();

    let response = server.get("/files").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["data"]["files"].as_array().unwrap().len(), 0);
    assert_eq!(body["data"]["total_bytes"], 0);
}

#[tokio::test]
async fn test_upload_and_list() {
    let (server, _dir) = create_test_server();

    let stored = upload(&server, "report.txt", b"hello").await;
    assert_eq!(stored, "report.txt");

    let response = server.get("/files").await;
    let body: Value = response.json();

    let files = body["data"]["files"].as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["name"], "report.txt");
    assert_eq!(files[0]["size"], 5);
    assert_eq!(files[0]["editable"], true);
    assert_eq!(files[0]["download"], "/files/report.txt/download");
    assert_eq!(files[0]["view"], "/files/report.txt/view");
    assert_eq!(body["data"]["total_bytes"], 5);
}

#[tokio::test]
async fn test_upload_duplicate_name_gets_suffix() {
    let (server, _dir) = create_test_server();

    let first = upload(&server, "report.txt", b"hello").await;
    let second = upload(&server, "report.txt", b"other").await;

    assert_eq!(first, "report.txt");
    assert_eq!(second, "report_1.txt");

    // Original untouched
    let response = server.get("/files/report.txt/download").await;
    response.assert_status_ok();
    assert_eq!(response.as_bytes().as_ref(), b"hello");
}

#[tokio::test]
async fn test_upload_multiple_files() {
    let (server, _dir) = create_test_server();

    let form = MultipartForm::new()
        .add_part("files", Part::bytes(b"aaa".to_vec()).file_name("a.txt"))
        .add_part("files", Part::bytes(b"bbb".to_vec()).file_name("b.txt"));

    let response = server.post("/files").multipart(form).await;
    response.assert_status_ok();

    let body: Value = response.json();
    let saved = body["data"]["saved"].as_array().unwrap();
    assert_eq!(saved.len(), 2);
}

#[tokio::test]
async fn test_upload_no_files_is_bad_request() {
    let (server, _dir) = create_test_server();

    let form = MultipartForm::new().add_text("note", "not a file");

    let response = server.post("/files").multipart(form).await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_download_round_trip() {
    let (server, _dir) = create_test_server();
    let content: Vec<u8> = (0..=255).collect();

    let stored = upload(&server, "blob.bin", &content).await;

    let response = server.get(&format!("/files/{stored}/download")).await;
    response.assert_status_ok();
    assert_eq!(response.as_bytes().as_ref(), content.as_slice());

    let disposition = response.header("content-disposition");
    assert!(disposition.to_str().unwrap().starts_with("attachment"));
}

#[tokio::test]
async fn test_view_is_inline() {
    let (server, _dir) = create_test_server();

    upload(&server, "photo.png", b"\x89PNG fake").await;

    let response = server.get("/files/photo.png/view").await;
    response.assert_status_ok();

    let disposition = response.header("content-disposition");
    assert!(disposition.to_str().unwrap().starts_with("inline"));
}

#[tokio::test]
async fn test_download_missing_is_404() {
    let (server, _dir) = create_test_server();

    let response = server.get("/files/ghost.txt/download").await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_edit_text_content() {
    let (server, _dir) = create_test_server();

    upload(&server, "notes.txt", b"old").await;

    let response = server
        .put("/files/notes.txt/content")
        .content_type("text/plain")
        .text("new content")
        .await;
    response.assert_status_ok();

    let response = server.get("/files/notes.txt/download").await;
    assert_eq!(response.as_bytes().as_ref(), b"new content");
}

#[tokio::test]
async fn test_get_content_returns_text() {
    let (server, _dir) = create_test_server();

    upload(&server, "notes.txt", "olá".as_bytes()).await;

    let response = server.get("/files/notes.txt/content").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "olá");
}

#[tokio::test]
async fn test_get_content_rejects_invalid_utf8() {
    let (server, _dir) = create_test_server();

    upload(&server, "blob.txt", &[0xff, 0xfe, 0x00]).await;

    let response = server.get("/files/blob.txt/content").await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_edit_rejected_over_ceiling() {
    let (server, _dir) = create_test_server();

    // Editable-looking extension but over the 1000-byte test ceiling.
    let big = vec![b'x'; 1500];
    upload(&server, "big.txt", &big).await;

    let response = server
        .put("/files/big.txt/content")
        .content_type("text/plain")
        .text("short")
        .await;
    response.assert_status_bad_request();

    // File unchanged
    let response = server.get("/files/big.txt/download").await;
    assert_eq!(response.as_bytes().len(), 1500);
}

#[tokio::test]
async fn test_edit_rejected_for_binary_extension() {
    let (server, _dir) = create_test_server();

    upload(&server, "image.png", b"\x89PNG").await;

    let response = server
        .put("/files/image.png/content")
        .content_type("text/plain")
        .text("text")
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_replace_raw_bytes_any_extension() {
    let (server, _dir) = create_test_server();

    upload(&server, "image.png", b"old").await;

    let response = server
        .put("/files/image.png/content")
        .content_type("application/octet-stream")
        .bytes(vec![1u8, 2, 3, 4].into())
        .await;
    response.assert_status_ok();

    let response = server.get("/files/image.png/download").await;
    assert_eq!(response.as_bytes().as_ref(), &[1u8, 2, 3, 4]);
}

#[tokio::test]
async fn test_rename() {
    let (server, _dir) = create_test_server();

    upload(&server, "a.txt", b"content").await;

    let response = server
        .post("/files/a.txt/rename")
        .json(&serde_json::json!({"new_name": "b.txt"}))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["data"]["name"], "b.txt");

    server.get("/files/a.txt/download").await.assert_status_not_found();
    server.get("/files/b.txt/download").await.assert_status_ok();
}

#[tokio::test]
async fn test_rename_with_separator_is_bad_request() {
    let (server, _dir) = create_test_server();

    upload(&server, "a.txt", b"x").await;

    let response = server
        .post("/files/a.txt/rename")
        .json(&serde_json::json!({"new_name": "b/c.txt"}))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_rename_conflict_is_409() {
    let (server, _dir) = create_test_server();

    upload(&server, "a.txt", b"aaa").await;
    upload(&server, "b.txt", b"bbb").await;

    let response = server
        .post("/files/a.txt/rename")
        .json(&serde_json::json!({"new_name": "b.txt"}))
        .await;
    response.assert_status(StatusCode::CONFLICT);

    // Both files unchanged
    let a = server.get("/files/a.txt/download").await;
    assert_eq!(a.as_bytes().as_ref(), b"aaa");
    let b = server.get("/files/b.txt/download").await;
    assert_eq!(b.as_bytes().as_ref(), b"bbb");
}

#[tokio::test]
async fn test_delete_then_delete_again() {
    let (server, _dir) = create_test_server();

    upload(&server, "gone.txt", b"x").await;

    server.delete("/files/gone.txt").await.assert_status_ok();
    server
        .delete("/files/gone.txt")
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_traversal_name_is_rejected() {
    let (server, dir) = create_test_server();

    // A real file just outside the storage root
    std::fs::write(dir.path().join("secret.txt"), b"secret").unwrap();

    let response = server.get("/files/..%2Fsecret.txt/download").await;
    assert!(
        response.status_code() == StatusCode::BAD_REQUEST
            || response.status_code() == StatusCode::NOT_FOUND,
        "traversal must not be served, got {}",
        response.status_code()
    );
}

#[tokio::test]
async fn test_oversized_upload_rejected() {
    let (server, dir) = create_test_server();

    // Over the 1 MB test limit
    let content = vec![0u8; 2 * 1024 * 1024];
    let form = MultipartForm::new().add_part(
        "files",
        Part::bytes(content).file_name("huge.bin"),
    );

    let response = server.post("/files").multipart(form).await;
    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);

    // Nothing was stored
    let leftovers: Vec<_> = std::fs::read_dir(dir.path().join("storage"))
        .unwrap()
        .filter_map(|e| e.ok())
        .collect();
    assert!(leftovers.is_empty());
}

#[tokio::test]
async fn test_oversized_field_saves_nothing() {
    let (server, dir) = create_test_server();

    // Over the 1 MB store limit but inside the transport slack, so the
    // request body itself is accepted and the per-field check decides.
    let oversized = vec![0u8; 1024 * 1024 + 10];
    let form = MultipartForm::new()
        .add_part("files", Part::bytes(b"ok".to_vec()).file_name("small.txt"))
        .add_part("files", Part::bytes(oversized).file_name("huge.bin"));

    let response = server.post("/files").multipart(form).await;
    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);

    // The valid field earlier in the request must not have been stored
    let leftovers: Vec<_> = std::fs::read_dir(dir.path().join("storage"))
        .unwrap()
        .filter_map(|e| e.ok())
        .collect();
    assert!(leftovers.is_empty());
}

#[tokio::test]
async fn test_listing_sorted_case_insensitive() {
    let (server, _dir) = create_test_server();

    upload(&server, "Banana.txt", b"b").await;
    upload(&server, "apple.txt", b"a").await;
    upload(&server, "Cherry.txt", b"c").await;

    let response = server.get("/files").await;
    let body: Value = response.json();
    let names: Vec<&str> = body["data"]["files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();

    assert_eq!(names, vec!["apple.txt", "Banana.txt", "Cherry.txt"]);
}
