//! Integration tests for petition and user images, plus the health check.

mod common;

use axum::body::Bytes;
use axum::http::{HeaderValue, StatusCode, header};
use serde_json::Value;

use common::*;

const PNG: &[u8] = b"\x89PNG\r\n\x1a\nnot-really-a-png";
const GIF: &[u8] = b"GIF89a-tiny";

async fn upload(
    app: &TestApp,
    session: &Session,
    path: &str,
    content_type: &'static str,
    bytes: &'static [u8],
) -> axum_test::TestResponse {
    app.server
        .put(&app.url(path))
        .add_header(X_AUTHORIZATION, session.header())
        .add_header(header::CONTENT_TYPE, HeaderValue::from_static(content_type))
        .bytes(Bytes::from_static(bytes))
        .await
}

#[tokio::test]
async fn test_petition_image_lifecycle() {
    let app = TestApp::new();
    let owner = app.user("Olive", "olive@example.com").await;
    let id = app.petition(&owner, "Pictured", 1, &[5]).await;
    let path = format!("/petitions/{}/image", id);

    assert_error(&app.get(&path).await, StatusCode::NOT_FOUND);

    upload(&app, &owner, &path, "image/png", PNG)
        .await
        .assert_status(StatusCode::CREATED);

    let response = app.get(&path).await;
    response.assert_status_ok();
    assert_eq!(response.header(header::CONTENT_TYPE), "image/png");
    assert_eq!(response.as_bytes().as_ref(), PNG);

    // Replacing with a different format swaps the file on disk
    upload(&app, &owner, &path, "image/gif", GIF)
        .await
        .assert_status_ok();
    let response = app.get(&path).await;
    assert_eq!(response.header(header::CONTENT_TYPE), "image/gif");
    assert!(app.image_dir().join(format!("petition_{}.gif", id)).exists());
    assert!(!app.image_dir().join(format!("petition_{}.png", id)).exists());
}

#[tokio::test]
async fn test_petition_image_errors() {
    let app = TestApp::new();
    let owner = app.user("Olive", "olive@example.com").await;
    let stranger = app.user("Sam", "sam@example.com").await;
    let id = app.petition(&owner, "Pictured", 1, &[5]).await;
    let path = format!("/petitions/{}/image", id);

    assert_error(
        &upload(&app, &owner, &path, "text/plain", b"hello").await,
        StatusCode::BAD_REQUEST,
    );
    assert_error(
        &upload(&app, &owner, &path, "image/png", b"").await,
        StatusCode::BAD_REQUEST,
    );
    assert_error(
        &upload(&app, &stranger, &path, "image/png", PNG).await,
        StatusCode::FORBIDDEN,
    );
    assert_error(
        &upload(&app, &owner, "/petitions/999/image", "image/png", PNG).await,
        StatusCode::NOT_FOUND,
    );
}

#[tokio::test]
async fn test_user_image_lifecycle() {
    let app = TestApp::new();
    let ada = app.user("Ada", "ada@example.com").await;
    let path = format!("/users/{}/image", ada.user_id);

    assert_error(&app.get(&path).await, StatusCode::NOT_FOUND);
    assert_error(&app.delete_as(&ada, &path).await, StatusCode::NOT_FOUND);

    upload(&app, &ada, &path, "image/jpeg", b"\xff\xd8\xffjpeg")
        .await
        .assert_status(StatusCode::CREATED);
    upload(&app, &ada, &path, "image/jpeg", b"\xff\xd8\xffjpeg2")
        .await
        .assert_status_ok();

    let response = app.get(&path).await;
    response.assert_status_ok();
    assert_eq!(response.header(header::CONTENT_TYPE), "image/jpeg");

    app.delete_as(&ada, &path).await.assert_status_ok();
    assert_error(&app.get(&path).await, StatusCode::NOT_FOUND);
    assert!(!app.image_dir().join(format!("user_{}.jpg", ada.user_id)).exists());
}

#[tokio::test]
async fn test_user_image_belongs_to_user() {
    let app = TestApp::new();
    let ada = app.user("Ada", "ada@example.com").await;
    let bob = app.user("Bob", "bob@example.com").await;
    let path = format!("/users/{}/image", ada.user_id);

    assert_error(
        &upload(&app, &bob, &path, "image/png", PNG).await,
        StatusCode::FORBIDDEN,
    );
    upload(&app, &ada, &path, "image/png", PNG)
        .await
        .assert_status(StatusCode::CREATED);
    assert_error(&app.delete_as(&bob, &path).await, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();
    let response = app.get("/health").await;
    response.assert_status_ok();

    let body = response.json::<Value>();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["backend"], "sqlite");
    assert!(body["timestamp"].is_string());
}
