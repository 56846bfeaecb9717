//! Integration tests for the user account endpoints.

mod common;

use axum::http::{HeaderValue, StatusCode};
use serde_json::{Value, json};

use common::*;

#[tokio::test]
async fn test_register_login_logout() {
    let app = TestApp::new();

    let user_id = app.register("Ada", "ada@example.com").await;
    let session = app.login("ada@example.com").await;
    assert_eq!(session.user_id, user_id);
    assert_eq!(session.token.len(), 32);

    app.post_as(&session, "/users/logout", json!({}))
        .await
        .assert_status_ok();

    // The token no longer authenticates
    let response = app.post_as(&session, "/users/logout", json!({})).await;
    assert_error(&response, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_duplicate_email_is_forbidden() {
    let app = TestApp::new();
    app.register("Ada", "ada@example.com").await;

    let response = app
        .post_json(
            "/users/register",
            json!({
                "firstName": "Other",
                "lastName": "Person",
                "email": "ada@example.com",
                "password": "secret99"
            }),
        )
        .await;
    assert_error(&response, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_register_validation() {
    let app = TestApp::new();

    let bad_email = app
        .post_json(
            "/users/register",
            json!({"firstName": "A", "lastName": "B", "email": "nope", "password": "secret99"}),
        )
        .await;
    assert_error(&bad_email, StatusCode::BAD_REQUEST);

    let short_password = app
        .post_json(
            "/users/register",
            json!({"firstName": "A", "lastName": "B", "email": "a@b.c", "password": "12345"}),
        )
        .await;
    assert_error(&short_password, StatusCode::BAD_REQUEST);

    let missing_field = app
        .post_json("/users/register", json!({"firstName": "A", "email": "a@b.c"}))
        .await;
    assert_error(&missing_field, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_with_wrong_credentials() {
    let app = TestApp::new();
    app.register("Ada", "ada@example.com").await;

    let wrong_password = app
        .post_json(
            "/users/login",
            json!({"email": "ada@example.com", "password": "not-the-password"}),
        )
        .await;
    assert_error(&wrong_password, StatusCode::UNAUTHORIZED);

    let unknown_email = app
        .post_json(
            "/users/login",
            json!({"email": "bob@example.com", "password": PASSWORD}),
        )
        .await;
    assert_error(&unknown_email, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_view_user_shows_email_only_to_self() {
    let app = TestApp::new();
    let ada = app.user("Ada", "ada@example.com").await;
    let bob = app.user("Bob", "bob@example.com").await;
    let path = format!("/users/{}", ada.user_id);

    let own = app.get_as(&ada, &path).await;
    own.assert_status_ok();
    let body = own.json::<Value>();
    assert_eq!(body["firstName"], "Ada");
    assert_eq!(body["email"], "ada@example.com");

    let other = app.get_as(&bob, &path).await.json::<Value>();
    assert_eq!(other["firstName"], "Ada");
    assert!(other.get("email").is_none());

    let anonymous = app.get(&path).await.json::<Value>();
    assert!(anonymous.get("email").is_none());
}

#[tokio::test]
async fn test_view_user_errors() {
    let app = TestApp::new();

    assert_error(&app.get("/users/999").await, StatusCode::NOT_FOUND);
    assert_error(&app.get("/users/abc").await, StatusCode::BAD_REQUEST);
    assert_error(&app.get("/users/-1").await, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_token_on_optional_route_is_anonymous() {
    let app = TestApp::new();
    let ada = app.user("Ada", "ada@example.com").await;

    let response = app
        .server
        .get(&app.url(&format!("/users/{}", ada.user_id)))
        .add_header(X_AUTHORIZATION, HeaderValue::from_static("bogus"))
        .await;
    response.assert_status_ok();
    assert!(response.json::<Value>().get("email").is_none());
}

#[tokio::test]
async fn test_edit_profile() {
    let app = TestApp::new();
    let ada = app.user("Ada", "ada@example.com").await;
    let path = format!("/users/{}", ada.user_id);

    app.patch_as(
        &ada,
        &path,
        json!({"lastName": "Lovelace", "email": "countess@example.com"}),
    )
    .await
    .assert_status_ok();

    let body = app.get_as(&ada, &path).await.json::<Value>();
    assert_eq!(body["firstName"], "Ada");
    assert_eq!(body["lastName"], "Lovelace");
    assert_eq!(body["email"], "countess@example.com");

    // Keeping one's own email is allowed
    app.patch_as(&ada, &path, json!({"email": "countess@example.com"}))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_edit_profile_permissions() {
    let app = TestApp::new();
    let ada = app.user("Ada", "ada@example.com").await;
    let bob = app.user("Bob", "bob@example.com").await;
    let path = format!("/users/{}", ada.user_id);

    let other_user = app.patch_as(&bob, &path, json!({"firstName": "Hacked"})).await;
    assert_error(&other_user, StatusCode::FORBIDDEN);

    let taken_email = app
        .patch_as(&ada, &path, json!({"email": "bob@example.com"}))
        .await;
    assert_error(&taken_email, StatusCode::FORBIDDEN);

    let response = app
        .server
        .patch(&app.url(&path))
        .json(&json!({"firstName": "Anon"}))
        .await;
    assert_error(&response, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_change_password_rules() {
    let app = TestApp::new();
    let ada = app.user("Ada", "ada@example.com").await;
    let path = format!("/users/{}", ada.user_id);

    let missing_current = app
        .patch_as(&ada, &path, json!({"password": "brandnew1"}))
        .await;
    assert_error(&missing_current, StatusCode::BAD_REQUEST);

    let identical = app
        .patch_as(
            &ada,
            &path,
            json!({"password": PASSWORD, "currentPassword": PASSWORD}),
        )
        .await;
    assert_error(&identical, StatusCode::FORBIDDEN);

    let wrong_current = app
        .patch_as(
            &ada,
            &path,
            json!({"password": "brandnew1", "currentPassword": "wrongpass"}),
        )
        .await;
    assert_error(&wrong_current, StatusCode::UNAUTHORIZED);

    app.patch_as(
        &ada,
        &path,
        json!({"password": "brandnew1", "currentPassword": PASSWORD}),
    )
    .await
    .assert_status_ok();

    let old = app
        .post_json(
            "/users/login",
            json!({"email": "ada@example.com", "password": PASSWORD}),
        )
        .await;
    assert_error(&old, StatusCode::UNAUTHORIZED);

    app.post_json(
        "/users/login",
        json!({"email": "ada@example.com", "password": "brandnew1"}),
    )
    .await
    .assert_status_ok();
}
