//! Integration tests for `GET /petitions`.

mod common;

use axum::http::StatusCode;
use serde_json::Value;

use common::*;

/// Seeds three petitions and returns `(app, [parks, roads, library])` ids.
async fn seeded() -> (TestApp, Vec<i64>, Session, Session) {
    let app = TestApp::new();
    let olive = app.user("Olive", "olive@example.com").await;
    let sam = app.user("Sam", "sam@example.com").await;

    let parks = app.petition(&olive, "Save the parks", 1, &[10, 50]).await;
    let roads = app.petition(&olive, "Fix the roads", 2, &[30]).await;
    let library = app.petition(&sam, "Open the library", 3, &[5, 15]).await;

    let fan = app.user("Fan", "fan@example.com").await;
    let tier = app.tier_ids(parks).await[0];
    app.support(&fan, parks, tier).await;

    (app, vec![parks, roads, library], olive, fan)
}

fn ids(body: &Value) -> Vec<i64> {
    body["petitions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["petitionId"].as_i64().unwrap())
        .collect()
}

async fn search(app: &TestApp, params: &[(&str, &str)]) -> axum_test::TestResponse {
    let mut request = app.server.get(&app.url("/petitions"));
    for (key, value) in params {
        request = request.add_query_param(key, value);
    }
    request.await
}

#[tokio::test]
async fn test_search_without_filters_returns_everything() {
    let (app, petitions, _, _) = seeded().await;

    let response = search(&app, &[]).await;
    response.assert_status_ok();
    let body = response.json::<Value>();

    assert_eq!(body["count"], 3);
    assert_eq!(ids(&body), petitions);

    let parks = &body["petitions"][0];
    assert_eq!(parks["title"], "Save the parks");
    assert_eq!(parks["ownerFirstName"], "Olive");
    assert_eq!(parks["numberOfSupporters"], 1);
    assert_eq!(parks["supportingCost"], 10);
    assert_eq!(body["petitions"][1]["numberOfSupporters"], 0);
}

#[tokio::test]
async fn test_search_by_text_and_owner() {
    let (app, petitions, olive, _) = seeded().await;

    let body = search(&app, &[("q", "the")]).await.json::<Value>();
    assert_eq!(body["count"], 3);

    let body = search(&app, &[("q", "LIBRARY")]).await.json::<Value>();
    assert_eq!(ids(&body), vec![petitions[2]]);

    let owner = olive.user_id.to_string();
    let body = search(&app, &[("ownerId", owner.as_str())])
        .await
        .json::<Value>();
    assert_eq!(ids(&body), vec![petitions[0], petitions[1]]);
}

#[tokio::test]
async fn test_search_by_supporter_and_cost() {
    let (app, petitions, _, fan) = seeded().await;

    let supporter = fan.user_id.to_string();
    let body = search(&app, &[("supporterId", supporter.as_str())])
        .await
        .json::<Value>();
    assert_eq!(ids(&body), vec![petitions[0]]);

    let body = search(&app, &[("supportingCost", "10")]).await.json::<Value>();
    assert_eq!(ids(&body), vec![petitions[0], petitions[2]]);

    let body = search(&app, &[("supportingCost", "0")]).await.json::<Value>();
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn test_search_by_repeated_categories() {
    let (app, petitions, _, _) = seeded().await;

    let body = search(&app, &[("categoryIds", "1"), ("categoryIds", "3")])
        .await
        .json::<Value>();
    assert_eq!(ids(&body), vec![petitions[0], petitions[2]]);
}

#[tokio::test]
async fn test_search_sorting_and_window() {
    let (app, petitions, _, _) = seeded().await;

    let body = search(&app, &[("sortBy", "ALPHABETICAL_ASC")])
        .await
        .json::<Value>();
    assert_eq!(ids(&body), vec![petitions[1], petitions[2], petitions[0]]);

    let body = search(&app, &[("sortBy", "COST_DESC")]).await.json::<Value>();
    assert_eq!(ids(&body), vec![petitions[1], petitions[0], petitions[2]]);

    let body = search(
        &app,
        &[("sortBy", "CREATED_DESC"), ("startIndex", "1"), ("count", "1")],
    )
    .await
    .json::<Value>();
    assert_eq!(ids(&body), vec![petitions[1]]);
    assert_eq!(body["count"], 3);

    let body = search(&app, &[("startIndex", "10")]).await.json::<Value>();
    assert!(ids(&body).is_empty());
    assert_eq!(body["count"], 3);
}

#[tokio::test]
async fn test_search_rejects_bad_parameters() {
    let (app, _, _, _) = seeded().await;

    assert_error(
        &search(&app, &[("ownerId", "abc")]).await,
        StatusCode::BAD_REQUEST,
    );
    assert_error(
        &search(&app, &[("supportingCost", "-1")]).await,
        StatusCode::BAD_REQUEST,
    );
    assert_error(
        &search(&app, &[("categoryIds", "9999")]).await,
        StatusCode::BAD_REQUEST,
    );
    assert_error(
        &search(&app, &[("count", "ten")]).await,
        StatusCode::BAD_REQUEST,
    );
}

#[tokio::test]
async fn test_empty_values_are_ignored() {
    let (app, _, _, _) = seeded().await;

    let body = search(&app, &[("q", ""), ("ownerId", "  ")])
        .await
        .json::<Value>();
    assert_eq!(body["count"], 3);
}
