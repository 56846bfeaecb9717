//! Integration tests for support tiers and supporters.

mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

use common::*;

fn tier(title: &str, cost: i64) -> Value {
    json!({"title": title, "description": format!("{} perks", title), "cost": cost})
}

#[tokio::test]
async fn test_add_tier_up_to_three() {
    let app = TestApp::new();
    let owner = app.user("Olive", "olive@example.com").await;
    let id = app.petition(&owner, "Tiered", 1, &[5]).await;
    let path = format!("/petitions/{}/supportTiers", id);

    app.put_as(&owner, &path, tier("Silver", 15))
        .await
        .assert_status(StatusCode::CREATED);
    app.put_as(&owner, &path, tier("Gold", 50))
        .await
        .assert_status(StatusCode::CREATED);

    let fourth = app.put_as(&owner, &path, tier("Platinum", 100)).await;
    assert_error(&fourth, StatusCode::FORBIDDEN);
    assert_eq!(app.tier_ids(id).await.len(), 3);
}

#[tokio::test]
async fn test_add_tier_errors() {
    let app = TestApp::new();
    let owner = app.user("Olive", "olive@example.com").await;
    let stranger = app.user("Sam", "sam@example.com").await;
    let id = app.petition(&owner, "Tiered", 1, &[5]).await;
    let path = format!("/petitions/{}/supportTiers", id);

    assert_error(
        &app.put_as(&owner, &path, tier("Tier 1", 9)).await,
        StatusCode::FORBIDDEN,
    );
    assert_error(
        &app.put_as(&stranger, &path, tier("Theirs", 9)).await,
        StatusCode::FORBIDDEN,
    );
    assert_error(
        &app.put_as(&owner, &path, json!({"title": "No cost"})).await,
        StatusCode::BAD_REQUEST,
    );
    assert_error(
        &app.put_as(&owner, "/petitions/999/supportTiers", tier("Ghost", 1))
            .await,
        StatusCode::NOT_FOUND,
    );
}

#[tokio::test]
async fn test_edit_tier() {
    let app = TestApp::new();
    let owner = app.user("Olive", "olive@example.com").await;
    let id = app.petition(&owner, "Tiered", 1, &[5, 10]).await;
    let tiers = app.tier_ids(id).await;
    let path = format!("/petitions/{}/supportTiers/{}", id, tiers[0]);

    app.patch_as(&owner, &path, json!({"title": "Bronze", "cost": 7}))
        .await
        .assert_status_ok();

    let detail = app.get(&format!("/petitions/{}", id)).await.json::<Value>();
    assert_eq!(detail["supportTiers"][0]["title"], "Bronze");
    assert_eq!(detail["supportTiers"][0]["cost"], 7);
    assert_eq!(detail["supportTiers"][0]["description"], "Support at level 1");

    let clash = app.patch_as(&owner, &path, json!({"title": "Tier 2"})).await;
    assert_error(&clash, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_tier_with_supporters_is_locked() {
    let app = TestApp::new();
    let owner = app.user("Olive", "olive@example.com").await;
    let fan = app.user("Fan", "fan@example.com").await;
    let id = app.petition(&owner, "Locked", 1, &[5, 10]).await;
    let tiers = app.tier_ids(id).await;
    app.support(&fan, id, tiers[0]).await;

    let path = format!("/petitions/{}/supportTiers/{}", id, tiers[0]);
    assert_error(
        &app.patch_as(&owner, &path, json!({"cost": 1})).await,
        StatusCode::FORBIDDEN,
    );
    assert_error(&app.delete_as(&owner, &path).await, StatusCode::FORBIDDEN);

    // The unsupported tier can still go
    let free = format!("/petitions/{}/supportTiers/{}", id, tiers[1]);
    app.delete_as(&owner, &free).await.assert_status_ok();
    assert_eq!(app.tier_ids(id).await, vec![tiers[0]]);
}

#[tokio::test]
async fn test_tier_must_belong_to_petition() {
    let app = TestApp::new();
    let owner = app.user("Olive", "olive@example.com").await;
    let first = app.petition(&owner, "First", 1, &[5]).await;
    let second = app.petition(&owner, "Second", 1, &[5]).await;
    let foreign = app.tier_ids(second).await[0];

    let path = format!("/petitions/{}/supportTiers/{}", first, foreign);
    assert_error(
        &app.patch_as(&owner, &path, json!({"cost": 2})).await,
        StatusCode::NOT_FOUND,
    );
    assert_error(&app.delete_as(&owner, &path).await, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cannot_delete_only_tier() {
    let app = TestApp::new();
    let owner = app.user("Olive", "olive@example.com").await;
    let id = app.petition(&owner, "Single", 1, &[5]).await;
    let only = app.tier_ids(id).await[0];

    let response = app
        .delete_as(&owner, &format!("/petitions/{}/supportTiers/{}", id, only))
        .await;
    assert_error(&response, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_supporters_listed_newest_first() {
    let app = TestApp::new();
    let owner = app.user("Olive", "olive@example.com").await;
    let early = app.user("Early", "early@example.com").await;
    let late = app.user("Late", "late@example.com").await;
    let id = app.petition(&owner, "Backed", 1, &[5, 10]).await;
    let tiers = app.tier_ids(id).await;

    app.support(&early, id, tiers[0]).await;
    app.post_as(
        &late,
        &format!("/petitions/{}/supporters", id),
        json!({"supportTierId": tiers[1]}),
    )
    .await
    .assert_status(StatusCode::CREATED);

    let response = app.get(&format!("/petitions/{}/supporters", id)).await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    let supporters = body.as_array().unwrap();

    assert_eq!(supporters.len(), 2);
    assert_eq!(supporters[0]["supporterId"], late.user_id);
    assert_eq!(supporters[0]["supporterFirstName"], "Late");
    assert!(supporters[0]["message"].is_null());
    assert_eq!(supporters[1]["supporterId"], early.user_id);
    assert_eq!(supporters[1]["supportTierId"], tiers[0]);
    assert_eq!(supporters[1]["message"], "Good luck");
}

#[tokio::test]
async fn test_supporters_of_missing_petition() {
    let app = TestApp::new();
    assert_error(
        &app.get("/petitions/321/supporters").await,
        StatusCode::NOT_FOUND,
    );
}

#[tokio::test]
async fn test_pledge_rules() {
    let app = TestApp::new();
    let owner = app.user("Olive", "olive@example.com").await;
    let fan = app.user("Fan", "fan@example.com").await;
    let id = app.petition(&owner, "Rules", 1, &[5, 10]).await;
    let other = app.petition(&owner, "Elsewhere", 1, &[5]).await;
    let tiers = app.tier_ids(id).await;
    let foreign = app.tier_ids(other).await[0];
    let path = format!("/petitions/{}/supporters", id);

    let own = app
        .post_as(&owner, &path, json!({"supportTierId": tiers[0]}))
        .await;
    assert_error(&own, StatusCode::FORBIDDEN);

    app.support(&fan, id, tiers[0]).await;
    let again = app
        .post_as(&fan, &path, json!({"supportTierId": tiers[0]}))
        .await;
    assert_error(&again, StatusCode::FORBIDDEN);

    // A different tier on the same petition is fine
    app.support(&fan, id, tiers[1]).await;

    let wrong_tier = app
        .post_as(&fan, &path, json!({"supportTierId": foreign}))
        .await;
    assert_error(&wrong_tier, StatusCode::NOT_FOUND);

    let missing = app
        .post_as(&fan, "/petitions/999/supporters", json!({"supportTierId": tiers[0]}))
        .await;
    assert_error(&missing, StatusCode::NOT_FOUND);

    let anonymous = app
        .post_json(&path, json!({"supportTierId": tiers[0]}))
        .await;
    assert_error(&anonymous, StatusCode::UNAUTHORIZED);
}
