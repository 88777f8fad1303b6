//! Integration tests for the startup profile routes.

mod common;

use common::{TestHarness, DEMO_USER};
use serde_json::{json, Value};

#[tokio::test]
async fn get_by_id_or_user() {
    let h = TestHarness::seeded().await;

    let by_user = h
        .get_json(&format!("/api/profile?userId={DEMO_USER}"), 200)
        .await;
    assert_eq!(by_user["name"], "EcoFlow Technologies");

    let by_id = h.get_json("/api/profile?id=profile_001", 200).await;
    assert_eq!(by_id["userId"], DEMO_USER);

    assert_eq!(h.get("/api/profile").await.status(), 400);
    assert_eq!(h.get("/api/profile?id=profile_999").await.status(), 404);
}

#[tokio::test]
async fn upsert_creates_then_replaces() {
    let h = TestHarness::with_server().await;
    let (user_id, _) = h.register("founder@example.com").await;

    let resp = h
        .post(
            "/api/profile",
            json!({ "userId": user_id, "name": "Orbital Labs", "stage": "seed" }),
        )
        .await;
    assert_eq!(resp.status(), 201);
    let created: Value = resp.json().await.unwrap();
    assert_eq!(created["isPublic"], false);

    let resp = h
        .post(
            "/api/profile",
            json!({ "userId": user_id, "name": "Orbital Labs Inc", "isPublic": true }),
        )
        .await;
    assert_eq!(resp.status(), 200);
    let replaced: Value = resp.json().await.unwrap();
    assert_eq!(replaced["id"], created["id"]);
    assert_eq!(replaced["name"], "Orbital Labs Inc");
    // Upsert writes every field.
    assert!(replaced["stage"].is_null());
}

#[tokio::test]
async fn upsert_requires_user_and_name() {
    let h = TestHarness::seeded().await;

    let resp = h.post("/api/profile", json!({ "name": "Nameless" })).await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("userId and name are required"));

    let resp = h
        .post("/api/profile", json!({ "userId": "ghost", "name": "Ghost Co" }))
        .await;
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn patch_keeps_unspecified_fields() {
    let h = TestHarness::seeded().await;

    let before = h.get_json("/api/profile?id=profile_001", 200).await;

    let resp = h
        .put(
            "/api/profile",
            json!({ "userId": DEMO_USER, "tagline": "Water, measured" }),
        )
        .await;
    assert_eq!(resp.status(), 200);
    let after: Value = resp.json().await.unwrap();
    assert_eq!(after["tagline"], "Water, measured");
    assert_eq!(after["name"], before["name"]);
    assert_eq!(after["industry"], before["industry"]);

    let resp = h.put("/api/profile", json!({ "tagline": "x" })).await;
    assert_eq!(resp.status(), 400);

    let resp = h
        .put("/api/profile", json!({ "id": "profile_999", "tagline": "x" }))
        .await;
    assert_eq!(resp.status(), 404);
}
