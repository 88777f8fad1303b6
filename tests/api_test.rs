//! Integration tests for health, events, assistant, calculators, seeding,
//! beacons, and the OpenAPI document.

mod common;

use common::TestHarness;
use serde_json::{json, Value};

#[tokio::test]
async fn health_is_not_cached() {
    let h = TestHarness::with_server().await;
    let resp = h.get("/api/health").await;
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["cache-control"], "no-store");
    assert!(resp.headers().contains_key("x-request-id"));
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert!(body["uptime"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn request_id_is_echoed() {
    let h = TestHarness::with_server().await;
    let resp = h
        .client
        .get(h.url("/api/health"))
        .header("x-request-id", "trace-me-123")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers()["x-request-id"], "trace-me-123");
}

#[tokio::test]
async fn error_bodies_carry_the_request_id() {
    let h = TestHarness::with_server().await;
    let resp = h
        .client
        .get(h.url("/api/applications/app_missing"))
        .header("x-request-id", "err-req-9")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "not_found");
    assert_eq!(body["request_id"], "err-req-9");
}

#[tokio::test]
async fn events_filters() {
    let h = TestHarness::seeded().await;

    let all = h.get_json("/api/events", 200).await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let recommended = h.get_json("/api/events?recommended=true", 200).await;
    assert_eq!(recommended.as_array().unwrap().len(), 2);

    let meetups = h.get_json("/api/events?type=meetup", 200).await;
    assert_eq!(meetups[0]["id"], "evt_002");

    let tools = h.get_json("/api/events?industry=developer", 200).await;
    assert_eq!(tools.as_array().unwrap().len(), 1);
    assert_eq!(tools[0]["id"], "evt_003");

    assert_eq!(h.get("/api/events?type=hackathon").await.status(), 400);
}

#[tokio::test]
async fn chat_topics() {
    let h = TestHarness::with_server().await;

    let resp = h
        .post("/api/chat", json!({ "message": "Any climate GRANTS open?" }))
        .await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["topic"], "opportunities");

    let body: Value = h
        .post(
            "/api/chat",
            json!({
                "message": "review my pitch",
                "attachments": [{ "name": "deck.pdf", "size": 1536 }]
            }),
        )
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["topic"], "document_review");
    assert_eq!(body["attachments"][0]["size"], "1.5 KB");

    let body: Value = h
        .post("/api/chat", json!({ "input": "hello" }))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["topic"], "general");
}

#[tokio::test]
async fn finance_analysis_uses_defaults() {
    let h = TestHarness::with_server().await;
    let resp = h.post("/api/finance/analysis", json!({})).await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["riskScore"], 63);
    assert_eq!(body["riskLevel"], "Moderate");
    assert_eq!(body["requiredFunding"], 0);
    assert_eq!(body["projection"].as_array().unwrap().len(), 12);

    let body: Value = h
        .post(
            "/api/finance/analysis",
            json!({ "monthlyRevenue": 0, "burnRate": 100000, "cashReserve": 500000 }),
        )
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["requiredFunding"], 700_000);
    assert_eq!(body["runwayMonths"], 5.0);
}

#[tokio::test]
async fn seeding_is_idempotent() {
    let h = TestHarness::with_server().await;

    let info = h.get_json("/api/seed", 200).await;
    assert_eq!(info["status"], "ok");

    let resp = h.post("/api/seed", json!({})).await;
    assert_eq!(resp.status(), 200);
    let first: Value = resp.json().await.unwrap();
    assert_eq!(first["success"], true);
    assert_eq!(first["data"]["opportunities"], 6);

    let second: Value = h.post("/api/seed", json!({})).await.json().await.unwrap();
    assert_eq!(second["data"]["opportunities"], 0);

    let all = h.get_json("/api/opportunities", 200).await;
    assert_eq!(all.as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn analytics_beacons() {
    let h = TestHarness::with_server().await;

    let resp = h.get("/api/analytics").await;
    assert_eq!(resp.headers()["cache-control"], "no-store");

    let resp = h
        .client
        .post(h.url("/api/analytics"))
        .header("user-agent", "x".repeat(500))
        .json(&json!({ "event": "opportunity_view", "id": "opp_001", "path": "/opportunities" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["cache-control"], "no-store");
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ok"], true);

    let stored = fb_db::queries::analytics::recent_beacons(&h.conn(), 10).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].user_agent.as_deref().map(str::len), Some(200));
    assert!(stored[0].ts.is_some());

    let resp = h.post("/api/analytics", json!({ "path": "/x" })).await;
    assert_eq!(resp.status(), 400);
    assert_eq!(resp.headers()["cache-control"], "no-store");

    let resp = h
        .post("/api/analytics", json!({ "event": "click", "ts": "yesterday" }))
        .await;
    assert_eq!(resp.status(), 400);

    let resp = h
        .client
        .post(h.url("/api/analytics"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    assert_eq!(resp.headers()["cache-control"], "no-store");
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Validation error: Invalid JSON");
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let h = TestHarness::with_server().await;
    let doc = h.get_json("/api-docs/openapi.json", 200).await;
    assert!(doc["paths"]["/api/dashboard"].is_object());
    assert!(doc["paths"]["/api/applications/{id}"].is_object());
}
