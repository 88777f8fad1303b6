//! Integration tests for dashboard metrics and analytics snapshots.

mod common;

use common::{TestHarness, DEMO_USER};
use serde_json::{json, Value};

#[tokio::test]
async fn dashboard_requires_user() {
    let h = TestHarness::seeded().await;
    assert_eq!(h.get("/api/dashboard").await.status(), 400);
}

#[tokio::test]
async fn dashboard_for_demo_user() {
    let h = TestHarness::seeded().await;
    let body = h
        .get_json(&format!("/api/dashboard?userId={DEMO_USER}&dateRange=7d"), 200)
        .await;

    // 25 (apps) + 10 (approved) + 6 (outreach) + 2 (saved) + 5 (positive)
    assert_eq!(body["readinessScore"], 48);
    assert_eq!(body["dateRange"], "7d");

    let summary = &body["summary"];
    assert_eq!(summary["totalApplications"], 5);
    assert_eq!(summary["approvedApplications"], 1);
    assert_eq!(summary["inProgressApplications"], 3);
    assert_eq!(summary["totalRequested"], 3_270_000);
    assert_eq!(summary["approvedAmount"], 900_000);
    assert_eq!(summary["successRate"], 20);
    assert_eq!(summary["totalOutreach"], 3);
    assert_eq!(summary["positiveResponses"], 1);
    assert_eq!(summary["pendingOutreach"], 1);

    let kpis = body["kpis"].as_array().unwrap();
    assert_eq!(kpis.len(), 4);
    assert_eq!(kpis[0]["value"], "7");
    assert_eq!(kpis[3]["value"], "$3.27M");

    assert_eq!(body["readinessSuggestions"].as_array().unwrap().len(), 3);
    assert_eq!(body["successMetrics"].as_array().unwrap().len(), 5);

    let pipeline = body["pipelineData"].as_array().unwrap();
    assert_eq!(pipeline.len(), 30);
    assert!(pipeline
        .iter()
        .all(|p| (0..=100).contains(&p["y"].as_i64().unwrap())));

    assert_eq!(
        body["activities"][0]["title"],
        "Application moved to Review: Clean Energy Pilot - Phase II"
    );
}

#[tokio::test]
async fn unknown_range_falls_back_and_empty_user_scores_zero() {
    let h = TestHarness::with_server().await;
    let body = h
        .get_json("/api/dashboard?userId=nobody&dateRange=365d", 200)
        .await;
    assert_eq!(body["dateRange"], "30d");
    assert_eq!(body["readinessScore"], 0);
    assert_eq!(body["summary"]["successRate"], 0);
    assert!(body["activities"][0]["title"]
        .as_str()
        .unwrap()
        .ends_with("Recent Application"));
}

#[tokio::test]
async fn snapshots_capture_current_metrics() {
    let h = TestHarness::seeded().await;

    let resp = h
        .post("/api/analytics/snapshots", json!({ "userId": DEMO_USER }))
        .await;
    assert_eq!(resp.status(), 201);
    let snap: Value = resp.json().await.unwrap();
    assert_eq!(snap["readinessScore"], 48);
    assert_eq!(snap["totalMatches"], 7);
    assert_eq!(snap["potentialFunding"], 3_270_000);

    let list = h
        .get_json(&format!("/api/analytics/snapshots?userId={DEMO_USER}"), 200)
        .await;
    let list = list.as_array().unwrap();
    assert_eq!(list[0]["id"], snap["id"]);

    let resp = h
        .post("/api/analytics/snapshots", json!({ "userId": "ghost" }))
        .await;
    assert_eq!(resp.status(), 404);
    assert_eq!(h.get("/api/analytics/snapshots").await.status(), 400);
}
