//! End-to-end session flows through the JSON API.
//!
//! Drives the full stack — router, handlers, engine, mock upstreams —
//! the way an operator client would.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use beadroad::api;
use beadroad::api::routes::ApiState;
use beadroad::engine::SessionEngine;
use beadroad::ledger::Ledger;
use beadroad::types::Outcome;
use beadroad::upstream::{PredictionOracle, ResultSink};

use crate::mock_upstream::{MockOracle, MockSink};

fn build_app(oracle: Option<Arc<MockOracle>>, sink: Option<Arc<MockSink>>) -> Router {
    let state = Arc::new(ApiState::new(
        "TEST-TABLE".to_string(),
        oracle.map(|o| o as Arc<dyn PredictionOracle>),
        sink.map(|s| s as Arc<dyn ResultSink>),
    ));
    api::build_router(state)
}

async fn post(app: &Router, uri: &str, body: Option<String>) -> (StatusCode, serde_json::Value) {
    let request = match body {
        Some(json) => Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(json))
            .unwrap(),
        None => Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };
    let resp = app.clone().oneshot(request).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), 100_000).await.unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let resp = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), 100_000).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

async fn record(app: &Router, outcome: &str) -> (StatusCode, serde_json::Value) {
    post(app, "/api/rounds", Some(format!(r#"{{"outcome":"{outcome}"}}"#))).await
}

// ---------------------------------------------------------------------------
// Ledger growth and refusal
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_table_fills_then_refuses() {
    let app = build_app(None, None);
    let tokens = ["PLAYER", "BANKER", "TIE"];

    for i in 0..78 {
        let (status, json) = record(&app, tokens[i % 3]).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["record"]["round_number"], i as u64 + 1);
        assert_eq!(json["table_full"], i == 77);
    }

    // 79th recording is refused and mutates nothing
    let (status, json) = record(&app, "PLAYER").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json["error"].as_str().unwrap().contains("full"));

    let (_, session) = get(&app, "/api/session").await;
    assert_eq!(session["rounds_recorded"], 78);
    assert_eq!(session["table_full"], true);

    let (_, road) = get(&app, "/api/road").await;
    assert_eq!(road["filled"], 78);
}

#[tokio::test]
async fn test_road_and_stats_follow_recording_order() {
    let app = build_app(None, None);
    record(&app, "PLAYER").await;
    record(&app, "PLAYER").await;
    record(&app, "BANKER").await;

    let (_, stats) = get(&app, "/api/stats").await;
    assert_eq!(stats["total"], 3);
    assert_eq!(stats["player_wins"], 2);
    assert_eq!(stats["player_pct"], 66.7);
    assert_eq!(stats["banker_wins"], 1);
    assert_eq!(stats["banker_pct"], 33.3);
    assert_eq!(stats["ties"], 0);

    // Column-major: the first three land in column 0, rows 0..2
    let (_, road) = get(&app, "/api/road").await;
    assert_eq!(road["cells"][0][0], "PLAYER");
    assert_eq!(road["cells"][1][0], "PLAYER");
    assert_eq!(road["cells"][2][0], "BANKER");
    assert_eq!(road["cells"][0][1], serde_json::Value::Null);
}

#[tokio::test]
async fn test_delete_last_round_then_renumber() {
    let app = build_app(None, None);
    record(&app, "PLAYER").await;
    record(&app, "BANKER").await;

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/rounds/last")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let (_, session) = get(&app, "/api/session").await;
    assert_eq!(session["rounds_recorded"], 1);
    assert_eq!(session["next_round"], 2);

    // The replacement round reuses the freed number
    let (_, json) = record(&app, "TIE").await;
    assert_eq!(json["record"]["round_number"], 2);
}

// ---------------------------------------------------------------------------
// Prediction lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_prediction_lifecycle() {
    let oracle = Arc::new(MockOracle::with_replies([Outcome::Banker, Outcome::Tie]));
    let app = build_app(Some(oracle), None);

    // Correct prediction
    let (status, predict) = post(&app, "/api/predictions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(predict["prediction"], "BANKER");

    record(&app, "BANKER").await;
    let (_, totals) = get(&app, "/api/predictions").await;
    assert_eq!(totals["total"], 1);
    assert_eq!(totals["correct"], 1);
    assert_eq!(totals["accuracy"], 100.0);
    assert_eq!(totals["banker_predictions"], 1);
    assert_eq!(totals["pending"], serde_json::Value::Null);

    // Wrong prediction halves the accuracy
    post(&app, "/api/predictions", None).await;
    record(&app, "PLAYER").await;
    let (_, totals) = get(&app, "/api/predictions").await;
    assert_eq!(totals["total"], 2);
    assert_eq!(totals["correct"], 1);
    assert_eq!(totals["accuracy"], 50.0);
    assert_eq!(totals["tie_predictions"], 1);
}

#[tokio::test]
async fn test_round_without_prediction_is_not_scored() {
    let oracle = Arc::new(MockOracle::with_replies([Outcome::Player]));
    let app = build_app(Some(oracle), None);

    post(&app, "/api/predictions", None).await;
    record(&app, "PLAYER").await;
    // A second round with no new prediction
    record(&app, "BANKER").await;

    let (_, totals) = get(&app, "/api/predictions").await;
    assert_eq!(totals["total"], 1);
}

#[tokio::test]
async fn test_oracle_failure_leaves_state_consistent() {
    let oracle = Arc::new(MockOracle::with_replies([Outcome::Player]));
    oracle.set_error("connection refused");
    let app = build_app(Some(oracle.clone()), None);

    let (status, predict) = post(&app, "/api/predictions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(predict["prediction"], serde_json::Value::Null);
    assert!(predict["message"].as_str().unwrap().contains("connection refused"));

    // Recording still works and nothing was scored
    let (status, _) = record(&app, "TIE").await;
    assert_eq!(status, StatusCode::OK);
    let (_, totals) = get(&app, "/api/predictions").await;
    assert_eq!(totals["total"], 0);

    // Oracle recovery is picked up on the next request
    oracle.clear_error();
    let (_, predict) = post(&app, "/api/predictions", None).await;
    assert_eq!(predict["prediction"], "PLAYER");
}

// ---------------------------------------------------------------------------
// Sink behaviour
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_sink_notified_of_each_round() {
    let sink = Arc::new(MockSink::new());
    let app = build_app(None, Some(sink.clone()));

    record(&app, "PLAYER").await;
    record(&app, "TIE").await;
    record(&app, "BANKER").await;

    // Notifications run on spawned tasks
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(
        sink.notices(),
        vec![
            (1, Outcome::Player),
            (2, Outcome::Tie),
            (3, Outcome::Banker),
        ]
    );
}

#[tokio::test]
async fn test_sink_failure_never_surfaces() {
    let sink = Arc::new(MockSink::new());
    sink.set_error("gateway timeout");
    let app = build_app(None, Some(sink.clone()));

    let (status, _) = record(&app, "PLAYER").await;
    assert_eq!(status, StatusCode::OK);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(sink.notices().is_empty());

    // Local state is fully intact
    let (_, session) = get(&app, "/api/session").await;
    assert_eq!(session["rounds_recorded"], 1);
}

// ---------------------------------------------------------------------------
// Clear scoping
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_clear_totals_then_clear_session() {
    let oracle = Arc::new(MockOracle::with_replies([Outcome::Banker, Outcome::Tie]));
    let app = build_app(Some(oracle), None);

    post(&app, "/api/predictions", None).await;
    record(&app, "BANKER").await;
    post(&app, "/api/predictions", None).await; // pending TIE

    // Totals-only clear: rounds and pending prediction survive
    let (_, totals) = post(&app, "/api/predictions/clear", None).await;
    assert_eq!(totals["total"], 0);
    assert_eq!(totals["accuracy"], 0.0);
    assert_eq!(totals["pending"]["outcome"], "TIE");

    let (_, session) = get(&app, "/api/session").await;
    assert_eq!(session["rounds_recorded"], 1);

    // Full clear: everything resets, numbering restarts
    let (_, session) = post(&app, "/api/session/clear", None).await;
    assert_eq!(session["rounds_recorded"], 0);
    assert_eq!(session["next_round"], 1);

    let (_, totals) = get(&app, "/api/predictions").await;
    assert_eq!(totals["pending"], serde_json::Value::Null);

    let (_, json) = record(&app, "PLAYER").await;
    assert_eq!(json["record"]["round_number"], 1);
}

#[tokio::test]
async fn test_delete_last_does_not_adjust_prediction_totals() {
    let oracle = Arc::new(MockOracle::with_replies([Outcome::Player]));
    let app = build_app(Some(oracle), None);

    post(&app, "/api/predictions", None).await;
    record(&app, "PLAYER").await;

    let delete = Request::builder()
        .method("DELETE")
        .uri("/api/rounds/last")
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(delete).await.unwrap();

    // Undoing the round does not unscore its prediction
    let (_, totals) = get(&app, "/api/predictions").await;
    assert_eq!(totals["total"], 1);
    assert_eq!(totals["correct"], 1);
}

// ---------------------------------------------------------------------------
// Oracle response race
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_late_oracle_response_cannot_attach_to_closed_round() {
    // Exercised at the engine level: the round the response was
    // requested for closes before the response is applied.
    let mut engine = SessionEngine::new();
    let for_round = engine.next_round();

    engine.record(Outcome::Player).unwrap();
    assert!(!engine.accept_prediction(Outcome::Banker, for_round));
    assert!(engine.pending_prediction().is_none());

    // Recording another round scores nothing
    engine.record(Outcome::Banker).unwrap();
    assert_eq!(engine.prediction_totals().total, 0);
    assert_eq!(engine.ledger().len(), 2);
    assert!(engine.ledger().len() <= Ledger::capacity());
}
