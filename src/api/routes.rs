//! API route handlers.
//!
//! All endpoints speak JSON. The engine is shared via
//! `Arc<ApiState>` and every mutation goes through a single
//! `tokio::sync::RwLock`, so user actions are processed to completion
//! one at a time and the ledger invariants hold under concurrent
//! triggering.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;

use crate::engine::SessionEngine;
use crate::ledger::Ledger;
use crate::road::{COLS, ROWS};
use crate::types::{BeadroadError, Outcome, RoundRecord};
use crate::upstream::{PredictionOracle, ResultSink};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct ApiState {
    pub session_name: String,
    pub engine: RwLock<SessionEngine>,
    pub oracle: Option<Arc<dyn PredictionOracle>>,
    pub sink: Option<Arc<dyn ResultSink>>,
}

impl ApiState {
    pub fn new(
        session_name: String,
        oracle: Option<Arc<dyn PredictionOracle>>,
        sink: Option<Arc<dyn ResultSink>>,
    ) -> Self {
        Self {
            session_name,
            engine: RwLock::new(SessionEngine::new()),
            oracle,
            sink,
        }
    }
}

pub type AppState = Arc<ApiState>;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RecordRequest {
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordResponse {
    pub record: RoundRecord,
    pub table_full: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub name: String,
    pub next_round: u32,
    pub rounds_recorded: usize,
    pub capacity: usize,
    pub table_full: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub total: u64,
    pub player_wins: u64,
    pub player_pct: f64,
    pub banker_wins: u64,
    pub banker_pct: f64,
    pub ties: u64,
    pub tie_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoadResponse {
    pub rows: usize,
    pub cols: usize,
    pub filled: usize,
    pub cells: Vec<Vec<Option<Outcome>>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PendingResponse {
    pub outcome: Outcome,
    pub for_round: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionTotalsResponse {
    pub total: u64,
    pub correct: u64,
    pub accuracy: f64,
    pub player_predictions: u64,
    pub banker_predictions: u64,
    pub tie_predictions: u64,
    pub pending: Option<PendingResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictResponse {
    pub prediction: Option<Outcome>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

fn error_body(e: &BeadroadError) -> Json<ErrorBody> {
    Json(ErrorBody { error: e.to_string() })
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /api/session
pub async fn get_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let engine = state.engine.read().await;
    Json(session_response(&state.session_name, &engine))
}

/// POST /api/session/clear
pub async fn clear_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let mut engine = state.engine.write().await;
    engine.clear_session();
    Json(session_response(&state.session_name, &engine))
}

/// GET /api/stats
pub async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let engine = state.engine.read().await;
    let stats = engine.stats();
    Json(StatsResponse {
        total: stats.total,
        player_wins: stats.counts.player,
        player_pct: stats.percentage(Outcome::Player),
        banker_wins: stats.counts.banker,
        banker_pct: stats.percentage(Outcome::Banker),
        ties: stats.counts.tie,
        tie_pct: stats.percentage(Outcome::Tie),
    })
}

/// GET /api/road
pub async fn get_road(State(state): State<AppState>) -> Json<RoadResponse> {
    let engine = state.engine.read().await;
    let road = engine.road();
    Json(RoadResponse {
        rows: ROWS,
        cols: COLS,
        filled: road.filled(),
        cells: road.rows(),
    })
}

/// POST /api/rounds
///
/// Records a round. On success the pending prediction is scored and the
/// sink is notified on a spawned task — recording never waits on the
/// sink, and a sink failure is logged and swallowed.
pub async fn record_round(
    State(state): State<AppState>,
    Json(request): Json<RecordRequest>,
) -> Result<Json<RecordResponse>, (StatusCode, Json<ErrorBody>)> {
    let mut engine = state.engine.write().await;

    let record = engine
        .record(request.outcome)
        .map_err(|e| (StatusCode::CONFLICT, error_body(&e)))?;
    let table_full = engine.is_full();
    drop(engine);

    if let Some(sink) = state.sink.clone() {
        let round = record.round_number;
        let winner = record.outcome;
        tokio::spawn(async move {
            if let Err(e) = sink.notify(round, winner).await {
                warn!(round, error = %e, "Sink notification failed, ignoring");
            }
        });
    }

    Ok(Json(RecordResponse { record, table_full }))
}

/// DELETE /api/rounds/last
pub async fn delete_last_round(
    State(state): State<AppState>,
) -> Result<Json<RoundRecord>, (StatusCode, Json<ErrorBody>)> {
    let mut engine = state.engine.write().await;
    engine
        .delete_last()
        .map(Json)
        .map_err(|e| (StatusCode::NOT_FOUND, error_body(&e)))
}

/// GET /api/predictions
pub async fn get_predictions(State(state): State<AppState>) -> Json<PredictionTotalsResponse> {
    let engine = state.engine.read().await;
    Json(totals_response(&engine))
}

/// POST /api/predictions
///
/// Consults the oracle for the upcoming round. Oracle failure is
/// surfaced as a message, never as a server error, and sets nothing.
/// A response that arrives after the round it was requested for has
/// closed is dropped.
pub async fn request_prediction(State(state): State<AppState>) -> Json<PredictResponse> {
    let Some(oracle) = state.oracle.clone() else {
        return Json(PredictResponse {
            prediction: None,
            message: "Prediction oracle is not configured".to_string(),
        });
    };

    let for_round = state.engine.read().await.next_round();

    match oracle.fetch_prediction().await {
        Ok(outcome) => {
            let accepted = state.engine.write().await.accept_prediction(outcome, for_round);
            if accepted {
                Json(PredictResponse {
                    prediction: Some(outcome),
                    message: format!("Prediction for round {for_round}: {outcome}"),
                })
            } else {
                Json(PredictResponse {
                    prediction: None,
                    message: format!("Round {for_round} already closed, prediction discarded"),
                })
            }
        }
        Err(e) => {
            warn!(error = %e, "Oracle request failed");
            Json(PredictResponse {
                prediction: None,
                message: e.to_string(),
            })
        }
    }
}

/// POST /api/predictions/clear
pub async fn clear_prediction_totals(
    State(state): State<AppState>,
) -> Json<PredictionTotalsResponse> {
    let mut engine = state.engine.write().await;
    engine.clear_prediction_totals();
    Json(totals_response(&engine))
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn session_response(name: &str, engine: &SessionEngine) -> SessionResponse {
    SessionResponse {
        name: name.to_string(),
        next_round: engine.next_round(),
        rounds_recorded: engine.ledger().len(),
        capacity: Ledger::capacity(),
        table_full: engine.is_full(),
    }
}

fn totals_response(engine: &SessionEngine) -> PredictionTotalsResponse {
    let totals = engine.prediction_totals();
    PredictionTotalsResponse {
        total: totals.total,
        correct: totals.correct,
        accuracy: totals.accuracy(),
        player_predictions: totals.predicted.player,
        banker_predictions: totals.predicted.banker,
        tie_predictions: totals.predicted.tie,
        pending: engine.pending_prediction().map(|p| PendingResponse {
            outcome: p.outcome,
            for_round: p.for_round,
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
