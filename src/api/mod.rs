//! API — Axum web server exposing the session engine as JSON.
//!
//! The operator surface is pure JSON; presentation is someone else's
//! concern. CORS enabled for local development.

pub mod routes;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post},
    Router,
};

use routes::AppState;

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = tower_http::cors::CorsLayer::new()
        .allow_origin("*".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/session", get(routes::get_session))
        .route("/api/session/clear", post(routes::clear_session))
        .route("/api/stats", get(routes::get_stats))
        .route("/api/road", get(routes::get_road))
        .route("/api/rounds", post(routes::record_round))
        .route("/api/rounds/last", delete(routes::delete_last_round))
        .route(
            "/api/predictions",
            get(routes::get_predictions).post(routes::request_prediction),
        )
        .route("/api/predictions/clear", post(routes::clear_prediction_totals))
        .route("/health", get(routes::health))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
