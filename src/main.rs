//! BEADROAD — Baccarat round ledger, road views, and prediction scoring
//!
//! Entry point. Loads configuration, initialises structured logging,
//! wires the upstream clients, and serves the JSON API with graceful
//! shutdown.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

use beadroad::api;
use beadroad::api::routes::ApiState;
use beadroad::config;
use beadroad::upstream::oracle::HttpOracle;
use beadroad::upstream::sink::HttpSink;
use beadroad::upstream::{PredictionOracle, ResultSink};

const BANNER: &str = r#"
 ____  _____    _    ____  ____   ___    _    ____
| __ )| ____|  / \  |  _ \|  _ \ / _ \  / \  |  _ \
|  _ \|  _|   / _ \ | | | | |_) | | | |/ _ \ | | | |
| |_) | |___ / ___ \| |_| |  _ <| |_| / ___ \| |_| |
|____/|_____/_/   \_\____/|_| \_\\___/_/   \_\____/

  Bead-road ledger & prediction scoring service
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    // Load configuration from TOML
    let cfg = config::AppConfig::load("config.toml")?;

    // Initialise structured logging
    init_logging();

    // Print startup banner
    println!("{BANNER}");
    info!(
        session = %cfg.session.name,
        port = cfg.api.port,
        "BEADROAD starting up"
    );

    // -- Upstream clients -------------------------------------------------

    let oracle: Option<Arc<dyn PredictionOracle>> = if cfg.oracle.enabled {
        info!(base_url = %cfg.oracle.base_url, "Prediction oracle enabled");
        Some(Arc::new(HttpOracle::new(
            &cfg.oracle.base_url,
            cfg.oracle.timeout_secs,
        )?))
    } else {
        warn!("Prediction oracle disabled — predictions unavailable");
        None
    };

    let sink: Option<Arc<dyn ResultSink>> = if cfg.sink.enabled {
        info!(base_url = %cfg.sink.base_url, "Result sink enabled");
        Some(Arc::new(HttpSink::new(
            &cfg.sink.base_url,
            cfg.sink.timeout_secs,
        )?))
    } else {
        warn!("Result sink disabled — recorded rounds will not be reported");
        None
    };

    // -- Serve -------------------------------------------------------------

    let state = Arc::new(ApiState::new(cfg.session.name.clone(), oracle, sink));
    let app = api::build_router(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], cfg.api.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind API port {}", cfg.api.port))?;

    info!(port = cfg.api.port, "Listening on http://localhost:{}", cfg.api.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server error")?;

    info!("BEADROAD shut down cleanly.");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received.");
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("beadroad=info"));

    let json_logging = std::env::var("BEADROAD_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
