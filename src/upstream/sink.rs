//! HTTP result sink client.
//!
//! Produces `POST {base_url}/submit-result` with `{round, winner}`
//! once per successfully recorded round. Best-effort: the caller
//! swallows failures and never retries.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use super::ResultSink;
use crate::types::{BeadroadError, Outcome};

const SUBMIT_PATH: &str = "/submit-result";
const SERVICE_NAME: &str = "sink";

/// Notification payload for a recorded round.
#[derive(Debug, Serialize)]
struct SinkNotice {
    round: u32,
    winner: Outcome,
}

pub struct HttpSink {
    http: Client,
    endpoint: String,
}

impl HttpSink {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build sink HTTP client")?;

        Ok(Self {
            http,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), SUBMIT_PATH),
        })
    }
}

#[async_trait]
impl ResultSink for HttpSink {
    async fn notify(&self, round: u32, winner: Outcome) -> Result<(), BeadroadError> {
        let notice = SinkNotice { round, winner };

        let response = self
            .http
            .post(&self.endpoint)
            .json(&notice)
            .send()
            .await
            .map_err(|e| BeadroadError::SinkUnavailable(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BeadroadError::SinkUnavailable(format!("HTTP {status}")));
        }

        debug!(round, winner = %winner, "Result submitted to sink");
        Ok(())
    }

    fn name(&self) -> &str {
        SERVICE_NAME
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
