//! HTTP prediction oracle client.
//!
//! Consumes `GET {base_url}/predict`. A success response carries a
//! single field naming the predicted outcome as one of the three
//! uppercase tokens. Anything else — transport failure, non-2xx
//! status, missing or unknown token — is "no prediction available".

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::PredictionOracle;
use crate::types::{BeadroadError, Outcome};

const PREDICT_PATH: &str = "/predict";
const SERVICE_NAME: &str = "oracle";

/// Success response body from the oracle.
#[derive(Debug, Deserialize)]
struct PredictReply {
    #[serde(default)]
    prediction: Option<String>,
}

impl PredictReply {
    /// Extract the predicted outcome, treating a missing or unknown
    /// token as unavailability rather than a crash.
    fn outcome(&self) -> Result<Outcome, BeadroadError> {
        let token = self
            .prediction
            .as_deref()
            .ok_or_else(|| BeadroadError::OracleUnavailable("response carried no prediction".to_string()))?;
        token
            .parse::<Outcome>()
            .map_err(|_| BeadroadError::OracleUnavailable(format!("unknown prediction token: {token}")))
    }
}

pub struct HttpOracle {
    http: Client,
    endpoint: String,
}

impl HttpOracle {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build oracle HTTP client")?;

        Ok(Self {
            http,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), PREDICT_PATH),
        })
    }
}

#[async_trait]
impl PredictionOracle for HttpOracle {
    async fn fetch_prediction(&self) -> Result<Outcome, BeadroadError> {
        let response = self
            .http
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| BeadroadError::OracleUnavailable(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BeadroadError::OracleUnavailable(format!("HTTP {status}")));
        }

        let reply: PredictReply = response
            .json()
            .await
            .map_err(|e| BeadroadError::OracleUnavailable(format!("malformed response: {e}")))?;

        let outcome = reply.outcome()?;
        debug!(prediction = %outcome, "Oracle responded");
        Ok(outcome)
    }

    fn name(&self) -> &str {
        SERVICE_NAME
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
