//! Mock upstream services for integration testing.
//!
//! Deterministic `PredictionOracle` and `ResultSink` implementations —
//! scripted replies, recorded notices, all in-memory with no external
//! dependencies.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use beadroad::types::{BeadroadError, Outcome};
use beadroad::upstream::{PredictionOracle, ResultSink};

/// A mock oracle that serves a scripted queue of predictions.
pub struct MockOracle {
    replies: Mutex<VecDeque<Outcome>>,
    /// If set, all requests fail with this message.
    force_error: Mutex<Option<String>>,
}

impl MockOracle {
    pub fn with_replies(replies: impl IntoIterator<Item = Outcome>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            force_error: Mutex::new(None),
        }
    }

    /// Force all subsequent requests to fail.
    pub fn set_error(&self, msg: &str) {
        *self.force_error.lock().unwrap() = Some(msg.to_string());
    }

    /// Clear any forced error.
    pub fn clear_error(&self) {
        *self.force_error.lock().unwrap() = None;
    }
}

#[async_trait]
impl PredictionOracle for MockOracle {
    async fn fetch_prediction(&self) -> Result<Outcome, BeadroadError> {
        if let Some(msg) = self.force_error.lock().unwrap().clone() {
            return Err(BeadroadError::OracleUnavailable(msg));
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| BeadroadError::OracleUnavailable("no scripted reply left".to_string()))
    }

    fn name(&self) -> &str {
        "mock-oracle"
    }
}

/// A mock sink that records every notice it receives.
pub struct MockSink {
    notices: Mutex<Vec<(u32, Outcome)>>,
    force_error: Mutex<Option<String>>,
}

impl MockSink {
    pub fn new() -> Self {
        Self {
            notices: Mutex::new(Vec::new()),
            force_error: Mutex::new(None),
        }
    }

    pub fn set_error(&self, msg: &str) {
        *self.force_error.lock().unwrap() = Some(msg.to_string());
    }

    /// All notices received so far, in arrival order.
    pub fn notices(&self) -> Vec<(u32, Outcome)> {
        self.notices.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResultSink for MockSink {
    async fn notify(&self, round: u32, winner: Outcome) -> Result<(), BeadroadError> {
        if let Some(msg) = self.force_error.lock().unwrap().clone() {
            return Err(BeadroadError::SinkUnavailable(msg));
        }
        self.notices.lock().unwrap().push((round, winner));
        Ok(())
    }

    fn name(&self) -> &str {
        "mock-sink"
    }
}
