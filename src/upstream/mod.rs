//! External collaborators.
//!
//! Defines the trait seams for the two services this core talks to:
//! - the prediction oracle, consulted before a round is recorded
//! - the result sink, passively notified of each recorded round
//!
//! Both are thin request/response adapters; neither ever holds a
//! reference to local state.

pub mod oracle;
pub mod sink;

use async_trait::async_trait;

use crate::types::{BeadroadError, Outcome};

/// Abstraction over the prediction oracle.
///
/// Any transport failure or malformed response surfaces as
/// `OracleUnavailable` and must leave local state untouched — the
/// caller simply ends up with no prediction.
#[async_trait]
pub trait PredictionOracle: Send + Sync {
    /// Ask the oracle for the predicted outcome of the upcoming round.
    async fn fetch_prediction(&self) -> Result<Outcome, BeadroadError>;

    /// Service name for logging and identification.
    fn name(&self) -> &str;
}

/// Abstraction over the result sink.
///
/// Notification is best-effort and fire-and-forget: failures are
/// logged and swallowed by the caller, never retried, and never affect
/// ledger state.
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Report a recorded round's winner.
    async fn notify(&self, round: u32, winner: Outcome) -> Result<(), BeadroadError>;

    /// Service name for logging and identification.
    fn name(&self) -> &str;
}
