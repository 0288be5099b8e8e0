//! Session engine — the single owner of the ledger and the prediction
//! tracker.
//!
//! All mutation goes through this instance; derived views borrow the
//! ledger read-only. Data flows one way: a record call mutates the
//! ledger, the tracker observes the same outcome, and statistics and
//! road views are recomputed from the ledger on demand.

use tracing::{info, warn};

use crate::ledger::Ledger;
use crate::road::Road;
use crate::stats::TableStats;
use crate::tracker::{PendingPrediction, PredictionTotals, PredictionTracker};
use crate::types::{BeadroadError, Outcome, RoundRecord};

#[derive(Debug, Default)]
pub struct SessionEngine {
    ledger: Ledger,
    tracker: PredictionTracker,
}

impl SessionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Ledger operations ------------------------------------------------

    /// Record a round outcome. On success the pending prediction (if
    /// any) is scored against it and the slot is cleared. A refusal at
    /// capacity mutates nothing, the pending slot included.
    pub fn record(&mut self, outcome: Outcome) -> Result<RoundRecord, BeadroadError> {
        let record = self.ledger.record(outcome)?;

        match self.tracker.observe(outcome) {
            Some(correct) => info!(
                round = record.round_number,
                outcome = %outcome,
                correct,
                accuracy = self.tracker.totals().accuracy(),
                "Round recorded, prediction scored"
            ),
            None => info!(round = record.round_number, outcome = %outcome, "Round recorded"),
        }

        Ok(record)
    }

    /// Undo the last recorded round. A pure ledger undo: prediction
    /// totals are not retroactively adjusted.
    pub fn delete_last(&mut self) -> Result<RoundRecord, BeadroadError> {
        let removed = self.ledger.delete_last()?;
        info!(round = removed.round_number, outcome = %removed.outcome, "Last round deleted");
        Ok(removed)
    }

    /// Full reset: empty the ledger, zero prediction totals, drop any
    /// pending prediction.
    pub fn clear_session(&mut self) {
        self.ledger.clear();
        self.tracker.clear_all();
        info!("Session cleared");
    }

    /// Reset prediction totals only. The ledger and any pending
    /// prediction are untouched.
    pub fn clear_prediction_totals(&mut self) {
        self.tracker.clear_totals();
        info!("Prediction totals cleared");
    }

    // -- Prediction slot --------------------------------------------------

    /// Accept an oracle response for the given round. The prediction is
    /// installed only while that round is still the next unrecorded
    /// one; a late response for an already-closed round is dropped.
    pub fn accept_prediction(&mut self, outcome: Outcome, for_round: u32) -> bool {
        if for_round != self.ledger.next_round() {
            warn!(
                predicted = %outcome,
                for_round,
                next_round = self.ledger.next_round(),
                "Dropping stale oracle response"
            );
            return false;
        }
        self.tracker.set_prediction(outcome, for_round);
        true
    }

    // -- Read access ------------------------------------------------------

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn next_round(&self) -> u32 {
        self.ledger.next_round()
    }

    pub fn is_full(&self) -> bool {
        self.ledger.is_full()
    }

    pub fn stats(&self) -> TableStats {
        TableStats::from_ledger(&self.ledger)
    }

    pub fn road(&self) -> Road {
        Road::from_ledger(&self.ledger)
    }

    pub fn pending_prediction(&self) -> Option<&PendingPrediction> {
        self.tracker.pending()
    }

    pub fn prediction_totals(&self) -> &PredictionTotals {
        self.tracker.totals()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
