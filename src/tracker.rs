//! Prediction tracker — scores oracle predictions against recorded
//! outcomes.
//!
//! Holds at most one pending prediction. The slot moves
//! `NoPending → Pending(outcome) → NoPending`; the second transition
//! always fires on the next recorded round, match or not. There is no
//! timeout or expiry independent of that event.

use tracing::debug;

use crate::types::{Outcome, OutcomeCounts};

/// A prediction retrieved from the oracle, not yet scored.
///
/// `for_round` is the round number the prediction was requested for;
/// a response that arrives after that round has closed is dropped
/// instead of attaching to a later round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingPrediction {
    pub outcome: Outcome,
    pub for_round: u32,
}

/// Running accuracy accumulators.
///
/// `correct` is kept as an exact integer count; the percentage is
/// derived fresh on each read. Re-deriving the mean from a previously
/// rounded percentage would compound rounding error across rounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PredictionTotals {
    /// Number of predictions scored.
    pub total: u64,
    /// Number scored as correct.
    pub correct: u64,
    /// Which outcome was predicted (not which occurred).
    pub predicted: OutcomeCounts,
}

impl PredictionTotals {
    /// Accuracy as a whole percentage. 0 when nothing has been scored.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (100.0 * self.correct as f64 / self.total as f64).round()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PredictionTracker {
    pending: Option<PendingPrediction>,
    totals: PredictionTotals,
}

impl PredictionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<&PendingPrediction> {
        self.pending.as_ref()
    }

    pub fn totals(&self) -> &PredictionTotals {
        &self.totals
    }

    /// Install a prediction for the given round. A second oracle
    /// response before a round is recorded silently replaces the
    /// first; there is no queueing.
    pub fn set_prediction(&mut self, outcome: Outcome, for_round: u32) {
        if let Some(previous) = self.pending.replace(PendingPrediction { outcome, for_round }) {
            debug!(
                replaced = %previous.outcome,
                with = %outcome,
                round = for_round,
                "Pending prediction overwritten"
            );
        }
    }

    /// Observe a recorded outcome. Scores the pending prediction if one
    /// is present, then clears the slot unconditionally. Returns whether
    /// the scored prediction was correct, or None if nothing was pending.
    pub fn observe(&mut self, actual: Outcome) -> Option<bool> {
        let pending = self.pending.take()?;
        let correct = pending.outcome == actual;

        self.totals.total += 1;
        if correct {
            self.totals.correct += 1;
        }
        self.totals.predicted.bump(pending.outcome);

        debug!(
            predicted = %pending.outcome,
            actual = %actual,
            correct,
            accuracy = self.totals.accuracy(),
            "Prediction scored"
        );
        Some(correct)
    }

    /// Zero the accumulators without touching the pending slot.
    pub fn clear_totals(&mut self) {
        self.totals = PredictionTotals::default();
    }

    /// Zero the accumulators and drop any pending prediction. Invoked
    /// by the session's full clear.
    pub fn clear_all(&mut self) {
        self.clear_totals();
        self.pending = None;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
