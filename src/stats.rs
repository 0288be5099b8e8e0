//! Statistics engine — cumulative outcome frequencies over the ledger.
//!
//! Pure derivation with no side effects; safe to recompute at any time.

use crate::ledger::Ledger;
use crate::types::{Outcome, OutcomeCounts};

/// Snapshot of win/tie counts and percentages over the full ledger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableStats {
    pub total: u64,
    pub counts: OutcomeCounts,
}

impl TableStats {
    /// Count every recorded outcome.
    pub fn from_ledger(ledger: &Ledger) -> Self {
        let mut counts = OutcomeCounts::default();
        for record in ledger.records() {
            counts.bump(record.outcome);
        }
        Self {
            total: ledger.len() as u64,
            counts,
        }
    }

    /// Share of rounds with this outcome, as a percentage rounded to
    /// one decimal place. An empty ledger yields 0 for every outcome,
    /// never NaN.
    pub fn percentage(&self, outcome: Outcome) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let raw = 100.0 * self.counts.get(outcome) as f64 / self.total as f64;
        (raw * 10.0).round() / 10.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
