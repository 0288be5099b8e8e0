//! The round ledger — the authoritative ordered history of recorded
//! rounds for the current session.
//!
//! Append-only and bounded: the capacity equals the bead road's cell
//! count, so the grid view never overflows. Round numbering is always
//! derived from the ledger length, never tracked separately.

use chrono::Utc;
use tracing::debug;

use crate::road::MAX_CELLS;
use crate::types::{BeadroadError, Outcome, RoundRecord};

/// Ordered sequence of recorded rounds. Insertion order is recording
/// order is the authoritative sequence order.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    records: Vec<RoundRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum number of rounds this ledger can hold.
    pub const fn capacity() -> usize {
        MAX_CELLS
    }

    /// The 1-based number the next recorded round will get. Derived
    /// from the ledger length so it cannot drift.
    pub fn next_round(&self) -> u32 {
        self.records.len() as u32 + 1
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the ledger has reached capacity.
    pub fn is_full(&self) -> bool {
        self.records.len() >= MAX_CELLS
    }

    /// All records in sequence order.
    pub fn records(&self) -> &[RoundRecord] {
        &self.records
    }

    /// Append a new round. Refused without mutation once the ledger is
    /// at capacity.
    pub fn record(&mut self, outcome: Outcome) -> Result<RoundRecord, BeadroadError> {
        if self.is_full() {
            return Err(BeadroadError::CapacityExceeded { capacity: MAX_CELLS });
        }

        let record = RoundRecord {
            round_number: self.next_round(),
            outcome,
            recorded_at: Utc::now(),
        };
        debug!(round = record.round_number, outcome = %record.outcome, "Round recorded");
        self.records.push(record.clone());
        Ok(record)
    }

    /// Remove and return the last recorded round.
    pub fn delete_last(&mut self) -> Result<RoundRecord, BeadroadError> {
        self.records.pop().ok_or(BeadroadError::EmptyLedger)
    }

    /// Empty the ledger; numbering restarts at 1 on the next record.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
