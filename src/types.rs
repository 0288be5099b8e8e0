//! Shared types for the BEADROAD service.
//!
//! These types form the data model used across all modules.
//! They are designed to be stable so that ledger, tracker, and API
//! modules can depend on them without circular references.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// The result of a single baccarat round. Exactly one of the three
/// holds for any recorded round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Player,
    Banker,
    Tie,
}

impl Outcome {
    /// All outcomes in display order (useful for iteration).
    pub const ALL: &'static [Outcome] = &[Outcome::Player, Outcome::Banker, Outcome::Tie];

    /// The uppercase wire token for this outcome.
    pub fn token(&self) -> &'static str {
        match self {
            Outcome::Player => "PLAYER",
            Outcome::Banker => "BANKER",
            Outcome::Tie => "TIE",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Attempt to parse a string into an Outcome (case-insensitive).
impl std::str::FromStr for Outcome {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PLAYER" => Ok(Outcome::Player),
            "BANKER" => Ok(Outcome::Banker),
            "TIE" => Ok(Outcome::Tie),
            _ => Err(anyhow::anyhow!("Unknown outcome: {s}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Round record
// ---------------------------------------------------------------------------

/// One recorded round. Immutable once created.
///
/// `round_number` is the 1-based position of this record counting from
/// the start of the current ledger lifetime (since the last full clear).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round_number: u32,
    pub outcome: Outcome,
    pub recorded_at: DateTime<Utc>,
}

impl fmt::Display for RoundRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.round_number, self.outcome)
    }
}

// ---------------------------------------------------------------------------
// Per-outcome counters
// ---------------------------------------------------------------------------

/// Exact per-outcome counters, used by both the statistics engine and
/// the prediction tracker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub player: u64,
    pub banker: u64,
    pub tie: u64,
}

impl OutcomeCounts {
    pub fn get(&self, outcome: Outcome) -> u64 {
        match outcome {
            Outcome::Player => self.player,
            Outcome::Banker => self.banker,
            Outcome::Tie => self.tie,
        }
    }

    pub fn bump(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Player => self.player += 1,
            Outcome::Banker => self.banker += 1,
            Outcome::Tie => self.tie += 1,
        }
    }

    /// Sum over all three outcomes.
    pub fn total(&self) -> u64 {
        self.player + self.banker + self.tie
    }
}

impl fmt::Display for OutcomeCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{} B{} T{}", self.player, self.banker, self.tie)
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for BEADROAD.
///
/// None of these is fatal; the engine keeps operating across
/// arbitrarily many oracle/sink failures.
#[derive(Debug, thiserror::Error)]
pub enum BeadroadError {
    #[error("Table is full: {capacity} rounds already recorded")]
    CapacityExceeded { capacity: usize },

    #[error("Ledger is empty")]
    EmptyLedger,

    #[error("Prediction oracle unavailable: {0}")]
    OracleUnavailable(String),

    #[error("Result sink unavailable: {0}")]
    SinkUnavailable(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
