//! Bead road placement — the fixed 6×13 display grid.
//!
//! Derives a two-dimensional layout from the ledger's sequence order.
//! The fill order is column-major: each column fills top-to-bottom
//! before the next column starts. Row-major would produce a materially
//! different board and must not be substituted.

use crate::ledger::Ledger;
use crate::types::Outcome;

/// Rows in the bead road.
pub const ROWS: usize = 6;
/// Columns in the bead road.
pub const COLS: usize = 13;
/// Total cells — also the ledger's capacity, so every recorded round
/// has exactly one cell and the road never overflows.
pub const MAX_CELLS: usize = ROWS * COLS;

/// A fully derived bead road. Pure view over a ledger prefix; given the
/// same ledger, the road is identical.
#[derive(Debug, Clone, PartialEq)]
pub struct Road {
    cells: [[Option<Outcome>; COLS]; ROWS],
    filled: usize,
}

impl Road {
    /// The cell for sequence index `i` (0-based position in the ledger).
    pub fn position(index: usize) -> (usize, usize) {
        (index % ROWS, index / ROWS)
    }

    /// Place every ledger record on the grid.
    pub fn from_ledger(ledger: &Ledger) -> Self {
        let mut cells = [[None; COLS]; ROWS];
        for (i, record) in ledger.records().iter().enumerate() {
            let (row, col) = Self::position(i);
            cells[row][col] = Some(record.outcome);
        }
        Self {
            cells,
            filled: ledger.len(),
        }
    }

    /// The outcome at `(row, col)`, or None for an empty or
    /// out-of-bounds cell.
    pub fn cell(&self, row: usize, col: usize) -> Option<Outcome> {
        self.cells.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    /// Number of non-empty cells.
    pub fn filled(&self) -> usize {
        self.filled
    }

    /// The grid as rows of cells, top row first.
    pub fn rows(&self) -> Vec<Vec<Option<Outcome>>> {
        self.cells.iter().map(|row| row.to_vec()).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
