//! Bottom-up single-month rollup propagation.
//!
//! One accepted edit touches one (row, month) cell. Every ancestor of the
//! edited row gets its value for that month recomputed in a single
//! backward pass over the collection: the first row above the edit with a
//! strictly smaller level is the next ancestor; its recompute sums its
//! immediate children only, which the same pass has already brought up to
//! date. One pass therefore propagates the change to every depth in
//! O(rows) per edit. Other month columns are untouched.

use std::time::Instant;

use crate::row::{CellRef, MONTHS_PER_YEAR};
use crate::tree::PlanTree;

/// Result of an accepted edit: the replacement tree plus a report.
///
/// The input tree is never mutated; the caller swaps its tree reference
/// for `tree`, so no partially-updated state is ever observable.
#[derive(Debug, Clone)]
pub struct EditApplied {
    pub tree: PlanTree,
    pub report: RollupReport,
}

/// What one edit changed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RollupReport {
    /// Cells whose value changed: the edited cell first, then each
    /// recomputed ancestor in bottom-up order.
    pub cells_changed: Vec<CellRef>,
    /// Number of ancestors recomputed (0 for a top-level edit).
    pub ancestors_recomputed: usize,
    /// Wall time for the pass in microseconds.
    pub duration_us: u64,
}

impl RollupReport {
    /// One-line log entry.
    ///
    /// Format: `[rollup/edit] 12us  3 cells  ancestors=2`
    pub fn log_line(&self) -> String {
        format!(
            "[rollup/edit] {:>4}us  {} cells  ancestors={}",
            self.duration_us,
            self.cells_changed.len(),
            self.ancestors_recomputed
        )
    }
}

/// Apply one edited cell and recompute every ancestor's value for that
/// month.
///
/// Returns `None` when the row id is unknown or the month is out of
/// range — the edit is a no-op and the caller keeps its current tree.
/// This function does not police aggregate rows or read-only sessions;
/// those gates live at the session boundary. A declared-total row is
/// treated like any other: editing it propagates upward off its level,
/// and when it is itself an ancestor of an edited cell the pass
/// overwrites it with its children's sum.
pub fn apply_edit(
    tree: &PlanTree,
    row_id: &str,
    month: usize,
    value: f64,
) -> Option<EditApplied> {
    if month >= MONTHS_PER_YEAR {
        return None;
    }
    let edited = tree.index_of(row_id)?;

    let started = Instant::now();
    let mut next = tree.clone();
    next.set_value(edited, month, value);

    let mut cells_changed = vec![CellRef::new(edited, month)];
    let mut ancestors_recomputed = 0;

    let mut current_level = next.rows()[edited].level;
    let mut i = edited;
    while i > 0 {
        i -= 1;
        let level = next.rows()[i].level;
        if level < current_level {
            let sum: f64 = next.children(i).map(|c| next.value(c, month)).sum();
            next.set_value(i, month, sum);
            cells_changed.push(CellRef::new(i, month));
            ancestors_recomputed += 1;
            current_level = level;
        }
    }

    Some(EditApplied {
        tree: next,
        report: RollupReport {
            cells_changed,
            ancestors_recomputed,
            duration_us: started.elapsed().as_micros() as u64,
        },
    })
}
