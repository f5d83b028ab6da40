//! The ledger tree: a flat, depth-annotated row collection.
//!
//! There are no parent/child pointers. The collection is a pre-order
//! flattening of a tree, and membership follows from row order and depth
//! alone: the children of the row at index `i` with level `L` are the rows
//! in the maximal contiguous run after `i` with level greater than `L`,
//! and the *immediate* children are the rows in that run at exactly `L+1`.
//! Row order is fixed for the session — no insertion, removal, or
//! reordering during editing.

use std::ops::Range;

use rustc_hash::FxHashMap;

use crate::row::PlanRow;

/// Error constructing a `PlanTree` from a row collection.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeError {
    /// A plan needs at least one row.
    Empty,
    /// Two rows share an id.
    DuplicateId(String),
    /// A row sits deeper than one level below its predecessor and can
    /// never be reached as a child under the contiguous-run convention.
    LevelJump { id: String, level: u8, max: u8 },
}

impl std::fmt::Display for TreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreeError::Empty => write!(f, "plan has no rows"),
            TreeError::DuplicateId(id) => write!(f, "duplicate row id '{}'", id),
            TreeError::LevelJump { id, level, max } => write!(
                f,
                "row '{}' at level {} is unreachable (deepest allowed here is {})",
                id, level, max
            ),
        }
    }
}

impl std::error::Error for TreeError {}

/// The flat row collection plus an id → index map.
///
/// Mutation is limited to cell values; the row set and order never change
/// after construction, so the index map is built once.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanTree {
    rows: Vec<PlanRow>,
    index: FxHashMap<String, usize>,
}

impl PlanTree {
    /// Build a tree, validating the structural invariants: at least one
    /// row, unique ids, row 0 at level 0, and no row more than one level
    /// deeper than its predecessor.
    pub fn new(rows: Vec<PlanRow>) -> Result<Self, TreeError> {
        if rows.is_empty() {
            return Err(TreeError::Empty);
        }

        let mut index = FxHashMap::default();
        let mut prev_level: Option<u8> = None;
        for (i, row) in rows.iter().enumerate() {
            if index.insert(row.id.clone(), i).is_some() {
                return Err(TreeError::DuplicateId(row.id.clone()));
            }
            let max = match prev_level {
                None => 0,
                Some(prev) => prev + 1,
            };
            if row.level > max {
                return Err(TreeError::LevelJump {
                    id: row.id.clone(),
                    level: row.level,
                    max,
                });
            }
            prev_level = Some(row.level);
        }

        Ok(Self { rows, index })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[PlanRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&PlanRow> {
        self.rows.get(index)
    }

    /// Index of the row with the given id.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// The contiguous run of descendants below `parent`: every row after
    /// it up to (not including) the first row at its level or shallower.
    /// Empty for leaves and out-of-range indices.
    pub fn child_run(&self, parent: usize) -> Range<usize> {
        let Some(parent_row) = self.rows.get(parent) else {
            return 0..0;
        };
        let mut end = parent + 1;
        while end < self.rows.len() && self.rows[end].level > parent_row.level {
            end += 1;
        }
        parent + 1..end
    }

    /// Indices of the immediate children: rows in the child run at exactly
    /// one greater depth. Deeper rows in the run belong to those children.
    pub fn children(&self, parent: usize) -> impl Iterator<Item = usize> + '_ {
        let child_level = self.rows.get(parent).map(|r| r.level + 1);
        self.child_run(parent)
            .filter(move |&i| Some(self.rows[i].level) == child_level)
    }

    /// A row with no immediately following deeper row.
    pub fn is_leaf(&self, index: usize) -> bool {
        self.child_run(index).is_empty()
    }

    /// Aggregate rows are declared totals or rows with at least one
    /// immediate child. They are never directly editable.
    pub fn is_aggregate_row(&self, index: usize) -> bool {
        let Some(row) = self.rows.get(index) else {
            return false;
        };
        row.is_total || !self.is_leaf(index)
    }

    /// One cell's value, 0.0 for out-of-range addresses.
    pub fn value(&self, index: usize, month: usize) -> f64 {
        self.rows.get(index).map_or(0.0, |r| r.values.get(month))
    }

    /// Sum of a row's twelve month values.
    pub fn annual_total(&self, index: usize) -> f64 {
        self.rows.get(index).map_or(0.0, |r| r.values.total())
    }

    pub(crate) fn set_value(&mut self, index: usize, month: usize, value: f64) {
        if let Some(row) = self.rows.get_mut(index) {
            row.values.set(month, value);
        }
    }
}
