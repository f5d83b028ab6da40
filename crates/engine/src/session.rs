//! Planning session: scenario gate, edit pipeline, save gating.
//!
//! A session owns one ledger tree for its lifetime, together with the
//! bounds, the version history, and the transient edit state. The hosting
//! surface owns the market/year/scenario context and hands it in; the
//! session only reads it.

use serde::{Deserialize, Serialize};

use crate::events::{CellsChangedEvent, EventCallback, PlanEvent, SnapshotRecordedEvent};
use crate::history::{HistoryEntry, HistoryLog, SaveClient, SaveRequest};
use crate::input::{accept, EditSession, InputOutcome};
use crate::rollup::{self, RollupReport};
use crate::row::MONTHS_PER_YEAR;
use crate::tree::PlanTree;
use crate::validation::CellBounds;

/// Budget/actuals mode. Actuals come from the books; the grid is
/// read-only there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Scenario {
    #[default]
    Budget,
    Actuals,
}

impl Scenario {
    pub fn is_read_only(self) -> bool {
        matches!(self, Scenario::Actuals)
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scenario::Budget => write!(f, "Budget"),
            Scenario::Actuals => write!(f, "Actuals"),
        }
    }
}

/// Market/year/scenario selection, owned by the hosting surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanContext {
    pub market: String,
    pub year: u16,
    pub scenario: Scenario,
}

impl Default for PlanContext {
    fn default() -> Self {
        Self {
            market: "Hong Kong".into(),
            year: 2025,
            scenario: Scenario::Budget,
        }
    }
}

/// Outcome of `edit_cell`. Every variant except `Applied` leaves the
/// tree untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum EditStatus {
    /// Parsed value committed and rolled up.
    Applied { report: RollupReport },
    /// Grammar-accepted text with no numeric value yet (a lone decimal
    /// point). The buffer updates; nothing commits.
    BufferOnly,
    /// Text violates the numeric grammar; dropped silently.
    RejectedInput,
    /// The scenario is read-only; the grammar was never consulted.
    ReadOnly,
    /// Aggregate rows are computed from their children.
    AggregateRow,
    /// Unknown row id or out-of-range month.
    UnknownRow,
}

/// Save precondition failure. Rejection mutates nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveError {
    /// Out-of-range cells exist; the count is user-facing.
    ValidationErrors(usize),
    /// The scenario is read-only.
    ReadOnly,
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::ValidationErrors(count) => write!(
                f,
                "fix {} validation error{} before saving",
                count,
                if *count == 1 { "" } else { "s" }
            ),
            SaveError::ReadOnly => write!(f, "scenario is read-only"),
        }
    }
}

impl std::error::Error for SaveError {}

/// One planning session over one ledger tree.
pub struct PlanSession {
    tree: PlanTree,
    bounds: CellBounds,
    history: HistoryLog,
    context: PlanContext,
    edit: EditSession,
    on_event: Option<EventCallback>,
}

impl PlanSession {
    pub fn new(tree: PlanTree, context: PlanContext) -> Self {
        Self {
            tree,
            bounds: CellBounds::default(),
            history: HistoryLog::new(),
            context,
            edit: EditSession::new(),
            on_event: None,
        }
    }

    pub fn with_history(mut self, history: HistoryLog) -> Self {
        self.history = history;
        self
    }

    pub fn with_bounds(mut self, bounds: CellBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Register a callback for change events. Replaces any previous one.
    pub fn set_event_callback(&mut self, callback: EventCallback) {
        self.on_event = Some(callback);
    }

    fn emit(&mut self, event: PlanEvent) {
        if let Some(callback) = self.on_event.as_mut() {
            callback(event);
        }
    }

    pub fn tree(&self) -> &PlanTree {
        &self.tree
    }

    pub fn context(&self) -> &PlanContext {
        &self.context
    }

    /// The context collaborator pushes a new selection in.
    pub fn set_context(&mut self, context: PlanContext) {
        self.context = context;
    }

    pub fn bounds(&self) -> CellBounds {
        self.bounds
    }

    pub fn edit_session(&self) -> &EditSession {
        &self.edit
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn is_read_only(&self) -> bool {
        self.context.scenario.is_read_only()
    }

    /// Full edit pipeline: scenario gate, then the numeric grammar, then
    /// row lookup and rollup. On `Applied` the session's tree reference
    /// is replaced by the rollup result and a `CellsChanged` event fires.
    pub fn edit_cell(&mut self, row_id: &str, month: usize, raw: &str) -> EditStatus {
        if self.is_read_only() {
            return EditStatus::ReadOnly;
        }

        let value = match accept(raw) {
            InputOutcome::Rejected => return EditStatus::RejectedInput,
            InputOutcome::Accepted { value } => value,
        };

        let Some(index) = self.tree.index_of(row_id) else {
            return EditStatus::UnknownRow;
        };
        if month >= MONTHS_PER_YEAR {
            return EditStatus::UnknownRow;
        }
        if self.tree.is_aggregate_row(index) {
            return EditStatus::AggregateRow;
        }

        if self.edit.is_editing(index, month) {
            self.edit.set_buffer(raw);
        }
        let Some(value) = value else {
            return EditStatus::BufferOnly;
        };

        let Some(applied) = rollup::apply_edit(&self.tree, row_id, month, value) else {
            return EditStatus::UnknownRow;
        };
        self.tree = applied.tree;
        self.emit(PlanEvent::CellsChanged(CellsChangedEvent {
            cells: applied.report.cells_changed.clone(),
        }));
        EditStatus::Applied {
            report: applied.report,
        }
    }

    /// Begin editing a cell, returning its stored value. `None` when the
    /// session is read-only or the cell is not editable (aggregate row,
    /// unknown address); no edit state is created then.
    pub fn focus_cell(&mut self, row_id: &str, month: usize) -> Option<f64> {
        if self.is_read_only() {
            return None;
        }
        let index = self.tree.index_of(row_id)?;
        if month >= MONTHS_PER_YEAR || self.tree.is_aggregate_row(index) {
            return None;
        }
        let current = self.tree.value(index, month);
        self.edit.focus(index, month, current);
        Some(current)
    }

    /// Discard the edit buffer. The grid then shows the committed value.
    pub fn blur_cell(&mut self) {
        self.edit.blur();
    }

    /// Full recount of out-of-range cells.
    pub fn error_count(&self) -> usize {
        self.bounds.error_count(&self.tree)
    }

    /// Read-only validation query for rendering one cell.
    pub fn is_valid_cell(&self, row_id: &str, month: usize) -> bool {
        match self.tree.index_of(row_id) {
            Some(index) => self.bounds.is_valid_cell(&self.tree, index, month),
            None => true,
        }
    }

    /// Gate a save and mint its request. `total_revenue` is the first
    /// top-level row (the designated root revenue line) summed over all
    /// twelve months.
    pub fn save_request(
        &self,
        author: impl Into<String>,
        note: Option<String>,
    ) -> Result<SaveRequest, SaveError> {
        if self.is_read_only() {
            return Err(SaveError::ReadOnly);
        }
        let errors = self.error_count();
        if errors > 0 {
            return Err(SaveError::ValidationErrors(errors));
        }
        Ok(SaveRequest {
            author: author.into(),
            note,
            total_revenue: self.tree.annual_total(0),
        })
    }

    /// Record a completed round trip. Nothing stops a second request from
    /// being minted while another is in flight; the later completion
    /// takes the top history slot.
    pub fn complete_save(&mut self, entry: HistoryEntry) {
        let id = entry.id.clone();
        self.history.record(entry);
        self.emit(PlanEvent::SnapshotRecorded(SnapshotRecordedEvent { id }));
    }

    /// Convenience for synchronous callers: gate, round trip, record.
    pub fn save_blocking(
        &mut self,
        author: impl Into<String>,
        note: Option<String>,
        client: &SaveClient,
    ) -> Result<HistoryEntry, SaveError> {
        let request = self.save_request(author, note)?;
        let entry = client.round_trip(request);
        self.complete_save(entry.clone());
        Ok(entry)
    }
}
