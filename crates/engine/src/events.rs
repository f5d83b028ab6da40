//! Change notifications for collaborators that render the grid.
//!
//! The session publishes an event after every accepted edit and every
//! recorded snapshot, so a presentation layer can repaint without
//! polling. The collector exists for tests that assert on event order.

use crate::row::CellRef;

/// Events emitted by a planning session.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanEvent {
    /// Cells whose value changed in one accepted edit.
    CellsChanged(CellsChangedEvent),

    /// A save round trip completed and its snapshot joined the log.
    SnapshotRecorded(SnapshotRecordedEvent),
}

/// Emitted after an accepted edit.
#[derive(Debug, Clone, PartialEq)]
pub struct CellsChangedEvent {
    /// The edited cell first, then each recomputed ancestor bottom-up.
    pub cells: Vec<CellRef>,
}

/// Emitted when a snapshot is recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotRecordedEvent {
    pub id: String,
}

/// Callback type for receiving session events.
///
/// The engine is single-threaded; callbacks run inline on the calling
/// thread.
pub type EventCallback = Box<dyn FnMut(PlanEvent)>;

/// Simple event collector for testing.
#[derive(Default)]
pub struct EventCollector {
    events: Vec<PlanEvent>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: PlanEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[PlanEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Filter to only CellsChanged events.
    pub fn cells_changed(&self) -> Vec<&CellsChangedEvent> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PlanEvent::CellsChanged(c) => Some(c),
                _ => None,
            })
            .collect()
    }

    /// Filter to only SnapshotRecorded events.
    pub fn snapshots_recorded(&self) -> Vec<&SnapshotRecordedEvent> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PlanEvent::SnapshotRecorded(s) => Some(s),
                _ => None,
            })
            .collect()
    }
}
