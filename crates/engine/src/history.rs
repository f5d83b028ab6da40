//! Append-only version history.
//!
//! A save produces an immutable snapshot of the ledger's aggregate state.
//! The log is ordered newest-first; `record` (prepend) is the only
//! mutation, and entries are never edited, removed, or re-sorted by
//! timestamp after the fact.

use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default simulated round-trip latency for a save.
pub const DEFAULT_SAVE_LATENCY_MS: u64 = 800;

/// Immutable snapshot of one successful save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub author: String,
    /// Aggregate scalar: the root revenue row summed over all twelve
    /// months at save time, not a per-month breakdown.
    pub total_revenue: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Snapshot payload minted by a gated save request, before the round
/// trip has produced an entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub author: String,
    pub note: Option<String>,
    pub total_revenue: f64,
}

/// Blocking save transport with a simulated network round trip.
///
/// The round trip is the only latency-bearing step in the system. The
/// caller drives it and surfaces a "saving" state while it runs; there
/// is no cancellation and no timeout — the call completes or the host
/// tears down and the result is discarded.
#[derive(Debug, Clone)]
pub struct SaveClient {
    latency: Duration,
}

impl Default for SaveClient {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_SAVE_LATENCY_MS))
    }
}

impl SaveClient {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    /// Zero-latency client for tests.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Perform the round trip: block for the configured latency, then
    /// mint the entry with a fresh id and the completion timestamp.
    pub fn round_trip(&self, request: SaveRequest) -> HistoryEntry {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
        HistoryEntry {
            id: format!("v-{}", Uuid::new_v4()),
            timestamp: Utc::now(),
            author: request.author,
            total_revenue: request.total_revenue,
            note: request.note,
        }
    }
}

/// Newest-first log of save snapshots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt an existing newest-first sequence (e.g. from a loaded
    /// document). Order is taken as given.
    pub fn from_entries(entries: Vec<HistoryEntry>) -> Self {
        Self { entries }
    }

    /// Prepend a snapshot. Ordering is positional — newest first because
    /// each new entry lands at the front.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.insert(0, entry);
    }

    /// Entries, newest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, total: f64) -> HistoryEntry {
        HistoryEntry {
            id: id.into(),
            timestamp: Utc::now(),
            author: "John Doe".into(),
            total_revenue: total,
            note: None,
        }
    }

    #[test]
    fn test_record_prepends() {
        let mut log = HistoryLog::new();
        log.record(entry("v-1", 100.0));
        log.record(entry("v-2", 200.0));

        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].id, "v-2");
        assert_eq!(log.entries()[1].id, "v-1");
        assert_eq!(log.latest().unwrap().id, "v-2");
    }

    #[test]
    fn test_round_trip_mints_fresh_ids() {
        let client = SaveClient::instant();
        let request = SaveRequest {
            author: "John Doe".into(),
            note: Some("Manual Save".into()),
            total_revenue: 167_000.0,
        };
        let a = client.round_trip(request.clone());
        let b = client.round_trip(request);

        assert!(a.id.starts_with("v-"));
        assert_ne!(a.id, b.id);
        assert_eq!(a.total_revenue, 167_000.0);
        assert_eq!(a.note.as_deref(), Some("Manual Save"));
    }

    #[test]
    fn test_entry_document_shape() {
        let json = serde_json::to_string(&entry("v-1", 165_800.0)).unwrap();
        assert!(json.contains("\"totalRevenue\":165800.0"));
        // Absent note stays out of the document.
        assert!(!json.contains("note"));
    }

    #[test]
    fn test_log_is_transparent_in_documents() {
        let mut log = HistoryLog::new();
        log.record(entry("v-1", 100.0));
        let json = serde_json::to_string(&log).unwrap();
        assert!(json.starts_with('['));
        let back: HistoryLog = serde_json::from_str(&json).unwrap();
        assert_eq!(back, log);
    }
}
