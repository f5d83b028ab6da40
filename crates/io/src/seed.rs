//! The demo plan: the revenue ledger the grid ships with, plus its two
//! seeded history entries.

use chrono::{Duration, Utc};

use plangrid_engine::history::{HistoryEntry, HistoryLog};
use plangrid_engine::row::{MonthValues, PlanRow};
use plangrid_engine::session::PlanContext;

use crate::document::PlanDocument;

fn row(id: &str, account: &str, level: u8, is_total: bool, values: [f64; 12]) -> PlanRow {
    PlanRow {
        id: id.into(),
        account: account.into(),
        level,
        is_total,
        values: MonthValues::new(values),
    }
}

/// The demo revenue ledger. Parents already equal their children's sums
/// for every month.
pub fn demo_rows() -> Vec<PlanRow> {
    vec![
        row("r1", "Net Revenue", 0, true, [
            12100.0, 11800.0, 12500.0, 13200.0, 14100.0, 15800.0, 16200.0, 15900.0, 14500.0,
            13800.0, 12900.0, 14200.0,
        ]),
        row("r2", "Sparkling Soft Drinks", 1, false, [
            8500.0, 8200.0, 8800.0, 9200.0, 9800.0, 11000.0, 11500.0, 11200.0, 10100.0, 9600.0,
            9000.0, 9900.0,
        ]),
        row("r3", "Coca-Cola", 2, false, [
            5000.0, 4800.0, 5200.0, 5400.0, 5800.0, 6500.0, 6800.0, 6600.0, 6000.0, 5700.0,
            5300.0, 5900.0,
        ]),
        row("r4", "Sprite", 2, false, [
            2000.0, 1900.0, 2100.0, 2200.0, 2300.0, 2600.0, 2800.0, 2700.0, 2400.0, 2200.0,
            2100.0, 2300.0,
        ]),
        row("r5", "Fanta", 2, false, [
            1500.0, 1500.0, 1500.0, 1600.0, 1700.0, 1900.0, 1900.0, 1900.0, 1700.0, 1700.0,
            1600.0, 1700.0,
        ]),
        row("r6", "Still Beverages", 1, false, [
            3600.0, 3600.0, 3700.0, 4000.0, 4300.0, 4800.0, 4700.0, 4700.0, 4400.0, 4200.0,
            3900.0, 4300.0,
        ]),
        row("r7", "Water", 2, false, [
            1200.0, 1200.0, 1300.0, 1400.0, 1500.0, 1800.0, 1800.0, 1800.0, 1600.0, 1500.0,
            1300.0, 1400.0,
        ]),
        row("r8", "Tea", 2, false, [
            2400.0, 2400.0, 2400.0, 2600.0, 2800.0, 3000.0, 2900.0, 2900.0, 2800.0, 2700.0,
            2600.0, 2900.0,
        ]),
    ]
}

/// Seeded history: an initial budget load a day ago and a manual
/// adjustment four hours ago, newest first.
pub fn demo_history() -> HistoryLog {
    let now = Utc::now();
    HistoryLog::from_entries(vec![
        HistoryEntry {
            id: "v-yesterday".into(),
            timestamp: now - Duration::hours(4),
            author: "John Doe".into(),
            total_revenue: 166_800.0,
            note: Some("Adjusted Q1 Targets".into()),
        },
        HistoryEntry {
            id: "v-initial".into(),
            timestamp: now - Duration::days(1),
            author: "System Admin".into(),
            total_revenue: 165_800.0,
            note: Some("Initial Budget Load".into()),
        },
    ])
}

/// A complete demo document with default context.
pub fn demo_document() -> PlanDocument {
    let mut document = PlanDocument::new(demo_rows(), PlanContext::default());
    document.history = demo_history();
    document
}
