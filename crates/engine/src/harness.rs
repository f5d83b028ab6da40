//! Test fixtures: the demo revenue ledger and a session wired to an
//! event collector.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::events::EventCollector;
use crate::row::{MonthValues, PlanRow};
use crate::session::{PlanContext, PlanSession, Scenario};
use crate::tree::PlanTree;

/// Row with a single January value; the other months stay zero.
pub fn row(id: &str, account: &str, level: u8, is_total: bool, jan: f64) -> PlanRow {
    let mut values = MonthValues::zeroed();
    values.set(0, jan);
    PlanRow {
        id: id.into(),
        account: account.into(),
        level,
        is_total,
        values,
    }
}

/// The demo revenue ledger: root 12100 with children 8500 (itself parent
/// of 5000, 2000, 1500) and 3600 (parent of 1200, 2400), January only.
pub fn demo_tree() -> PlanTree {
    PlanTree::new(vec![
        row("r1", "Net Revenue", 0, true, 12100.0),
        row("r2", "Sparkling Soft Drinks", 1, false, 8500.0),
        row("r3", "Coca-Cola", 2, false, 5000.0),
        row("r4", "Sprite", 2, false, 2000.0),
        row("r5", "Fanta", 2, false, 1500.0),
        row("r6", "Still Beverages", 1, false, 3600.0),
        row("r7", "Water", 2, false, 1200.0),
        row("r8", "Tea", 2, false, 2400.0),
    ])
    .expect("demo ledger is well formed")
}

pub fn budget_context() -> PlanContext {
    PlanContext::default()
}

pub fn actuals_context() -> PlanContext {
    PlanContext {
        scenario: Scenario::Actuals,
        ..PlanContext::default()
    }
}

/// Session over the demo ledger with event capture.
pub struct SessionHarness {
    pub session: PlanSession,
    events: Rc<RefCell<EventCollector>>,
}

impl SessionHarness {
    pub fn new() -> Self {
        Self::with_context(budget_context())
    }

    pub fn with_context(context: PlanContext) -> Self {
        let mut session = PlanSession::new(demo_tree(), context);
        let events = Rc::new(RefCell::new(EventCollector::new()));
        let sink = Rc::clone(&events);
        session.set_event_callback(Box::new(move |event| sink.borrow_mut().push(event)));
        Self { session, events }
    }

    pub fn events(&self) -> Ref<'_, EventCollector> {
        self.events.borrow()
    }
}
