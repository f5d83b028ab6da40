// Property-based tests for rollup propagation.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use proptest::prelude::*;

use plangrid_engine::rollup::apply_edit;
use plangrid_engine::row::{MonthValues, PlanRow, MONTHS_PER_YEAR};
use plangrid_engine::tree::PlanTree;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Depth-annotated row list obeying the pre-order convention: row 0 at
/// level 0, each later row at most one deeper than its predecessor.
/// Values are integer-valued so sums stay exact in f64.
fn arb_rows(max_rows: usize) -> impl Strategy<Value = Vec<PlanRow>> {
    proptest::collection::vec(
        (
            any::<u8>(),
            proptest::collection::vec(0u32..1_000_000, MONTHS_PER_YEAR),
        ),
        1..=max_rows,
    )
    .prop_map(|specs| {
        let mut rows = Vec::with_capacity(specs.len());
        let mut prev_level = 0u8;
        for (i, (level_seed, values)) in specs.into_iter().enumerate() {
            let level = if i == 0 { 0 } else { level_seed % (prev_level + 2) };
            let mut months = MonthValues::zeroed();
            for (month, value) in values.into_iter().enumerate() {
                months.set(month, value as f64);
            }
            rows.push(PlanRow {
                id: format!("r{}", i),
                account: format!("account {}", i),
                level,
                is_total: false,
                values: months,
            });
            prev_level = level;
        }
        rows
    })
}

/// Edit stream: (row seed, month, value). Row seeds are resolved against
/// the tree's leaf set at application time.
fn arb_edits(max_edits: usize) -> impl Strategy<Value = Vec<(usize, usize, u32)>> {
    proptest::collection::vec(
        (any::<usize>(), 0..MONTHS_PER_YEAR, 0u32..1_000_000),
        0..=max_edits,
    )
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn leaves(tree: &PlanTree) -> Vec<usize> {
    (0..tree.len()).filter(|&i| tree.is_leaf(i)).collect()
}

/// Bring every parent in line with its leaves by re-committing each
/// leaf's own value, month by month. After the last edit inside any
/// parent's subtree, that parent holds its children's sum.
fn normalized(tree: &PlanTree) -> PlanTree {
    let mut current = tree.clone();
    for month in 0..MONTHS_PER_YEAR {
        for index in leaves(tree) {
            let id = current.rows()[index].id.clone();
            let value = current.value(index, month);
            if let Some(applied) = apply_edit(&current, &id, month, value) {
                current = applied.tree;
            }
        }
    }
    current
}

fn assert_rollup_invariant(tree: &PlanTree) {
    for parent in 0..tree.len() {
        if tree.is_leaf(parent) {
            continue;
        }
        for month in 0..MONTHS_PER_YEAR {
            let sum: f64 = tree.children(parent).map(|c| tree.value(c, month)).sum();
            assert_eq!(
                tree.value(parent, month),
                sum,
                "row {} month {} out of line with its children",
                parent,
                month
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    /// After any sequence of accepted leaf edits, every non-leaf row
    /// equals the sum of its immediate children for every month.
    #[test]
    fn rollup_invariant_holds_after_edits(
        rows in arb_rows(24),
        edits in arb_edits(16),
    ) {
        let tree = PlanTree::new(rows).unwrap();
        let mut current = normalized(&tree);
        let leaf_set = leaves(&current);

        for (row_seed, month, value) in edits {
            let index = leaf_set[row_seed % leaf_set.len()];
            let id = current.rows()[index].id.clone();
            let applied = apply_edit(&current, &id, month, value as f64).unwrap();
            current = applied.tree;
        }

        assert_rollup_invariant(&current);
    }

    /// Editing month m never changes any row's value at another month.
    #[test]
    fn edits_are_single_column(
        rows in arb_rows(24),
        row_seed in any::<usize>(),
        month in 0..MONTHS_PER_YEAR,
        value in 0u32..1_000_000,
    ) {
        let tree = normalized(&PlanTree::new(rows).unwrap());
        let leaf_set = leaves(&tree);
        let index = leaf_set[row_seed % leaf_set.len()];
        let id = tree.rows()[index].id.clone();

        let next = apply_edit(&tree, &id, month, value as f64).unwrap().tree;
        for other in (0..MONTHS_PER_YEAR).filter(|&m| m != month) {
            for i in 0..tree.len() {
                prop_assert_eq!(next.value(i, other), tree.value(i, other));
            }
        }
    }

    /// Applying the same edit twice yields the same tree as once.
    #[test]
    fn edits_are_idempotent(
        rows in arb_rows(24),
        row_seed in any::<usize>(),
        month in 0..MONTHS_PER_YEAR,
        value in 0u32..1_000_000,
    ) {
        let tree = normalized(&PlanTree::new(rows).unwrap());
        let leaf_set = leaves(&tree);
        let index = leaf_set[row_seed % leaf_set.len()];
        let id = tree.rows()[index].id.clone();

        let once = apply_edit(&tree, &id, month, value as f64).unwrap().tree;
        let twice = apply_edit(&once, &id, month, value as f64).unwrap().tree;
        prop_assert_eq!(once.rows(), twice.rows());
    }

    /// An unknown row id is a no-op, never a panic.
    #[test]
    fn unknown_rows_are_noops(rows in arb_rows(24)) {
        let tree = PlanTree::new(rows).unwrap();
        prop_assert!(apply_edit(&tree, "no-such-row", 0, 1.0).is_none());
    }
}
