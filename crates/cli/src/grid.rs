// Terminal rendering of the planning grid

use plangrid_engine::row::{format_grouped, month_label, MONTH_LABELS, MONTHS_PER_YEAR};
use plangrid_engine::tree::PlanTree;
use plangrid_engine::validation::CellBounds;

/// Parse a month argument: an index 0..=11 or a Jan..Dec label,
/// case-insensitive.
pub fn parse_month(raw: &str) -> Option<usize> {
    if let Ok(index) = raw.parse::<usize>() {
        return (index < MONTHS_PER_YEAR).then_some(index);
    }
    MONTH_LABELS
        .iter()
        .position(|label| label.eq_ignore_ascii_case(raw))
}

/// Render the grid: accounts indented by level, twelve right-aligned
/// month columns, and a per-row total. Out-of-range cells get a
/// trailing `!`.
pub fn render(tree: &PlanTree, bounds: &CellBounds, group_digits: bool) -> String {
    let fmt = |value: f64| {
        if group_digits {
            format_grouped(value)
        } else {
            value.to_string()
        }
    };

    let accounts: Vec<String> = tree
        .rows()
        .iter()
        .map(|row| format!("{}{}", "  ".repeat(row.level as usize), row.account))
        .collect();

    let cells: Vec<Vec<String>> = tree
        .rows()
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let mut line: Vec<String> = row
                .values
                .iter()
                .map(|(_, value)| {
                    if bounds.contains(value) {
                        fmt(value)
                    } else {
                        format!("{}!", fmt(value))
                    }
                })
                .collect();
            line.push(fmt(tree.annual_total(index)));
            line
        })
        .collect();

    let account_width = accounts
        .iter()
        .map(String::len)
        .chain(std::iter::once("Account".len()))
        .max()
        .unwrap_or(0);

    let mut col_widths = vec![0usize; MONTHS_PER_YEAR + 1];
    for (month, width) in col_widths.iter_mut().enumerate().take(MONTHS_PER_YEAR) {
        *width = month_label(month).len();
    }
    col_widths[MONTHS_PER_YEAR] = "Total".len();
    for line in &cells {
        for (col, cell) in line.iter().enumerate() {
            col_widths[col] = col_widths[col].max(cell.len());
        }
    }

    let mut out = String::new();
    out.push_str(&format!("{:<width$}", "Account", width = account_width));
    for (month, label) in MONTH_LABELS.iter().enumerate() {
        out.push_str(&format!("  {:>width$}", label, width = col_widths[month]));
    }
    out.push_str(&format!(
        "  {:>width$}\n",
        "Total",
        width = col_widths[MONTHS_PER_YEAR]
    ));

    for (account, line) in accounts.iter().zip(&cells) {
        out.push_str(&format!("{:<width$}", account, width = account_width));
        for (col, cell) in line.iter().enumerate() {
            out.push_str(&format!("  {:>width$}", cell, width = col_widths[col]));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use plangrid_io::seed;

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("0"), Some(0));
        assert_eq!(parse_month("11"), Some(11));
        assert_eq!(parse_month("12"), None);
        assert_eq!(parse_month("Jan"), Some(0));
        assert_eq!(parse_month("dec"), Some(11));
        assert_eq!(parse_month("January"), None);
        assert_eq!(parse_month("-1"), None);
    }

    #[test]
    fn test_render_grid() {
        let tree = seed::demo_document().tree().unwrap();
        let rendered = render(&tree, &CellBounds::default(), true);
        let mut lines = rendered.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("Account"));
        assert!(header.contains("Jan"));
        assert!(header.trim_end().ends_with("Total"));

        let root = lines.next().unwrap();
        assert!(root.starts_with("Net Revenue"));
        assert!(root.contains("12,100"));
        assert!(root.trim_end().ends_with("167,000"));

        // Children are indented by level.
        assert!(rendered.contains("\n  Sparkling Soft Drinks"));
        assert!(rendered.contains("\n    Coca-Cola"));
        assert_eq!(rendered.lines().count(), 9);
    }

    #[test]
    fn test_render_marks_invalid_cells() {
        let tree = seed::demo_document().tree().unwrap();
        let bounds = CellBounds::with_max(10_000.0);
        let rendered = render(&tree, &bounds, true);
        assert!(rendered.contains("12,100!"));
        assert!(!rendered.contains("5,000!"));
    }

    #[test]
    fn test_render_without_grouping() {
        let tree = seed::demo_document().tree().unwrap();
        let rendered = render(&tree, &CellBounds::default(), false);
        assert!(rendered.contains("12100"));
        assert!(!rendered.contains("12,100"));
    }
}
