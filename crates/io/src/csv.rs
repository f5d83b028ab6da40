// CSV export of the planning grid

use std::path::Path;

use plangrid_engine::row::{MONTH_LABELS, MONTHS_PER_YEAR};
use plangrid_engine::tree::PlanTree;

/// Export the grid as CSV: Account, the twelve month columns, and a
/// per-row Total. Values are raw numbers, not display-grouped.
pub fn export(tree: &PlanTree, path: &Path) -> Result<(), String> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| e.to_string())?;

    let mut header = Vec::with_capacity(MONTHS_PER_YEAR + 2);
    header.push("Account".to_string());
    header.extend(MONTH_LABELS.iter().map(|m| m.to_string()));
    header.push("Total".to_string());
    writer.write_record(&header).map_err(|e| e.to_string())?;

    for (index, row) in tree.rows().iter().enumerate() {
        let mut record = Vec::with_capacity(MONTHS_PER_YEAR + 2);
        record.push(row.account.clone());
        for (_, value) in row.values.iter() {
            record.push(format_value(value));
        }
        record.push(format_value(tree.annual_total(index)));
        writer.write_record(&record).map_err(|e| e.to_string())?;
    }

    writer.flush().map_err(|e| e.to_string())
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use tempfile::tempdir;

    #[test]
    fn test_csv_export() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plan.csv");

        let tree = seed::demo_document().tree().unwrap();
        export(&tree, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("Account,Jan,Feb"));
        assert!(header.ends_with("Dec,Total"));

        let root = lines.next().unwrap();
        assert!(root.starts_with("Net Revenue,12100,"));
        assert!(root.ends_with(",167000"));

        assert_eq!(content.lines().count(), 9);
    }

    #[test]
    fn test_csv_preserves_fractions() {
        assert_eq!(format_value(12100.0), "12100");
        assert_eq!(format_value(12100.5), "12100.5");
    }
}
