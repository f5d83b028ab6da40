use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Months per planning year. Cells are addressed by month index 0 (Jan)
/// through 11 (Dec).
pub const MONTHS_PER_YEAR: usize = 12;

/// Display labels for the twelve month columns.
pub const MONTH_LABELS: [&str; MONTHS_PER_YEAR] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Label for a month index, `"?"` when out of range.
pub fn month_label(month: usize) -> &'static str {
    MONTH_LABELS.get(month).copied().unwrap_or("?")
}

/// Twelve per-month cell values.
///
/// Serializes as a month-index-keyed map (the plan document shape).
/// Missing keys deserialize to 0.0; a key outside 0..=11 is a document
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MonthValues([f64; MONTHS_PER_YEAR]);

impl MonthValues {
    pub fn new(values: [f64; MONTHS_PER_YEAR]) -> Self {
        Self(values)
    }

    pub fn zeroed() -> Self {
        Self::default()
    }

    /// Value for a month, 0.0 when the index is out of range.
    pub fn get(&self, month: usize) -> f64 {
        self.0.get(month).copied().unwrap_or(0.0)
    }

    /// Set a month's value. Out-of-range indices are ignored.
    pub fn set(&mut self, month: usize, value: f64) {
        if let Some(slot) = self.0.get_mut(month) {
            *slot = value;
        }
    }

    /// Sum over all twelve months.
    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.0.iter().copied().enumerate()
    }
}

impl Serialize for MonthValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(MONTHS_PER_YEAR))?;
        for (month, value) in self.iter() {
            map.serialize_entry(&month, &value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for MonthValues {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = BTreeMap::<usize, f64>::deserialize(deserializer)?;
        let mut values = [0.0; MONTHS_PER_YEAR];
        for (month, value) in entries {
            if month >= MONTHS_PER_YEAR {
                return Err(serde::de::Error::custom(format!(
                    "month index {} out of range (0..{})",
                    month, MONTHS_PER_YEAR
                )));
            }
            values[month] = value;
        }
        Ok(Self(values))
    }
}

/// A planning line item.
///
/// `level` is the depth in the ledger tree; parent/child membership is
/// inferred from row order and depth alone (see `PlanTree`). `is_total`
/// marks a declared aggregate regardless of position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRow {
    pub id: String,
    pub account: String,
    pub level: u8,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_total: bool,
    pub values: MonthValues,
}

/// Address of one cell: row index in the flat collection plus month index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub row: usize,
    pub month: usize,
}

impl CellRef {
    #[inline]
    pub fn new(row: usize, month: usize) -> Self {
        Self { row, month }
    }
}

impl std::fmt::Display for CellRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.row, month_label(self.month))
    }
}

/// Format a committed cell value the way the grid displays it: thousands
/// grouping, up to three fractional digits, trailing zeros trimmed.
pub fn format_grouped(n: f64) -> String {
    if !n.is_finite() {
        return format!("{}", n);
    }
    let negative = n < 0.0;
    let rounded = (n.abs() * 1000.0).round() / 1000.0;
    let int_part = rounded.trunc();
    let frac = ((rounded - int_part) * 1000.0).round() as u32;

    let digits = format!("{:.0}", int_part);
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if frac > 0 {
        let mut tail = format!("{:03}", frac);
        while tail.ends_with('0') {
            tail.pop();
        }
        grouped.push('.');
        grouped.push_str(&tail);
    }
    if negative {
        grouped.insert(0, '-');
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_values_missing_keys_read_as_zero() {
        let json = r#"{"0": 12100, "5": 15800}"#;
        let values: MonthValues = serde_json::from_str(json).unwrap();
        assert_eq!(values.get(0), 12100.0);
        assert_eq!(values.get(5), 15800.0);
        assert_eq!(values.get(1), 0.0);
        assert_eq!(values.get(11), 0.0);
    }

    #[test]
    fn test_month_values_reject_out_of_range_key() {
        let json = r#"{"12": 1}"#;
        assert!(serde_json::from_str::<MonthValues>(json).is_err());
    }

    #[test]
    fn test_month_values_roundtrip() {
        let mut values = MonthValues::zeroed();
        values.set(0, 1200.0);
        values.set(11, 1400.5);
        let json = serde_json::to_string(&values).unwrap();
        let back: MonthValues = serde_json::from_str(&json).unwrap();
        assert_eq!(values, back);
    }

    #[test]
    fn test_month_values_out_of_range_access() {
        let mut values = MonthValues::zeroed();
        values.set(12, 99.0);
        assert_eq!(values.get(12), 0.0);
        assert_eq!(values.total(), 0.0);
    }

    #[test]
    fn test_plan_row_document_shape() {
        let json = r#"{
            "id": "r2",
            "account": "Sparkling Soft Drinks",
            "level": 1,
            "values": {"0": 8500}
        }"#;
        let row: PlanRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.id, "r2");
        assert!(!row.is_total);
        assert_eq!(row.values.get(0), 8500.0);

        let with_total = r#"{"id": "r1", "account": "Net Revenue", "level": 0, "isTotal": true, "values": {}}"#;
        let row: PlanRow = serde_json::from_str(with_total).unwrap();
        assert!(row.is_total);
    }

    #[test]
    fn test_cell_ref_display() {
        assert_eq!(format!("{}", CellRef::new(2, 2)), "2@Mar");
        assert_eq!(format!("{}", CellRef::new(0, 11)), "0@Dec");
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(0.0), "0");
        assert_eq!(format_grouped(950.0), "950");
        assert_eq!(format_grouped(12100.0), "12,100");
        assert_eq!(format_grouped(100_000_000.0), "100,000,000");
        assert_eq!(format_grouped(1234.5), "1,234.5");
        assert_eq!(format_grouped(1234.25), "1,234.25");
        assert_eq!(format_grouped(-5300.0), "-5,300");
    }

    #[test]
    fn test_format_grouped_rounds_to_three_places() {
        assert_eq!(format_grouped(0.9999), "1");
        assert_eq!(format_grouped(12.3456), "12.346");
    }
}
