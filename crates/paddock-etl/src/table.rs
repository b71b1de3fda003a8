//! Tabular shapes flowing through the pipeline
//!
//! [`RawTable`] is what an extractor hands over: untrusted text cells keyed
//! by whatever labels the source used. [`NormalizedTable`] is the same data
//! after [`crate::normalize::normalize_table`]: canonical column names and
//! typed cells with an explicit [`CellValue::Absent`] marker.

use serde::Serialize;
use std::collections::BTreeMap;

/// One extracted row: raw column label -> raw cell text
pub type RawRecord = BTreeMap<String, String>;

/// One table as produced by an upstream extractor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    /// Column labels in source order; normalization reads cells in this order
    pub columns: Vec<String>,
    pub rows: Vec<RawRecord>,
}

impl RawTable {
    /// Build a table from keyed rows, collecting labels in first-seen order.
    ///
    /// A [`RawRecord`] is sorted by label, so labels first seen in the same
    /// row come in sorted order. Extractors that know the source order build
    /// the table directly.
    pub fn from_records(rows: Vec<RawRecord>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in &rows {
            for label in row.keys() {
                if !columns.contains(label) {
                    columns.push(label.clone());
                }
            }
        }
        Self { columns, rows }
    }

    /// Build a table from a header and positional rows.
    ///
    /// Short rows leave their trailing columns out of the record; extra
    /// cells past the header are dropped.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let rows = rows
            .into_iter()
            .map(|cells| columns.iter().cloned().zip(cells).collect::<RawRecord>())
            .collect();
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A normalized cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    /// No data supplied (empty cell, `N/A`, or column missing from the row)
    Absent,
    Integer(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, CellValue::Absent)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Absent => write!(f, "-"),
            CellValue::Integer(i) => write!(f, "{}", i),
            CellValue::Float(x) => write!(f, "{}", x),
            CellValue::Text(s) => write!(f, "{}", s),
        }
    }
}

static ABSENT: CellValue = CellValue::Absent;

/// One normalized row: canonical column name -> typed cell
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NormalizedRecord {
    cells: BTreeMap<String, CellValue>,
}

impl NormalizedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell for `column`, [`CellValue::Absent`] when the row has no such column
    pub fn get(&self, column: &str) -> &CellValue {
        self.cells.get(column).unwrap_or(&ABSENT)
    }

    pub fn insert(&mut self, column: impl Into<String>, value: CellValue) {
        self.cells.insert(column.into(), value);
    }

    pub(crate) fn get_mut(&mut self, column: &str) -> Option<&mut CellValue> {
        self.cells.get_mut(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }
}

impl<K: Into<String>> FromIterator<(K, CellValue)> for NormalizedRecord {
    fn from_iter<I: IntoIterator<Item = (K, CellValue)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// A batch of normalized records, the unit handed to the loader
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizedTable {
    /// Canonical column names in first-seen order
    pub columns: Vec<String>,
    pub records: Vec<NormalizedRecord>,
}

impl NormalizedTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append several tables into one batch.
    ///
    /// Columns are unioned; a record keeps the cell types its own table
    /// gave it, so a column can mix numeric and text cells across tables.
    pub fn concat(tables: impl IntoIterator<Item = NormalizedTable>) -> Self {
        let mut batch = NormalizedTable::default();
        for table in tables {
            for column in table.columns {
                if !batch.columns.contains(&column) {
                    batch.columns.push(column);
                }
            }
            batch.records.extend(table.records);
        }
        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> RawRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_records_unions_labels() {
        let table = RawTable::from_records(vec![
            record(&[("Pos", "1"), ("Rider", "Bagnaia")]),
            record(&[("Points", "25"), ("Pos", "2")]),
        ]);
        assert_eq!(table.columns, vec!["Pos", "Rider", "Points"]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_from_rows_tolerates_short_rows() {
        let table = RawTable::from_rows(
            vec!["a".into(), "b".into()],
            vec![vec!["1".into()], vec!["2".into(), "3".into(), "4".into()]],
        );
        assert_eq!(table.rows[0].len(), 1);
        assert_eq!(table.rows[1].get("b").map(String::as_str), Some("3"));
        assert_eq!(table.rows[1].len(), 2);
    }

    #[test]
    fn test_missing_column_reads_as_absent() {
        let record: NormalizedRecord = [("points", CellValue::Float(25.0))].into_iter().collect();
        assert!(record.get("position").is_absent());
        assert_eq!(record.get("points"), &CellValue::Float(25.0));
    }

    #[test]
    fn test_concat_unions_columns() {
        let first = NormalizedTable {
            columns: vec!["a".into(), "b".into()],
            records: vec![NormalizedRecord::new()],
        };
        let second = NormalizedTable {
            columns: vec!["b".into(), "c".into()],
            records: vec![NormalizedRecord::new(), NormalizedRecord::new()],
        };
        let batch = NormalizedTable::concat([first, second]);
        assert_eq!(batch.columns, vec!["a", "b", "c"]);
        assert_eq!(batch.len(), 3);
    }
}
