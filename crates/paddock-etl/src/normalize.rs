//! Row normalizer
//!
//! Turns one [`RawTable`] into a [`NormalizedTable`]:
//!
//! 1. column labels are trimmed, lower-cased and have spaces replaced by `_`
//! 2. cells that trim to `""` or `"N/A"` become [`CellValue::Absent`]
//! 3. each column is coerced to a numeric type only if every present cell
//!    in it parses as a number; otherwise the whole column stays text
//!
//! Normalization never fails. Anything it cannot interpret stays text and
//! is left for record validation to judge.

use tracing::debug;

use crate::table::{CellValue, NormalizedRecord, NormalizedTable, RawTable};

/// Cell tokens that mean "no value"
pub const MISSING_VALUE_TOKENS: [&str; 2] = ["", "N/A"];

/// Canonical form of a raw column label: `" Rider Name "` -> `"rider_name"`
pub fn canonical_column(label: &str) -> String {
    label.trim().to_lowercase().replace(' ', "_")
}

/// Map a raw cell to [`CellValue::Absent`] or uncoerced text
pub fn normalize_cell(raw: &str) -> CellValue {
    if MISSING_VALUE_TOKENS.contains(&raw.trim()) {
        CellValue::Absent
    } else {
        CellValue::Text(raw.to_string())
    }
}

/// Normalize one extracted table
pub fn normalize_table(table: &RawTable) -> NormalizedTable {
    let mut columns: Vec<String> = Vec::with_capacity(table.columns.len());
    for label in &table.columns {
        let column = canonical_column(label);
        if !columns.contains(&column) {
            columns.push(column);
        }
    }

    // Labels that collapse to the same canonical name: the later column in
    // `table.columns` wins for that row. Cells under labels missing from
    // `table.columns` are not read.
    let mut records: Vec<NormalizedRecord> = table
        .rows
        .iter()
        .map(|row| {
            table
                .columns
                .iter()
                .filter_map(|label| {
                    row.get(label)
                        .map(|value| (canonical_column(label), normalize_cell(value)))
                })
                .collect()
        })
        .collect();

    for column in &columns {
        coerce_column(column, &mut records);
    }

    NormalizedTable { columns, records }
}

enum ColumnKind {
    Integer,
    Float,
    Text,
}

/// Apply all-or-nothing numeric coercion to one column
fn coerce_column(column: &str, records: &mut [NormalizedRecord]) {
    let mut kind: Option<ColumnKind> = None;

    for record in records.iter() {
        let Some(text) = record.get(column).as_text() else {
            continue;
        };
        kind = match (kind, classify(text)) {
            (_, ColumnKind::Text) => Some(ColumnKind::Text),
            (Some(ColumnKind::Text), _) => Some(ColumnKind::Text),
            (Some(ColumnKind::Float), _) | (_, ColumnKind::Float) => Some(ColumnKind::Float),
            _ => Some(ColumnKind::Integer),
        };
        if matches!(kind, Some(ColumnKind::Text)) {
            debug!(column, value = text, "Column kept as text");
            return;
        }
    }

    let Some(kind) = kind else {
        return;
    };

    for record in records.iter_mut() {
        let Some(cell) = record.get_mut(column) else {
            continue;
        };
        let CellValue::Text(text) = cell else {
            continue;
        };
        let coerced = match kind {
            ColumnKind::Integer => parse_integer(text).map(CellValue::Integer),
            ColumnKind::Float => parse_float(text).map(CellValue::Float),
            ColumnKind::Text => None,
        };
        if let Some(value) = coerced {
            *cell = value;
        }
    }
}

fn classify(text: &str) -> ColumnKind {
    if parse_integer(text).is_some() {
        ColumnKind::Integer
    } else if parse_float(text).is_some() {
        ColumnKind::Float
    } else {
        ColumnKind::Text
    }
}

fn parse_integer(text: &str) -> Option<i64> {
    text.trim().parse().ok()
}

/// Finite floats only; "NaN" and "inf" are text
fn parse_float(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|x| x.is_finite())
}
