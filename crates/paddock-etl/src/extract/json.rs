//! JSON tables
//!
//! Accepted shapes:
//!
//! - one table: `[{"Rider": "Bagnaia", "Pos": 1}, ...]`
//! - several tables: `[[{...}, ...], [{...}, ...]]`
//!
//! Cells may be strings, numbers, booleans or `null` (read as an empty cell).

use serde_json::{Map, Value};
use std::path::Path;

use super::TableExtractor;
use crate::error::ExtractionError;
use crate::table::{RawRecord, RawTable};

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonTableExtractor;

impl JsonTableExtractor {
    /// Parse tables from an in-memory JSON document
    pub fn parse(&self, input: &str) -> Result<Vec<RawTable>, ExtractionError> {
        let document: Value = serde_json::from_str(input)?;
        let Value::Array(items) = document else {
            return Err(ExtractionError::Malformed(
                "expected a JSON array of rows or of tables".to_string(),
            ));
        };

        if items.is_empty() {
            return Ok(Vec::new());
        }
        if !items[0].is_array() {
            return Ok(vec![parse_table(0, items)?]);
        }

        items
            .into_iter()
            .enumerate()
            .map(|(table, rows)| match rows {
                Value::Array(rows) => parse_table(table, rows),
                other => Err(ExtractionError::Malformed(format!(
                    "table {}: expected an array of rows, found {}",
                    table,
                    kind(&other)
                ))),
            })
            .collect()
    }
}

impl TableExtractor for JsonTableExtractor {
    fn extract(&self, path: &Path) -> Result<Vec<RawTable>, ExtractionError> {
        let input = std::fs::read_to_string(path)?;
        self.parse(&input)
    }
}

fn parse_table(table: usize, rows: Vec<Value>) -> Result<RawTable, ExtractionError> {
    let records = rows
        .into_iter()
        .enumerate()
        .map(|(row, value)| match value {
            Value::Object(cells) => parse_row(table, row, cells),
            other => Err(ExtractionError::Malformed(format!(
                "table {} row {}: expected an object, found {}",
                table,
                row,
                kind(&other)
            ))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Columns follow document order; objects keep it via `preserve_order`
    let mut columns: Vec<String> = Vec::new();
    for cells in &records {
        for (label, _) in cells {
            if !columns.contains(label) {
                columns.push(label.clone());
            }
        }
    }
    let rows = records
        .into_iter()
        .map(|cells| cells.into_iter().collect::<RawRecord>())
        .collect();

    Ok(RawTable { columns, rows })
}

fn parse_row(
    table: usize,
    row: usize,
    cells: Map<String, Value>,
) -> Result<Vec<(String, String)>, ExtractionError> {
    cells
        .into_iter()
        .map(|(label, value)| {
            let text = match value {
                Value::Null => String::new(),
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => {
                    return Err(ExtractionError::Malformed(format!(
                        "table {} row {} column '{}': nested {} is not a cell value",
                        table,
                        row,
                        label,
                        kind(&other)
                    )))
                },
            };
            Ok((label, text))
        })
        .collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
