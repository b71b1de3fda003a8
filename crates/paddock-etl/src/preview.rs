//! Dry-run preview of a normalized batch

use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};

use crate::table::NormalizedTable;

/// Render the first `limit` records as a table, absent cells shown as `-`
pub fn format_preview(batch: &NormalizedTable, limit: usize) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(&batch.columns);

    for record in batch.records.iter().take(limit) {
        let cells: Vec<String> = batch
            .columns
            .iter()
            .map(|column| record.get(column).to_string())
            .collect();
        table.add_row(cells);
    }

    let mut output = format!("{}\n", table);
    if batch.len() > limit {
        output.push_str(&format!("... {} more records\n", batch.len() - limit));
    }
    output.push_str(&format!(
        "{} records, {} columns\n",
        batch.len(),
        batch.columns.len()
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_table;
    use crate::table::{RawRecord, RawTable};

    fn batch(rows: usize) -> NormalizedTable {
        let records = (0..rows)
            .map(|i| {
                RawRecord::from([
                    ("Rider Name".to_string(), format!("Rider{}", i)),
                    ("Points".to_string(), if i == 0 { "N/A".into() } else { i.to_string() }),
                ])
            })
            .collect();
        normalize_table(&RawTable::from_records(records))
    }

    #[test]
    fn test_preview_shows_canonical_columns_and_absent_marker() {
        let output = format_preview(&batch(2), 10);
        assert!(output.contains("rider_name"));
        assert!(output.contains("Rider1"));
        assert!(output.contains(" - "));
        assert!(output.ends_with("2 records, 2 columns\n"));
    }

    #[test]
    fn test_preview_is_truncated() {
        let output = format_preview(&batch(5), 2);
        assert!(output.contains("Rider1"));
        assert!(!output.contains("Rider4"));
        assert!(output.contains("... 3 more records"));
    }
}
