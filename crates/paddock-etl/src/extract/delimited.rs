//! Delimited text tables (CSV, TSV)
//!
//! One table per file; the header row supplies the column labels.

use csv::{ReaderBuilder, Trim};
use std::io::Read;
use std::path::Path;

use super::TableExtractor;
use crate::error::ExtractionError;
use crate::table::RawTable;

#[derive(Debug, Clone, Copy)]
pub struct CsvTableExtractor {
    delimiter: u8,
}

impl Default for CsvTableExtractor {
    fn default() -> Self {
        Self::new(b',')
    }
}

impl CsvTableExtractor {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Read one table from any reader
    pub fn read<R: Read>(&self, input: R) -> Result<RawTable, ExtractionError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .trim(Trim::Headers)
            .from_reader(input);

        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if columns.iter().all(String::is_empty) {
            return Err(ExtractionError::Malformed("missing header row".to_string()));
        }

        let rows = reader
            .records()
            .map(|record| record.map(|r| r.iter().map(str::to_string).collect::<Vec<_>>()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RawTable::from_rows(columns, rows))
    }
}

impl TableExtractor for CsvTableExtractor {
    fn extract(&self, path: &Path) -> Result<Vec<RawTable>, ExtractionError> {
        let file = std::fs::File::open(path)?;
        Ok(vec![self.read(file)?])
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_header_and_rows() {
        let input = "Rider Name, Pos ,Points\nBagnaia,1,25\nMartin,DNF,\n";
        let table = CsvTableExtractor::default().read(input.as_bytes()).unwrap();
        assert_eq!(table.columns, vec!["Rider Name", "Pos", "Points"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[1]["Pos"], "DNF");
        assert_eq!(table.rows[1]["Points"], "");
    }

    #[test]
    fn test_tab_delimiter() {
        let input = "a\tb\n1\t2\n";
        let table = CsvTableExtractor::new(b'\t').read(input.as_bytes()).unwrap();
        assert_eq!(table.rows[0]["b"], "2");
    }

    #[test]
    fn test_short_rows_are_tolerated() {
        let input = "a,b,c\n1,2\n";
        let table = CsvTableExtractor::default().read(input.as_bytes()).unwrap();
        assert_eq!(table.rows[0].len(), 2);
        assert!(!table.rows[0].contains_key("c"));
    }

    #[test]
    fn test_empty_input_is_malformed() {
        let err = CsvTableExtractor::default().read("".as_bytes()).unwrap_err();
        assert!(matches!(err, ExtractionError::Malformed(_)));
    }
}
