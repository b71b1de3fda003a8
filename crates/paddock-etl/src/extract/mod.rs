//! Table extraction adapters
//!
//! An extractor turns one source document into zero or more [`RawTable`]s.
//! JSON and delimited text are read here. PDF results sheets go through an
//! external table extractor first and arrive as one of those formats.

use std::path::Path;

use crate::error::ExtractionError;
use crate::table::RawTable;

mod delimited;
mod json;

pub use delimited::CsvTableExtractor;
pub use json::JsonTableExtractor;

/// Reads raw tables from a source document
pub trait TableExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<Vec<RawTable>, ExtractionError>;
}

/// Pick an extractor from the file extension
pub fn extractor_for_path(path: &Path) -> Result<Box<dyn TableExtractor>, ExtractionError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "json" => Ok(Box::new(JsonTableExtractor)),
        "csv" => Ok(Box::new(CsvTableExtractor::new(b','))),
        "tsv" => Ok(Box::new(CsvTableExtractor::new(b'\t'))),
        "" => Err(ExtractionError::UnsupportedFormat(path.display().to_string())),
        other => Err(ExtractionError::UnsupportedFormat(format!(".{}", other))),
    }
}

/// Extract every table of the document at `path`
pub fn extract_tables(path: &Path) -> Result<Vec<RawTable>, ExtractionError> {
    if !path.is_file() {
        return Err(ExtractionError::NotFound(path.to_path_buf()));
    }
    let tables = extractor_for_path(path)?.extract(path)?;
    tracing::info!(
        path = %path.display(),
        tables = tables.len(),
        rows = tables.iter().map(RawTable::len).sum::<usize>(),
        "Extracted source document"
    );
    Ok(tables)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_missing_file_is_not_found() {
        let err = extract_tables(Path::new("/nonexistent/results.json")).unwrap_err();
        assert!(matches!(err, ExtractionError::NotFound(_)));
    }

    #[test]
    fn test_pdf_is_unsupported() {
        let err = extractor_for_path(&PathBuf::from("results.PDF")).err().unwrap();
        assert!(matches!(err, ExtractionError::UnsupportedFormat(ref ext) if ext == ".pdf"));
    }

    #[test]
    fn test_known_extensions() {
        assert!(extractor_for_path(Path::new("a.json")).is_ok());
        assert!(extractor_for_path(Path::new("a.csv")).is_ok());
        assert!(extractor_for_path(Path::new("a.tsv")).is_ok());
        assert!(extractor_for_path(Path::new("results")).is_err());
    }
}
