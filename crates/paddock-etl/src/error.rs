//! Error types for the results pipeline

use std::path::PathBuf;
use thiserror::Error;

use crate::store::StoreError;

/// Result type alias for pipeline operations
pub type EtlResult<T> = std::result::Result<T, EtlError>;

/// Any failure that ends a pipeline run.
///
/// Failures raised inside a load are returned only after the unit of work
/// has been rolled back.
#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A store-level uniqueness constraint fired outside identity matching,
    /// typically because another writer created the same key first.
    #[error("Persistence conflict on {entity} {key}")]
    PersistenceConflict { entity: &'static str, key: String },

    #[error("Transaction failed: {0}")]
    Transaction(#[source] StoreError),

    /// The merger met a record whose keys the resolver never produced.
    #[error("Record {row} has no resolved {entity} identifier")]
    UnresolvedKey { row: usize, entity: &'static str },
}

impl From<StoreError> for EtlError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { entity, key } => EtlError::PersistenceConflict { entity, key },
            other => EtlError::Transaction(other),
        }
    }
}

/// The upstream table source could not be read or had an unusable shape
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Source document not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Unsupported source format '{0}' (expected .json, .csv or .tsv)")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed table data: {0}")]
    Malformed(String),
}

/// A normalized record lacks, or carries an unusable, identity field
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("record {row}: missing required field '{field}'")]
    MissingField { row: usize, field: &'static str },

    #[error("record {row}: invalid value {value:?} for field '{field}'")]
    InvalidField {
        row: usize,
        field: &'static str,
        value: String,
    },
}

impl ValidationError {
    /// Index of the offending record within its batch
    pub fn row(&self) -> usize {
        match self {
            ValidationError::MissingField { row, .. } | ValidationError::InvalidField { row, .. } => {
                *row
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_conflict_maps_to_persistence_conflict() {
        let err = EtlError::from(StoreError::Conflict {
            entity: "rider",
            key: "(Bagnaia, Francesco)".to_string(),
        });
        assert!(matches!(err, EtlError::PersistenceConflict { entity: "rider", .. }));
    }

    #[test]
    fn test_other_store_errors_map_to_transaction_failure() {
        let err = EtlError::from(StoreError::Database(sqlx::Error::PoolClosed));
        assert!(matches!(err, EtlError::Transaction(_)));
    }

    #[test]
    fn test_validation_error_reports_row() {
        let err = ValidationError::MissingField {
            row: 3,
            field: "circuit",
        };
        assert_eq!(err.row(), 3);
        assert_eq!(err.to_string(), "record 3: missing required field 'circuit'");
    }
}
