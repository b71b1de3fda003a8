//! Loader configuration
//!
//! Database settings live in [`paddock_common::db::DbConfig`] and are only
//! read when a run actually touches the store, so a dry run works without
//! `DATABASE_URL`.

use paddock_common::{PaddockError, Result};
use serde::{Deserialize, Serialize};

/// Default number of rows printed by a dry run
pub const DEFAULT_PREVIEW_ROWS: usize = 10;

/// What to do with a record that fails validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValidationPolicy {
    /// Reject the whole batch; nothing is written
    #[default]
    AbortBatch,
    /// Log the record, count it as skipped, and load the rest
    SkipRecord,
}

impl std::str::FromStr for ValidationPolicy {
    type Err = PaddockError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "abort" | "abort_batch" => Ok(ValidationPolicy::AbortBatch),
            "skip" | "skip_record" => Ok(ValidationPolicy::SkipRecord),
            other => Err(PaddockError::config(format!(
                "Invalid validation policy '{}' (expected 'abort' or 'skip')",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EtlConfig {
    pub validation_policy: ValidationPolicy,
    pub preview_rows: usize,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            validation_policy: ValidationPolicy::default(),
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

impl EtlConfig {
    /// Read `ETL_VALIDATION_POLICY` and `ETL_PREVIEW_ROWS`
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(policy) = std::env::var("ETL_VALIDATION_POLICY") {
            config.validation_policy = policy.parse()?;
        }
        if let Ok(rows) = std::env::var("ETL_PREVIEW_ROWS") {
            config.preview_rows = rows.trim().parse().map_err(|_| {
                PaddockError::config(format!("ETL_PREVIEW_ROWS must be a number, got '{}'", rows))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.preview_rows == 0 {
            return Err(PaddockError::config("preview_rows must be greater than 0"));
        }
        Ok(())
    }
}
