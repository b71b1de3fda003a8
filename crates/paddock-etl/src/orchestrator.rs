//! Load orchestration
//!
//! One batch, one unit of work: records are validated, identities resolved,
//! results merged, and the unit of work committed exactly once. Any failure
//! after `begin` rolls the unit of work back before the error is returned.

use tracing::{error, info, warn};

use crate::config::ValidationPolicy;
use crate::error::{EtlError, EtlResult};
use crate::merge::merge_results;
use crate::record::ResultRecord;
use crate::resolve::resolve_entities;
use crate::stats::LoadStats;
use crate::store::{ResultsStore, UnitOfWork};
use crate::table::NormalizedTable;

/// Validate every record of a batch under `policy`.
///
/// Returns the valid records and the number skipped. Under
/// [`ValidationPolicy::AbortBatch`] the first invalid record fails the batch.
pub fn prepare_records(
    batch: &NormalizedTable,
    policy: ValidationPolicy,
) -> EtlResult<(Vec<ResultRecord>, usize)> {
    let mut records = Vec::with_capacity(batch.len());
    let mut skipped = 0;

    for (row, normalized) in batch.records.iter().enumerate() {
        match ResultRecord::from_row(row, normalized) {
            Ok(record) => records.push(record),
            Err(err) => match policy {
                ValidationPolicy::AbortBatch => return Err(err.into()),
                ValidationPolicy::SkipRecord => {
                    warn!(row, error = %err, "Skipping invalid record");
                    skipped += 1;
                },
            },
        }
    }

    Ok((records, skipped))
}

pub struct LoadOrchestrator<S> {
    store: S,
    policy: ValidationPolicy,
}

impl<S: ResultsStore> LoadOrchestrator<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            policy: ValidationPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load one normalized batch atomically
    #[tracing::instrument(skip(self, batch), fields(records = batch.len(), policy = ?self.policy))]
    pub async fn load(&self, batch: &NormalizedTable) -> EtlResult<LoadStats> {
        let (records, skipped) = prepare_records(batch, self.policy)?;

        let mut stats = LoadStats {
            records_skipped: skipped,
            ..LoadStats::default()
        };

        if records.is_empty() {
            info!(%stats, "Nothing to load");
            return Ok(stats);
        }

        let mut uow = self.store.begin().await?;

        match Self::run(uow.as_mut(), &records, &mut stats).await {
            Ok(()) => {
                uow.commit().await?;
                info!(%stats, "Batch committed");
                Ok(stats)
            },
            Err(err) => {
                error!(error = %err, "Batch failed, rolling back");
                if let Err(rollback_err) = uow.rollback().await {
                    warn!(error = %rollback_err, "Rollback failed");
                }
                Err(err)
            },
        }
    }

    async fn run(
        uow: &mut dyn UnitOfWork,
        records: &[ResultRecord],
        stats: &mut LoadStats,
    ) -> Result<(), EtlError> {
        let maps = resolve_entities(uow, records, stats).await?;
        merge_results(uow, records, &maps, stats).await
    }
}
