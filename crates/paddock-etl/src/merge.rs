//! Result merging
//!
//! Upserts one `results_race` row per record, keyed by the ids the resolver
//! produced. A stored result is rewritten only when its position or points
//! differ from the incoming values.

use tracing::debug;

use crate::error::{EtlError, EtlResult};
use crate::record::ResultRecord;
use crate::resolve::IdentityMaps;
use crate::stats::LoadStats;
use crate::store::UnitOfWork;

pub async fn merge_results(
    uow: &mut dyn UnitOfWork,
    records: &[ResultRecord],
    maps: &IdentityMaps,
    stats: &mut LoadStats,
) -> EtlResult<()> {
    for record in records {
        let rider_id = maps
            .rider_id(record)
            .ok_or(EtlError::UnresolvedKey {
                row: record.row,
                entity: "rider",
            })?;
        let race_circuit_id = maps.race_circuit_id(record).ok_or(EtlError::UnresolvedKey {
            row: record.row,
            entity: "race_circuit",
        })?;

        match uow.find_result(rider_id, race_circuit_id).await? {
            Some(existing) if existing.matches(record.position, record.points) => {},
            Some(existing) => {
                uow.update_result(existing.id, record.position, record.points)
                    .await?;
                stats.results_updated += 1;
                debug!(
                    result_id = %existing.id,
                    position = ?record.position,
                    points = ?record.points,
                    "Updated result"
                );
            },
            None => {
                uow.insert_result(rider_id, race_circuit_id, record.position, record.points)
                    .await?;
                stats.results_created += 1;
            },
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::resolve::resolve_entities;
    use crate::store::{MemoryStore, ResultsStore};

    fn record(position: Option<i32>, points: Option<f64>) -> ResultRecord {
        ResultRecord {
            row: 0,
            rider_name: "Martin".to_string(),
            rider_surname: "Jorge".to_string(),
            nationality: None,
            birth_date: None,
            career_status: None,
            season_year: 2024,
            category: "MotoGP".to_string(),
            circuit: "Assen".to_string(),
            date: None,
            position,
            points,
        }
    }

    #[tokio::test]
    async fn test_unresolved_record_is_an_invariant_violation() {
        let store = MemoryStore::new();
        let mut uow = store.begin().await.unwrap();
        let unresolved = ResultRecord {
            row: 7,
            ..record(Some(1), Some(25.0))
        };
        let err = merge_results(
            uow.as_mut(),
            &[unresolved],
            &IdentityMaps::default(),
            &mut LoadStats::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, EtlError::UnresolvedKey { row: 7, entity: "rider" }));
    }

    #[tokio::test]
    async fn test_absent_values_compare_equal() {
        let store = MemoryStore::new();
        let mut uow = store.begin().await.unwrap();
        let records = [record(None, None)];
        let mut stats = LoadStats::default();
        let maps = resolve_entities(uow.as_mut(), &records, &mut stats).await.unwrap();

        merge_results(uow.as_mut(), &records, &maps, &mut stats).await.unwrap();
        merge_results(uow.as_mut(), &records, &maps, &mut stats).await.unwrap();

        assert_eq!(stats.results_created, 1);
        assert_eq!(stats.results_updated, 0);
    }

    #[tokio::test]
    async fn test_changed_points_overwrite_both_fields() {
        let store = MemoryStore::new();
        let mut uow = store.begin().await.unwrap();
        let first = [record(Some(2), Some(20.0))];
        let second = [record(None, Some(0.0))];
        let mut stats = LoadStats::default();
        let maps = resolve_entities(uow.as_mut(), &first, &mut stats).await.unwrap();

        merge_results(uow.as_mut(), &first, &maps, &mut stats).await.unwrap();
        merge_results(uow.as_mut(), &second, &maps, &mut stats).await.unwrap();
        uow.commit().await.unwrap();

        assert_eq!(stats.results_updated, 1);
        let results = store.results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].position, None);
        assert_eq!(results[0].points, Some(0.0));
    }
}
