//! PostgreSQL store tests
//!
//! Run with a database available:
//! `DATABASE_URL=postgresql://... cargo test -p paddock-etl --test postgres_store -- --ignored`

use paddock_etl::record::{RaceKey, RiderKey, SeasonKey};
use paddock_etl::store::{NewRider, StoreError};
use paddock_etl::{
    normalize_table, EtlError, LoadOrchestrator, PgStore, RawRecord, RawTable, ResultsStore,
    UnitOfWork,
};
use sqlx::PgPool;

fn mugello(position: &str) -> RawTable {
    let row: RawRecord = [
        ("Rider Name", "Bagnaia"),
        ("Rider Surname", "Francesco"),
        ("Nationality", "ITA"),
        ("Season Year", "2024"),
        ("Category", "MotoGP"),
        ("Circuit", "Mugello"),
        ("Date", ""),
        ("Position", position),
        ("Points", "25"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    RawTable::from_records(vec![row])
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore] // Requires database
async fn test_load_is_idempotent(pool: PgPool) -> sqlx::Result<()> {
    let orchestrator = LoadOrchestrator::new(PgStore::new(pool.clone()));
    let batch = normalize_table(&mugello("1"));

    let first = orchestrator.load(&batch).await.unwrap();
    assert_eq!(first.created(), 4);

    let second = orchestrator.load(&batch).await.unwrap();
    assert!(second.is_noop());

    let results: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM results_race")
        .fetch_one(&pool)
        .await?;
    let races: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM race_circuits")
        .fetch_one(&pool)
        .await?;
    assert_eq!(results, 1);
    assert_eq!(races, 1);
    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore] // Requires database
async fn test_changed_position_is_updated(pool: PgPool) -> sqlx::Result<()> {
    let orchestrator = LoadOrchestrator::new(PgStore::new(pool.clone()));
    orchestrator.load(&normalize_table(&mugello("1"))).await.unwrap();

    let stats = orchestrator.load(&normalize_table(&mugello("2"))).await.unwrap();
    assert_eq!(stats.results_updated, 1);
    assert_eq!(stats.results_created, 0);

    let position: Option<i32> = sqlx::query_scalar("SELECT position FROM results_race")
        .fetch_one(&pool)
        .await?;
    assert_eq!(position, Some(2));
    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore] // Requires database
async fn test_rollback_discards_writes(pool: PgPool) -> sqlx::Result<()> {
    let store = PgStore::new(pool.clone());
    let mut uow = store.begin().await.unwrap();
    uow.insert_season(&SeasonKey {
        year: 2024,
        category: "MotoGP".to_string(),
    })
    .await
    .unwrap();
    uow.rollback().await.unwrap();

    let seasons: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM seasons")
        .fetch_one(&pool)
        .await?;
    assert_eq!(seasons, 0);
    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore] // Requires database
async fn test_duplicate_rider_is_a_conflict(pool: PgPool) -> sqlx::Result<()> {
    let store = PgStore::new(pool);
    let rider = NewRider {
        key: RiderKey {
            name: "Martin".to_string(),
            surname: "Jorge".to_string(),
        },
        nationality: Some("ESP".to_string()),
        birth_date: None,
        career_status: None,
    };

    let mut uow = store.begin().await.unwrap();
    uow.insert_rider(&rider).await.unwrap();
    let err = uow.insert_rider(&rider).await.unwrap_err();

    assert!(matches!(err, StoreError::Conflict { entity: "rider", .. }));
    assert!(matches!(EtlError::from(err), EtlError::PersistenceConflict { .. }));
    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore] // Requires database
async fn test_undated_race_lookup_matches_null(pool: PgPool) -> sqlx::Result<()> {
    let store = PgStore::new(pool);
    let mut uow = store.begin().await.unwrap();
    let season_id = uow
        .insert_season(&SeasonKey {
            year: 2023,
            category: "Moto2".to_string(),
        })
        .await
        .unwrap();
    let key = RaceKey {
        season_id,
        circuit: "Jerez".to_string(),
        date: None,
    };

    let id = uow.insert_race_circuit(&key).await.unwrap();
    assert_eq!(uow.find_race_circuit(&key).await.unwrap(), Some(id));
    assert!(matches!(
        uow.insert_race_circuit(&key).await,
        Err(StoreError::Conflict { .. })
    ));
    Ok(())
}
