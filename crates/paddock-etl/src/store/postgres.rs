//! PostgreSQL store
//!
//! Each unit of work is one sqlx transaction. Identity lookups on nullable
//! columns use `IS NOT DISTINCT FROM` so a missing race date matches a
//! missing race date, mirroring the `NULLS NOT DISTINCT` constraint.

use async_trait::async_trait;
use paddock_common::types::{RaceCircuitId, RaceResult, RaceResultId, Rider, RiderId, SeasonId};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;

use super::{NewRider, ResultsStore, StoreError, StoreResult, UnitOfWork};
use crate::record::{RaceKey, RiderKey, SeasonKey};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ResultsStore for PgStore {
    async fn begin(&self) -> StoreResult<Box<dyn UnitOfWork>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }
}

pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    #[tracing::instrument(skip(self), fields(rider = %key))]
    async fn find_rider(&mut self, key: &RiderKey) -> StoreResult<Option<Rider>> {
        let rider = sqlx::query_as::<_, Rider>(
            r#"
            SELECT id, name, surname, nationality, birth_date, career_status
            FROM riders
            WHERE name = $1 AND surname = $2
            "#,
        )
        .bind(&key.name)
        .bind(&key.surname)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(rider)
    }

    #[tracing::instrument(skip(self, rider), fields(rider = %rider.key))]
    async fn insert_rider(&mut self, rider: &NewRider) -> StoreResult<RiderId> {
        let id = sqlx::query_scalar::<_, RiderId>(
            r#"
            INSERT INTO riders (name, surname, nationality, birth_date, career_status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&rider.key.name)
        .bind(&rider.key.surname)
        .bind(&rider.nationality)
        .bind(rider.birth_date)
        .bind(&rider.career_status)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| StoreError::from_insert(e, "rider", &rider.key))?;

        debug!(rider_id = %id, "Inserted rider");
        Ok(id)
    }

    #[tracing::instrument(skip(self))]
    async fn update_rider_nationality(
        &mut self,
        id: RiderId,
        nationality: &str,
    ) -> StoreResult<()> {
        sqlx::query("UPDATE riders SET nationality = $2 WHERE id = $1")
            .bind(id)
            .bind(nationality)
            .execute(&mut *self.tx)
            .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(season = %key))]
    async fn find_season(&mut self, key: &SeasonKey) -> StoreResult<Option<SeasonId>> {
        let id = sqlx::query_scalar::<_, SeasonId>(
            "SELECT id FROM seasons WHERE year = $1 AND category = $2",
        )
        .bind(key.year)
        .bind(&key.category)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(id)
    }

    #[tracing::instrument(skip(self), fields(season = %key))]
    async fn insert_season(&mut self, key: &SeasonKey) -> StoreResult<SeasonId> {
        let id = sqlx::query_scalar::<_, SeasonId>(
            "INSERT INTO seasons (year, category) VALUES ($1, $2) RETURNING id",
        )
        .bind(key.year)
        .bind(&key.category)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| StoreError::from_insert(e, "season", key))?;

        debug!(season_id = %id, "Inserted season");
        Ok(id)
    }

    #[tracing::instrument(skip(self), fields(race = %key))]
    async fn find_race_circuit(&mut self, key: &RaceKey) -> StoreResult<Option<RaceCircuitId>> {
        let id = sqlx::query_scalar::<_, RaceCircuitId>(
            r#"
            SELECT id FROM race_circuits
            WHERE season_id = $1 AND circuit = $2 AND date IS NOT DISTINCT FROM $3
            "#,
        )
        .bind(key.season_id)
        .bind(&key.circuit)
        .bind(key.date)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(id)
    }

    #[tracing::instrument(skip(self), fields(race = %key))]
    async fn insert_race_circuit(&mut self, key: &RaceKey) -> StoreResult<RaceCircuitId> {
        let id = sqlx::query_scalar::<_, RaceCircuitId>(
            r#"
            INSERT INTO race_circuits (season_id, circuit, date)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(key.season_id)
        .bind(&key.circuit)
        .bind(key.date)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| StoreError::from_insert(e, "race_circuit", key))?;

        debug!(race_circuit_id = %id, "Inserted race circuit");
        Ok(id)
    }

    #[tracing::instrument(skip(self))]
    async fn find_result(
        &mut self,
        rider_id: RiderId,
        race_circuit_id: RaceCircuitId,
    ) -> StoreResult<Option<RaceResult>> {
        let result = sqlx::query_as::<_, RaceResult>(
            r#"
            SELECT id, rider_id, race_circuit_id, position, points
            FROM results_race
            WHERE rider_id = $1 AND race_circuit_id = $2
            "#,
        )
        .bind(rider_id)
        .bind(race_circuit_id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(result)
    }

    #[tracing::instrument(skip(self))]
    async fn insert_result(
        &mut self,
        rider_id: RiderId,
        race_circuit_id: RaceCircuitId,
        position: Option<i32>,
        points: Option<f64>,
    ) -> StoreResult<RaceResultId> {
        let id = sqlx::query_scalar::<_, RaceResultId>(
            r#"
            INSERT INTO results_race (rider_id, race_circuit_id, position, points)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(rider_id)
        .bind(race_circuit_id)
        .bind(position)
        .bind(points)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| {
            StoreError::from_insert(e, "result", format!("({}, {})", rider_id, race_circuit_id))
        })?;

        Ok(id)
    }

    #[tracing::instrument(skip(self))]
    async fn update_result(
        &mut self,
        id: RaceResultId,
        position: Option<i32>,
        points: Option<f64>,
    ) -> StoreResult<()> {
        sqlx::query("UPDATE results_race SET position = $2, points = $3 WHERE id = $1")
            .bind(id)
            .bind(position)
            .bind(points)
            .execute(&mut *self.tx)
            .await?;

        Ok(())
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> StoreResult<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}
