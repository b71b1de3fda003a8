//! Classification of one race
//!
//! Results are ordered by position with unclassified entries (no position)
//! last, then by points and rider surname.

use paddock_common::types::{RaceCircuitId, RaceResultId, RiderId};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use super::list::RaceListItem;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GetRaceResultsQuery {
    pub race_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct RaceResultItem {
    pub result_id: RaceResultId,
    pub rider_id: RiderId,
    pub name: String,
    pub surname: String,
    pub nationality: Option<String>,
    pub position: Option<i32>,
    pub points: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceResultsResponse {
    pub race: RaceListItem,
    pub results: Vec<RaceResultItem>,
}

#[derive(Debug, thiserror::Error)]
pub enum GetRaceResultsError {
    #[error("Race id must be positive")]
    InvalidId,
    #[error("Race {0} not found")]
    NotFound(i64),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl GetRaceResultsQuery {
    pub fn validate(&self) -> Result<(), GetRaceResultsError> {
        if self.race_id < 1 {
            return Err(GetRaceResultsError::InvalidId);
        }
        Ok(())
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: GetRaceResultsQuery,
) -> Result<RaceResultsResponse, GetRaceResultsError> {
    query.validate()?;

    let race_id = RaceCircuitId(query.race_id);

    let race = sqlx::query_as::<_, RaceListItem>(
        r#"
        SELECT rc.id, rc.season_id, s.year, s.category, rc.circuit, rc.date
        FROM race_circuits rc
        JOIN seasons s ON s.id = rc.season_id
        WHERE rc.id = $1
        "#,
    )
    .bind(race_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(GetRaceResultsError::NotFound(query.race_id))?;

    let results = sqlx::query_as::<_, RaceResultItem>(
        r#"
        SELECT r.id AS result_id, r.rider_id, rd.name, rd.surname, rd.nationality,
               r.position, r.points
        FROM results_race r
        JOIN riders rd ON rd.id = r.rider_id
        WHERE r.race_circuit_id = $1
        ORDER BY r.position ASC NULLS LAST, r.points DESC NULLS LAST, rd.surname, rd.name
        "#,
    )
    .bind(race_id)
    .fetch_all(&pool)
    .await?;

    tracing::debug!(race_id = %race_id, results = results.len(), "Loaded race results");

    Ok(RaceResultsResponse { race, results })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validation() {
        assert!(GetRaceResultsQuery { race_id: 5 }.validate().is_ok());
        assert!(matches!(
            GetRaceResultsQuery { race_id: 0 }.validate(),
            Err(GetRaceResultsError::InvalidId)
        ));
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore] // Requires database
    async fn test_handle_orders_unclassified_last(pool: PgPool) -> sqlx::Result<()> {
        let race_id: i64 = sqlx::query_scalar(
            r#"
            WITH s AS (
                INSERT INTO seasons (year, category) VALUES (2024, 'MotoGP') RETURNING id
            )
            INSERT INTO race_circuits (season_id, circuit, date)
            SELECT id, 'Sachsenring', DATE '2024-07-07' FROM s
            RETURNING id
            "#,
        )
        .fetch_one(&pool)
        .await?;

        sqlx::query(
            r#"
            WITH rd AS (
                INSERT INTO riders (name, surname)
                VALUES ('Marc', 'Marquez'), ('Jorge', 'Martin'), ('Francesco', 'Bagnaia')
                RETURNING id, surname
            )
            INSERT INTO results_race (rider_id, race_circuit_id, position, points)
            SELECT rd.id, $1,
                   CASE rd.surname WHEN 'Bagnaia' THEN 1 WHEN 'Marquez' THEN 2 END,
                   CASE rd.surname WHEN 'Bagnaia' THEN 25.0 WHEN 'Marquez' THEN 20.0 END
            FROM rd
            "#,
        )
        .bind(race_id)
        .execute(&pool)
        .await?;

        let response = handle(pool, GetRaceResultsQuery { race_id }).await.unwrap();
        assert_eq!(response.race.circuit, "Sachsenring");
        assert_eq!(response.race.year, 2024);

        let order: Vec<_> = response
            .results
            .iter()
            .map(|r| (r.surname.as_str(), r.position))
            .collect();
        assert_eq!(
            order,
            vec![("Bagnaia", Some(1)), ("Marquez", Some(2)), ("Martin", None)]
        );
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore] // Requires database
    async fn test_handle_unknown_race(pool: PgPool) -> sqlx::Result<()> {
        let result = handle(pool, GetRaceResultsQuery { race_id: 42 }).await;
        assert!(matches!(result, Err(GetRaceResultsError::NotFound(42))));
        Ok(())
    }
}
