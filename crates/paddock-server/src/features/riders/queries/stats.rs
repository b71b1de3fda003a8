//! Career totals for one rider, aggregated over `results_race`

use paddock_common::types::{Rider, RiderId};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use super::get::fetch_rider;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GetRiderStatsQuery {
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct RiderTotals {
    /// Results on record, classified or not
    pub total_races: i64,
    /// Sum of points; absent points count as zero
    pub total_points: f64,
    /// Lowest classified position, absent when never classified
    pub best_position: Option<i32>,
    pub wins: i64,
    pub podiums: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiderStatsResponse {
    pub rider: Rider,
    #[serde(flatten)]
    pub totals: RiderTotals,
}

#[derive(Debug, thiserror::Error)]
pub enum GetRiderStatsError {
    #[error("Rider id must be positive")]
    InvalidId,
    #[error("Rider {0} not found")]
    NotFound(i64),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl GetRiderStatsQuery {
    pub fn validate(&self) -> Result<(), GetRiderStatsError> {
        if self.id < 1 {
            return Err(GetRiderStatsError::InvalidId);
        }
        Ok(())
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: GetRiderStatsQuery,
) -> Result<RiderStatsResponse, GetRiderStatsError> {
    query.validate()?;

    let rider = fetch_rider(&pool, RiderId(query.id))
        .await?
        .ok_or(GetRiderStatsError::NotFound(query.id))?;

    let totals = sqlx::query_as::<_, RiderTotals>(
        r#"
        SELECT COUNT(*) AS total_races,
               COALESCE(SUM(points), 0)::DOUBLE PRECISION AS total_points,
               MIN(position) AS best_position,
               COUNT(*) FILTER (WHERE position = 1) AS wins,
               COUNT(*) FILTER (WHERE position BETWEEN 1 AND 3) AS podiums
        FROM results_race
        WHERE rider_id = $1
        "#,
    )
    .bind(rider.id)
    .fetch_one(&pool)
    .await?;

    Ok(RiderStatsResponse { rider, totals })
}
