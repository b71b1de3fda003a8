use chrono::NaiveDate;
use paddock_common::types::{RaceCircuitId, SeasonId};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::features::shared::{Paginated, PaginationError, PaginationParams};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListRacesQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Case-insensitive, e.g. `motogp`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// A race event with its season
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RaceListItem {
    pub id: RaceCircuitId,
    pub season_id: SeasonId,
    pub year: i32,
    pub category: String,
    pub circuit: String,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListRacesError {
    #[error(transparent)]
    Pagination(#[from] PaginationError),
    #[error("Year must be positive")]
    InvalidYear,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ListRacesQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.per_page)
    }

    pub fn validate(&self) -> Result<(), ListRacesError> {
        self.pagination().validate()?;
        if matches!(self.year, Some(year) if year < 1) {
            return Err(ListRacesError::InvalidYear);
        }
        Ok(())
    }

    fn category(&self) -> Option<&str> {
        self.category.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: ListRacesQuery,
) -> Result<Paginated<RaceListItem>, ListRacesError> {
    query.validate()?;

    let params = query.pagination();

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM race_circuits rc
        JOIN seasons s ON s.id = rc.season_id
        WHERE ($1::INTEGER IS NULL OR s.year = $1)
          AND ($2::TEXT IS NULL OR LOWER(s.category) = LOWER($2))
        "#,
    )
    .bind(query.year)
    .bind(query.category())
    .fetch_one(&pool)
    .await?;

    let items = sqlx::query_as::<_, RaceListItem>(
        r#"
        SELECT rc.id, rc.season_id, s.year, s.category, rc.circuit, rc.date
        FROM race_circuits rc
        JOIN seasons s ON s.id = rc.season_id
        WHERE ($1::INTEGER IS NULL OR s.year = $1)
          AND ($2::TEXT IS NULL OR LOWER(s.category) = LOWER($2))
        ORDER BY s.year DESC, s.category, rc.date ASC NULLS LAST, rc.circuit, rc.id
        LIMIT $3
        OFFSET $4
        "#,
    )
    .bind(query.year)
    .bind(query.category())
    .bind(params.per_page())
    .bind(params.offset())
    .fetch_all(&pool)
    .await?;

    Ok(Paginated::from_items(items, &params, total))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validation() {
        assert!(ListRacesQuery::default().validate().is_ok());
        assert!(matches!(
            ListRacesQuery {
                year: Some(0),
                ..Default::default()
            }
            .validate(),
            Err(ListRacesError::InvalidYear)
        ));
        assert!(matches!(
            ListRacesQuery {
                per_page: Some(500),
                ..Default::default()
            }
            .validate(),
            Err(ListRacesError::Pagination(PaginationError::InvalidPerPage))
        ));
    }

    async fn seed(pool: &PgPool) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            WITH s AS (
                INSERT INTO seasons (year, category)
                VALUES (2023, 'MotoGP'), (2024, 'MotoGP'), (2024, 'Moto2')
                RETURNING id, year, category
            )
            INSERT INTO race_circuits (season_id, circuit, date)
            SELECT s.id, c.circuit, c.date::DATE
            FROM s
            CROSS JOIN (VALUES ('Mugello', '2024-06-02'), ('Assen', NULL)) AS c (circuit, date)
            "#,
        )
        .execute(pool)
        .await?;
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore] // Requires database
    async fn test_handle_lists_races_newest_season_first(pool: PgPool) -> sqlx::Result<()> {
        seed(&pool).await?;

        let page = handle(pool, ListRacesQuery::default()).await.unwrap();
        assert_eq!(page.pagination.total, 6);
        assert_eq!(page.items[0].year, 2024);
        assert_eq!(page.items.last().unwrap().year, 2023);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore] // Requires database
    async fn test_handle_filters_by_year_and_category(pool: PgPool) -> sqlx::Result<()> {
        seed(&pool).await?;

        let query = ListRacesQuery {
            year: Some(2024),
            category: Some("motogp".to_string()),
            ..Default::default()
        };
        let page = handle(pool, query).await.unwrap();
        assert_eq!(page.items.len(), 2);
        assert!(page.items.iter().all(|r| r.category == "MotoGP" && r.year == 2024));
        // Dated races sort before undated ones
        assert_eq!(page.items[0].circuit, "Mugello");
        assert_eq!(page.items[1].date, None);
        Ok(())
    }
}
