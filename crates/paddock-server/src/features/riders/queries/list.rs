use paddock_common::types::RiderId;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::features::shared::{Paginated, PaginationError, PaginationParams};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListRidersQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,
    /// Exact nationality code, e.g. `ITA`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    /// Case-insensitive match on "name surname"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_contains: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct RiderListItem {
    pub id: RiderId,
    pub name: String,
    pub surname: String,
    pub nationality: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListRidersError {
    #[error(transparent)]
    Pagination(#[from] PaginationError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ListRidersQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.per_page)
    }

    pub fn validate(&self) -> Result<(), ListRidersError> {
        self.pagination().validate()?;
        Ok(())
    }

    fn name_pattern(&self) -> Option<String> {
        self.name_contains
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s.to_lowercase()))
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: ListRidersQuery,
) -> Result<Paginated<RiderListItem>, ListRidersError> {
    query.validate()?;

    let params = query.pagination();
    let name_pattern = query.name_pattern();

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM riders
        WHERE ($1::TEXT IS NULL OR nationality = $1)
          AND ($2::TEXT IS NULL OR LOWER(name || ' ' || surname) LIKE $2)
        "#,
    )
    .bind(query.nationality.as_deref())
    .bind(name_pattern.as_deref())
    .fetch_one(&pool)
    .await?;

    let items = sqlx::query_as::<_, RiderListItem>(
        r#"
        SELECT id, name, surname, nationality
        FROM riders
        WHERE ($1::TEXT IS NULL OR nationality = $1)
          AND ($2::TEXT IS NULL OR LOWER(name || ' ' || surname) LIKE $2)
        ORDER BY surname, name, id
        LIMIT $3
        OFFSET $4
        "#,
    )
    .bind(query.nationality.as_deref())
    .bind(name_pattern.as_deref())
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
    fn test_validation_success() {
        let query = ListRidersQuery {
            page: Some(1),
            per_page: Some(20),
            ..Default::default()
        };
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_page() {
        let query = ListRidersQuery {
            page: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            query.validate(),
            Err(ListRidersError::Pagination(PaginationError::InvalidPage))
        ));
    }

    #[test]
    fn test_blank_name_filter_is_ignored() {
        let query = ListRidersQuery {
            name_contains: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(query.name_pattern(), None);

        let query = ListRidersQuery {
            name_contains: Some(" Marc ".to_string()),
            ..Default::default()
        };
        assert_eq!(query.name_pattern().as_deref(), Some("%marc%"));
    }

    async fn seed(pool: &PgPool) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO riders (name, surname, nationality)
            VALUES ('Francesco', 'Bagnaia', 'ITA'),
                   ('Jorge', 'Martin', 'ESP'),
                   ('Marc', 'Marquez', 'ESP'),
                   ('Enea', 'Bastianini', NULL)
            "#,
        )
        .execute(pool)
        .await?;
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore] // Requires database
    async fn test_handle_lists_riders_by_surname(pool: PgPool) -> sqlx::Result<()> {
        seed(&pool).await?;

        let page = handle(pool, ListRidersQuery::default()).await.unwrap();
        let surnames: Vec<_> = page.items.iter().map(|r| r.surname.as_str()).collect();
        assert_eq!(surnames, vec!["Bagnaia", "Bastianini", "Marquez", "Martin"]);
        assert_eq!(page.pagination.total, 4);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore] // Requires database
    async fn test_handle_filters(pool: PgPool) -> sqlx::Result<()> {
        seed(&pool).await?;

        let query = ListRidersQuery {
            nationality: Some("ESP".to_string()),
            name_contains: Some("marc".to_string()),
            ..Default::default()
        };
        let page = handle(pool, query).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].surname, "Marquez");
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore] // Requires database
    async fn test_handle_pagination(pool: PgPool) -> sqlx::Result<()> {
        seed(&pool).await?;

        let query = ListRidersQuery {
            page: Some(2),
            per_page: Some(3),
            ..Default::default()
        };
        let page = handle(pool, query).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.pagination.pages, 2);
        assert!(page.pagination.has_prev);
        assert!(!page.pagination.has_next);
        Ok(())
    }
}
