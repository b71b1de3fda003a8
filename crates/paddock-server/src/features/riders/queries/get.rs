use paddock_common::types::{Rider, RiderId};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GetRiderQuery {
    pub id: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum GetRiderError {
    #[error("Rider id must be positive")]
    InvalidId,
    #[error("Rider {0} not found")]
    NotFound(i64),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl GetRiderQuery {
    pub fn validate(&self) -> Result<(), GetRiderError> {
        if self.id < 1 {
            return Err(GetRiderError::InvalidId);
        }
        Ok(())
    }
}

/// Fetch one rider row, `None` when the id is unknown
pub(crate) async fn fetch_rider(pool: &PgPool, id: RiderId) -> Result<Option<Rider>, sqlx::Error> {
    sqlx::query_as::<_, Rider>(
        r#"
        SELECT id, name, surname, nationality, birth_date, career_status
        FROM riders
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: GetRiderQuery) -> Result<Rider, GetRiderError> {
    query.validate()?;

    fetch_rider(&pool, RiderId(query.id))
        .await?
        .ok_or(GetRiderError::NotFound(query.id))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validation() {
        assert!(GetRiderQuery { id: 1 }.validate().is_ok());
        assert!(matches!(
            GetRiderQuery { id: 0 }.validate(),
            Err(GetRiderError::InvalidId)
        ));
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore] // Requires database
    async fn test_handle_returns_rider(pool: PgPool) -> sqlx::Result<()> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO riders (name, surname, nationality, birth_date, career_status)
            VALUES ('Valentino', 'Rossi', 'ITA', '1979-02-16', 'retired')
            RETURNING id
            "#,
        )
        .fetch_one(&pool)
        .await?;

        let rider = handle(pool, GetRiderQuery { id }).await.unwrap();
        assert_eq!(rider.id, RiderId(id));
        assert_eq!(rider.surname, "Rossi");
        assert_eq!(rider.career_status.as_deref(), Some("retired"));
        assert_eq!(
            rider.birth_date,
            chrono::NaiveDate::from_ymd_opt(1979, 2, 16)
        );
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore] // Requires database
    async fn test_handle_not_found(pool: PgPool) -> sqlx::Result<()> {
        let result = handle(pool, GetRiderQuery { id: 999 }).await;
        assert!(matches!(result, Err(GetRiderError::NotFound(999))));
        Ok(())
    }
}
