//! Race API routes
//!
//! - `GET /api/v1/races` - List races with pagination, `year` and `category` filters
//! - `GET /api/v1/races/:id/results` - Classification of one race

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use sqlx::PgPool;

use super::queries::{GetRaceResultsError, GetRaceResultsQuery, ListRacesError, ListRacesQuery};
use crate::api::response::ApiResponse;
use crate::error::{AppError, AppResult};

pub fn races_routes() -> Router<PgPool> {
    Router::new()
        .route("/", get(list_races))
        .route("/:id/results", get(get_race_results))
}

/// `GET /api/v1/races?year=2024&category=MotoGP&page=1&per_page=20`
#[tracing::instrument(skip(pool, query))]
async fn list_races(
    State(pool): State<PgPool>,
    query: Result<Query<ListRacesQuery>, QueryRejection>,
) -> AppResult<Response> {
    let Query(query) = query?;
    let page = super::queries::list::handle(pool, query).await?;

    tracing::debug!(
        count = page.items.len(),
        total = page.pagination.total,
        "Races listed via API"
    );

    Ok(ApiResponse::paginated(page).into_response())
}

#[tracing::instrument(skip(pool, id))]
async fn get_race_results(
    State(pool): State<PgPool>,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<Response> {
    let Path(race_id) = id?;
    let response = super::queries::results::handle(pool, GetRaceResultsQuery { race_id }).await?;
    Ok(ApiResponse::success(response).into_response())
}

impl From<ListRacesError> for AppError {
    fn from(err: ListRacesError) -> Self {
        match err {
            ListRacesError::Pagination(_) | ListRacesError::InvalidYear => {
                AppError::Validation(err.to_string())
            },
            ListRacesError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<GetRaceResultsError> for AppError {
    fn from(err: GetRaceResultsError) -> Self {
        match err {
            GetRaceResultsError::InvalidId => AppError::Validation(err.to_string()),
            GetRaceResultsError::NotFound(_) => AppError::NotFound(err.to_string()),
            GetRaceResultsError::Database(e) => AppError::Database(e),
        }
    }
}
