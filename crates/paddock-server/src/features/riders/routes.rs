//! Rider API routes
//!
//! - `GET /api/v1/riders` - List riders with pagination and filters
//! - `GET /api/v1/riders/:id` - Get a single rider
//! - `GET /api/v1/riders/:id/stats` - Career totals for a rider

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

use super::queries::{
    GetRiderError, GetRiderQuery, GetRiderStatsError, GetRiderStatsQuery, ListRidersError,
    ListRidersQuery,
};
use crate::api::response::ApiResponse;
use crate::error::{AppError, AppResult};

pub fn riders_routes() -> Router<PgPool> {
    Router::new()
        .route("/", get(list_riders))
        .route("/:id", get(get_rider))
        .route("/:id/stats", get(get_rider_stats))
}

/// `GET /api/v1/riders?page=1&per_page=20&nationality=ITA&name_contains=marc`
#[tracing::instrument(skip(pool, query))]
async fn list_riders(
    State(pool): State<PgPool>,
    query: Result<Query<ListRidersQuery>, QueryRejection>,
) -> AppResult<Response> {
    let Query(query) = query?;
    let page = super::queries::list::handle(pool, query).await?;

    tracing::debug!(
        count = page.items.len(),
        total = page.pagination.total,
        "Riders listed via API"
    );

    Ok(ApiResponse::paginated(page).into_response())
}

#[tracing::instrument(skip(pool, id))]
async fn get_rider(
    State(pool): State<PgPool>,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<Response> {
    let Path(id) = id?;
    let rider = super::queries::get::handle(pool, GetRiderQuery { id }).await?;
    Ok(ApiResponse::success(rider).into_response())
}

#[tracing::instrument(skip(pool, id))]
async fn get_rider_stats(
    State(pool): State<PgPool>,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<Response> {
    let Path(id) = id?;
    let stats = super::queries::stats::handle(pool, GetRiderStatsQuery { id }).await?;
    Ok(ApiResponse::success(stats).into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

impl From<ListRidersError> for AppError {
    fn from(err: ListRidersError) -> Self {
        match err {
            ListRidersError::Pagination(e) => AppError::Validation(e.to_string()),
            ListRidersError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<GetRiderError> for AppError {
    fn from(err: GetRiderError) -> Self {
        match err {
            GetRiderError::InvalidId => AppError::Validation(err.to_string()),
            GetRiderError::NotFound(_) => AppError::NotFound(err.to_string()),
            GetRiderError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<GetRiderStatsError> for AppError {
    fn from(err: GetRiderStatsError) -> Self {
        match err {
            GetRiderStatsError::InvalidId => AppError::Validation(err.to_string()),
            GetRiderStatsError::NotFound(_) => AppError::NotFound(err.to_string()),
            GetRiderStatsError::Database(e) => AppError::Database(e),
        }
    }
}
