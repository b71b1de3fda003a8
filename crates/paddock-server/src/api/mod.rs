pub mod response;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use serde_json::json;
use sqlx::PgPool;
use tower_http::compression::CompressionLayer;

use crate::config::CorsConfig;
use crate::error::{AppError, AppResult};
use crate::{features, middleware};
use response::ApiResponse;

/// Build the application router with all routes and middleware
pub fn router(pool: PgPool, cors: &CorsConfig) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .with_state(pool.clone())
        .nest("/api/v1", features::router(pool))
        .fallback(not_found)
        // Apply layers from innermost to outermost
        .layer(CompressionLayer::new())
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(cors))
}

/// `GET /health` - reports database connectivity
async fn health_check(State(pool): State<PgPool>) -> AppResult<impl IntoResponse> {
    match paddock_common::db::health_check(&pool).await {
        Ok(()) => Ok(ApiResponse::success(json!({
            "status": "healthy",
            "database": "connected"
        }))),
        Err(e) => {
            tracing::error!(error = %e, "Database health check failed");
            Err(AppError::Unavailable("Database unreachable".to_string()))
        },
    }
}

async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}
