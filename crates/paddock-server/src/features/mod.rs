//! Feature modules implementing the Paddock API
//!
//! Each feature is a vertical slice:
//! - `queries/` - one module per read operation (query, error, `handle`)
//! - `routes.rs` - HTTP handlers and error-to-status mapping
//!
//! # Features
//!
//! - **riders**: rider list, detail and career totals
//! - **races**: race list and per-race classification

pub mod races;
pub mod riders;
pub mod shared;

use axum::Router;
use sqlx::PgPool;

/// Mount every feature under its path prefix:
/// - `/riders`
/// - `/races`
pub fn router(pool: PgPool) -> Router<()> {
    Router::new()
        .nest("/riders", riders::riders_routes())
        .nest("/races", races::races_routes())
        .with_state(pool)
}
