//! Paddock Server Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Read-only HTTP API over the riders, seasons, races and results loaded
//! by `paddock-etl`.
//!
//! # Overview
//!
//! - **API Endpoints**: `/health` and the `/api/v1` feature routes
//! - **Configuration**: environment-based, see [`config::Config`]
//! - **Middleware**: CORS and request tracing
//!
//! # Architecture
//!
//! Every feature is a vertical slice under [`features`]: a `queries/`
//! directory with one module per read operation (query struct, error enum,
//! `handle` function) and a `routes.rs` that maps HTTP requests onto those
//! queries and query errors onto status codes.
//!
//! # Example
//!
//! ```no_run
//! use paddock_common::db::{create_pool, run_migrations};
//! use paddock_server::{api, config::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let pool = create_pool(&config.database).await?;
//!     run_migrations(&pool).await?;
//!
//!     let app = api::router(pool, &config.cors);
//!     let listener = tokio::net::TcpListener::bind(config.server.bind_address()).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod features;
pub mod middleware;

// Re-export commonly used types
pub use error::{AppError, AppResult};
