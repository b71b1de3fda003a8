//! Paddock Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, utilities, and error handling for the Paddock workspace.
//!
//! # Overview
//!
//! - **Error Handling**: [`PaddockError`] and the [`Result`] alias
//! - **Logging**: `tracing` subscriber setup driven by [`logging::LogConfig`]
//! - **Database**: connection pool settings and embedded migrations
//! - **Types**: the persisted motorsport entities and their identifiers
//!
//! # Example
//!
//! ```no_run
//! use paddock_common::db::{create_pool, run_migrations, DbConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = DbConfig::from_env()?;
//!     let pool = create_pool(&config).await?;
//!     run_migrations(&pool).await?;
//!     Ok(())
//! }
//! ```

pub mod db;
pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{PaddockError, Result};
