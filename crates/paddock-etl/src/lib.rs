//! Paddock ETL Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Loads motorsport results tables into the relational store, idempotently.
//!
//! # Pipeline
//!
//! 1. [`extract`]: source document -> [`RawTable`]s
//! 2. [`normalize`]: canonical columns, absent cells, column-wide numeric coercion
//! 3. [`record`]: typed [`ResultRecord`]s with identity keys
//! 4. [`resolve`]: riders, seasons and races mapped to stored ids
//! 5. [`merge`]: one result per rider per race, rewritten only on change
//! 6. [`orchestrator`]: steps 3 to 5 inside one unit of work per batch
//!
//! Loading the same batch twice leaves the store unchanged and reports
//! zero creations and updates on the second run.
//!
//! # Example
//!
//! ```no_run
//! use paddock_etl::{extract, normalize_table, LoadOrchestrator, NormalizedTable, PgStore};
//! use std::path::Path;
//!
//! # async fn run(pool: sqlx::PgPool) -> anyhow::Result<()> {
//! let tables = extract::extract_tables(Path::new("results/mugello-2024.json"))?;
//! let batch = NormalizedTable::concat(tables.iter().map(normalize_table));
//!
//! let stats = LoadOrchestrator::new(PgStore::new(pool)).load(&batch).await?;
//! println!("{}", stats);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod merge;
pub mod normalize;
pub mod orchestrator;
pub mod preview;
pub mod record;
pub mod resolve;
pub mod stats;
pub mod store;
pub mod table;

pub use config::{EtlConfig, ValidationPolicy};
pub use error::{EtlError, EtlResult, ExtractionError, ValidationError};
pub use normalize::normalize_table;
pub use orchestrator::LoadOrchestrator;
pub use record::ResultRecord;
pub use stats::LoadStats;
pub use store::{MemoryStore, PgStore, ResultsStore, UnitOfWork};
pub use table::{CellValue, NormalizedRecord, NormalizedTable, RawRecord, RawTable};
