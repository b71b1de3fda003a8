//! Persistent store abstraction
//!
//! The loader only talks to a [`ResultsStore`] through one [`UnitOfWork`]
//! per batch. Backends:
//!
//! - [`PgStore`]: one PostgreSQL transaction per unit of work
//! - [`MemoryStore`]: an in-process snapshot store, backs the pipeline tests
//!
//! Both enforce uniqueness of every identity key and report a violation as
//! [`StoreError::Conflict`]. A unit of work that is dropped without
//! [`UnitOfWork::commit`] leaves the store unchanged.

use async_trait::async_trait;
use chrono::NaiveDate;
use paddock_common::types::{RaceCircuitId, RaceResult, RaceResultId, Rider, RiderId, SeasonId};
use thiserror::Error;

use crate::record::{RaceKey, RiderKey, SeasonKey};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    /// An identity key already exists
    #[error("{entity} {key} already exists")]
    Conflict { entity: &'static str, key: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Classify a sqlx error, turning unique violations into [`StoreError::Conflict`]
    pub fn from_insert(err: sqlx::Error, entity: &'static str, key: impl ToString) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => StoreError::Conflict {
                entity,
                key: key.to_string(),
            },
            _ => StoreError::Database(err),
        }
    }
}

/// Attributes of a rider seen for the first time
#[derive(Debug, Clone, PartialEq)]
pub struct NewRider {
    pub key: RiderKey,
    pub nationality: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub career_status: Option<String>,
}

/// A store that can open units of work
#[async_trait]
pub trait ResultsStore: Send + Sync {
    async fn begin(&self) -> StoreResult<Box<dyn UnitOfWork>>;
}

/// One atomic sequence of reads and writes
#[async_trait]
pub trait UnitOfWork: Send {
    async fn find_rider(&mut self, key: &RiderKey) -> StoreResult<Option<Rider>>;

    async fn insert_rider(&mut self, rider: &NewRider) -> StoreResult<RiderId>;

    async fn update_rider_nationality(&mut self, id: RiderId, nationality: &str)
        -> StoreResult<()>;

    async fn find_season(&mut self, key: &SeasonKey) -> StoreResult<Option<SeasonId>>;

    async fn insert_season(&mut self, key: &SeasonKey) -> StoreResult<SeasonId>;

    async fn find_race_circuit(&mut self, key: &RaceKey) -> StoreResult<Option<RaceCircuitId>>;

    async fn insert_race_circuit(&mut self, key: &RaceKey) -> StoreResult<RaceCircuitId>;

    async fn find_result(
        &mut self,
        rider_id: RiderId,
        race_circuit_id: RaceCircuitId,
    ) -> StoreResult<Option<RaceResult>>;

    async fn insert_result(
        &mut self,
        rider_id: RiderId,
        race_circuit_id: RaceCircuitId,
        position: Option<i32>,
        points: Option<f64>,
    ) -> StoreResult<RaceResultId>;

    async fn update_result(
        &mut self,
        id: RaceResultId,
        position: Option<i32>,
        points: Option<f64>,
    ) -> StoreResult<()>;

    /// Make every write of this unit of work durable
    async fn commit(self: Box<Self>) -> StoreResult<()>;

    /// Discard every write of this unit of work
    async fn rollback(self: Box<Self>) -> StoreResult<()>;
}
