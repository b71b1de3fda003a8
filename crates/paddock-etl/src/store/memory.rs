//! In-memory store
//!
//! `begin` copies the committed tables into the unit of work; `commit`
//! swaps the copy back in. A commit whose snapshot is older than the last
//! commit is refused, so two overlapping units of work cannot overwrite each
//! other's writes.

use async_trait::async_trait;
use paddock_common::types::{
    RaceCircuit, RaceCircuitId, RaceResult, RaceResultId, Rider, RiderId, Season, SeasonId,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{NewRider, ResultsStore, StoreError, StoreResult, UnitOfWork};
use crate::record::{RaceKey, RiderKey, SeasonKey};

#[derive(Debug, Clone, Default)]
struct Tables {
    riders: Vec<Rider>,
    seasons: Vec<Season>,
    race_circuits: Vec<RaceCircuit>,
    results: Vec<RaceResult>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Debug, Default)]
struct Shared {
    tables: Tables,
    generation: u64,
    commits: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    shared: Arc<Mutex<Shared>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of units of work committed so far
    pub fn commit_count(&self) -> usize {
        self.lock().commits
    }

    pub fn riders(&self) -> Vec<Rider> {
        self.lock().tables.riders.clone()
    }

    pub fn seasons(&self) -> Vec<Season> {
        self.lock().tables.seasons.clone()
    }

    pub fn race_circuits(&self) -> Vec<RaceCircuit> {
        self.lock().tables.race_circuits.clone()
    }

    pub fn results(&self) -> Vec<RaceResult> {
        self.lock().tables.results.clone()
    }
}

#[async_trait]
impl ResultsStore for MemoryStore {
    async fn begin(&self) -> StoreResult<Box<dyn UnitOfWork>> {
        let (generation, tables) = {
            let shared = self.lock();
            (shared.generation, shared.tables.clone())
        };
        Ok(Box::new(MemoryUnitOfWork {
            store: self.clone(),
            generation,
            tables,
        }))
    }
}

pub struct MemoryUnitOfWork {
    store: MemoryStore,
    generation: u64,
    tables: Tables,
}

fn conflict(entity: &'static str, key: impl ToString) -> StoreError {
    StoreError::Conflict {
        entity,
        key: key.to_string(),
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn find_rider(&mut self, key: &RiderKey) -> StoreResult<Option<Rider>> {
        Ok(self
            .tables
            .riders
            .iter()
            .find(|r| r.name == key.name && r.surname == key.surname)
            .cloned())
    }

    async fn insert_rider(&mut self, rider: &NewRider) -> StoreResult<RiderId> {
        if self.find_rider(&rider.key).await?.is_some() {
            return Err(conflict("rider", &rider.key));
        }
        let id = RiderId(self.tables.next_id());
        self.tables.riders.push(Rider {
            id,
            name: rider.key.name.clone(),
            surname: rider.key.surname.clone(),
            nationality: rider.nationality.clone(),
            birth_date: rider.birth_date,
            career_status: rider.career_status.clone(),
        });
        Ok(id)
    }

    async fn update_rider_nationality(
        &mut self,
        id: RiderId,
        nationality: &str,
    ) -> StoreResult<()> {
        if let Some(rider) = self.tables.riders.iter_mut().find(|r| r.id == id) {
            rider.nationality = Some(nationality.to_string());
        }
        Ok(())
    }

    async fn find_season(&mut self, key: &SeasonKey) -> StoreResult<Option<SeasonId>> {
        Ok(self
            .tables
            .seasons
            .iter()
            .find(|s| s.year == key.year && s.category == key.category)
            .map(|s| s.id))
    }

    async fn insert_season(&mut self, key: &SeasonKey) -> StoreResult<SeasonId> {
        if self.find_season(key).await?.is_some() {
            return Err(conflict("season", key));
        }
        let id = SeasonId(self.tables.next_id());
        self.tables.seasons.push(Season {
            id,
            year: key.year,
            category: key.category.clone(),
        });
        Ok(id)
    }

    async fn find_race_circuit(&mut self, key: &RaceKey) -> StoreResult<Option<RaceCircuitId>> {
        Ok(self
            .tables
            .race_circuits
            .iter()
            .find(|r| r.season_id == key.season_id && r.circuit == key.circuit && r.date == key.date)
            .map(|r| r.id))
    }

    async fn insert_race_circuit(&mut self, key: &RaceKey) -> StoreResult<RaceCircuitId> {
        if self.find_race_circuit(key).await?.is_some() {
            return Err(conflict("race_circuit", key));
        }
        let id = RaceCircuitId(self.tables.next_id());
        self.tables.race_circuits.push(RaceCircuit {
            id,
            season_id: key.season_id,
            circuit: key.circuit.clone(),
            date: key.date,
        });
        Ok(id)
    }

    async fn find_result(
        &mut self,
        rider_id: RiderId,
        race_circuit_id: RaceCircuitId,
    ) -> StoreResult<Option<RaceResult>> {
        Ok(self
            .tables
            .results
            .iter()
            .find(|r| r.rider_id == rider_id && r.race_circuit_id == race_circuit_id)
            .cloned())
    }

    async fn insert_result(
        &mut self,
        rider_id: RiderId,
        race_circuit_id: RaceCircuitId,
        position: Option<i32>,
        points: Option<f64>,
    ) -> StoreResult<RaceResultId> {
        if self.find_result(rider_id, race_circuit_id).await?.is_some() {
            return Err(conflict("result", format!("({}, {})", rider_id, race_circuit_id)));
        }
        let id = RaceResultId(self.tables.next_id());
        self.tables.results.push(RaceResult {
            id,
            rider_id,
            race_circuit_id,
            position,
            points,
        });
        Ok(id)
    }

    async fn update_result(
        &mut self,
        id: RaceResultId,
        position: Option<i32>,
        points: Option<f64>,
    ) -> StoreResult<()> {
        if let Some(result) = self.tables.results.iter_mut().find(|r| r.id == id) {
            result.position = position;
            result.points = points;
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let MemoryUnitOfWork {
            store,
            generation,
            tables,
        } = *self;
        {
            let mut shared = store.lock();
            if shared.generation != generation {
                return Err(conflict("unit_of_work", "snapshot is stale"));
            }
            shared.tables = tables;
            shared.generation += 1;
            shared.commits += 1;
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> StoreResult<()> {
        Ok(())
    }
}
