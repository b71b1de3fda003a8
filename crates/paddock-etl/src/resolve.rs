//! Entity resolution
//!
//! Maps every identity key of a batch to a stored id, creating entities the
//! store has never seen. Runs riders, then seasons, then races; race keys
//! embed the resolved season id so seasons must be complete first.
//!
//! Each distinct key is looked up at most once per batch, so a key that
//! appears on many rows still yields at most one insert.

use chrono::NaiveDate;
use paddock_common::types::{RaceCircuitId, RiderId, SeasonId};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::error::{EtlError, EtlResult};
use crate::record::{RaceKey, ResultRecord, RiderKey, SeasonKey};
use crate::stats::LoadStats;
use crate::store::{NewRider, UnitOfWork};

/// Identity key -> stored id, scoped to one unit of work
#[derive(Debug, Clone, Default)]
pub struct IdentityMaps {
    pub riders: HashMap<RiderKey, RiderId>,
    pub seasons: HashMap<SeasonKey, SeasonId>,
    pub races: HashMap<RaceKey, RaceCircuitId>,
}

impl IdentityMaps {
    pub fn rider_id(&self, record: &ResultRecord) -> Option<RiderId> {
        self.riders.get(&record.rider_key()).copied()
    }

    pub fn race_circuit_id(&self, record: &ResultRecord) -> Option<RaceCircuitId> {
        let season_id = self.seasons.get(&record.season_key())?;
        self.races.get(&record.race_key(*season_id)).copied()
    }
}

/// Rider attributes gathered across every row of the batch that names the rider
struct RiderDraft {
    key: RiderKey,
    /// Last supplied value wins
    nationality: Option<String>,
    /// First supplied value wins; only used when creating
    birth_date: Option<NaiveDate>,
    career_status: Option<String>,
}

/// Resolve every identity key of `records`, creating missing entities
pub async fn resolve_entities(
    uow: &mut dyn UnitOfWork,
    records: &[ResultRecord],
    stats: &mut LoadStats,
) -> EtlResult<IdentityMaps> {
    let mut maps = IdentityMaps::default();

    resolve_riders(uow, records, &mut maps, stats).await?;
    resolve_seasons(uow, records, &mut maps, stats).await?;
    resolve_races(uow, records, &mut maps, stats).await?;

    info!(
        riders = maps.riders.len(),
        seasons = maps.seasons.len(),
        races = maps.races.len(),
        "Resolved batch identities"
    );

    Ok(maps)
}

fn rider_drafts(records: &[ResultRecord]) -> Vec<RiderDraft> {
    let mut drafts: Vec<RiderDraft> = Vec::new();
    let mut index: HashMap<RiderKey, usize> = HashMap::new();

    for record in records {
        let key = record.rider_key();
        match index.get(&key) {
            Some(&i) => {
                let draft = &mut drafts[i];
                if record.nationality.is_some() {
                    draft.nationality = record.nationality.clone();
                }
                draft.birth_date = draft.birth_date.or(record.birth_date);
                if draft.career_status.is_none() {
                    draft.career_status = record.career_status.clone();
                }
            },
            None => {
                index.insert(key.clone(), drafts.len());
                drafts.push(RiderDraft {
                    key,
                    nationality: record.nationality.clone(),
                    birth_date: record.birth_date,
                    career_status: record.career_status.clone(),
                });
            },
        }
    }

    drafts
}

async fn resolve_riders(
    uow: &mut dyn UnitOfWork,
    records: &[ResultRecord],
    maps: &mut IdentityMaps,
    stats: &mut LoadStats,
) -> EtlResult<()> {
    for draft in rider_drafts(records) {
        let id = match uow.find_rider(&draft.key).await? {
            Some(rider) => {
                if let Some(nationality) = &draft.nationality {
                    if rider.nationality.as_deref() != Some(nationality.as_str()) {
                        uow.update_rider_nationality(rider.id, nationality).await?;
                        stats.riders_updated += 1;
                        debug!(
                            rider = %draft.key,
                            from = ?rider.nationality,
                            to = %nationality,
                            "Updated rider nationality"
                        );
                    }
                }
                rider.id
            },
            None => {
                let new_rider = NewRider {
                    key: draft.key.clone(),
                    nationality: draft.nationality,
                    birth_date: draft.birth_date,
                    career_status: draft.career_status,
                };
                let id = uow.insert_rider(&new_rider).await?;
                stats.riders_created += 1;
                debug!(rider = %draft.key, rider_id = %id, "Created rider");
                id
            },
        };
        maps.riders.insert(draft.key, id);
    }
    Ok(())
}

async fn resolve_seasons(
    uow: &mut dyn UnitOfWork,
    records: &[ResultRecord],
    maps: &mut IdentityMaps,
    stats: &mut LoadStats,
) -> EtlResult<()> {
    for record in records {
        let key = record.season_key();
        if maps.seasons.contains_key(&key) {
            continue;
        }
        let id = match uow.find_season(&key).await? {
            Some(id) => id,
            None => {
                let id = uow.insert_season(&key).await?;
                stats.seasons_created += 1;
                debug!(season = %key, season_id = %id, "Created season");
                id
            },
        };
        maps.seasons.insert(key, id);
    }
    Ok(())
}

async fn resolve_races(
    uow: &mut dyn UnitOfWork,
    records: &[ResultRecord],
    maps: &mut IdentityMaps,
    stats: &mut LoadStats,
) -> EtlResult<()> {
    for record in records {
        let season_id = *maps
            .seasons
            .get(&record.season_key())
            .ok_or(EtlError::UnresolvedKey {
                row: record.row,
                entity: "season",
            })?;
        let key = record.race_key(season_id);
        if maps.races.contains_key(&key) {
            continue;
        }
        let id = match uow.find_race_circuit(&key).await? {
            Some(id) => id,
            None => {
                let id = uow.insert_race_circuit(&key).await?;
                stats.races_created += 1;
                debug!(race = %key, race_circuit_id = %id, "Created race circuit");
                id
            },
        };
        maps.races.insert(key, id);
    }
    Ok(())
}
