//! Persisted motorsport entities
//!
//! Row shapes for the four tables created by the workspace migrations.
//! Identifiers are `BIGSERIAL` keys wrapped in newtypes so a rider id can
//! never be passed where a race id is expected.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
        )]
        #[serde(transparent)]
        #[sqlx(transparent)]
        pub struct $name(pub i64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Primary key of `riders`
    RiderId
);
entity_id!(
    /// Primary key of `seasons`
    SeasonId
);
entity_id!(
    /// Primary key of `race_circuits`
    RaceCircuitId
);
entity_id!(
    /// Primary key of `results_race`
    RaceResultId
);

/// A rider, unique by `(name, surname)`.
///
/// Only `nationality` changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Rider {
    pub id: RiderId,
    pub name: String,
    pub surname: String,
    pub nationality: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub career_status: Option<String>,
}

/// A championship season, unique by `(year, category)`. Immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Season {
    pub id: SeasonId,
    pub year: i32,
    pub category: String,
}

/// One race event of a season, unique by `(season_id, circuit, date)`.
///
/// A missing date is a value of its own: two events at the same circuit
/// in the same season without a date are the same event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RaceCircuit {
    pub id: RaceCircuitId,
    pub season_id: SeasonId,
    pub circuit: String,
    pub date: Option<NaiveDate>,
}

/// A rider's classification in one race, unique by `(rider_id, race_circuit_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct RaceResult {
    pub id: RaceResultId,
    pub rider_id: RiderId,
    pub race_circuit_id: RaceCircuitId,
    pub position: Option<i32>,
    pub points: Option<f64>,
}

impl RaceResult {
    /// Whether the stored classification already equals `(position, points)`.
    ///
    /// Absent compares equal to absent.
    pub fn matches(&self, position: Option<i32>, points: Option<f64>) -> bool {
        self.position == position && self.points == points
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_serialize_as_plain_integers() {
        let json = serde_json::to_string(&RiderId(42)).unwrap();
        assert_eq!(json, "42");
        let id: RaceCircuitId = serde_json::from_str("7").unwrap();
        assert_eq!(id, RaceCircuitId(7));
        assert_eq!(SeasonId(3).to_string(), "3");
    }

    #[test]
    fn test_result_matches_is_absent_aware() {
        let result = RaceResult {
            id: RaceResultId(1),
            rider_id: RiderId(1),
            race_circuit_id: RaceCircuitId(1),
            position: None,
            points: Some(25.0),
        };
        assert!(result.matches(None, Some(25.0)));
        assert!(!result.matches(Some(1), Some(25.0)));
        assert!(!result.matches(None, None));
    }
}
