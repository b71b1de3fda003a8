pub mod list;
pub mod results;

pub use list::{ListRacesError, ListRacesQuery, RaceListItem};
pub use results::{GetRaceResultsError, GetRaceResultsQuery, RaceResultItem, RaceResultsResponse};
