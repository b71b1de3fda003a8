pub mod queries;
pub mod routes;

pub use queries::{
    GetRaceResultsError, GetRaceResultsQuery, ListRacesError, ListRacesQuery, RaceListItem,
    RaceResultItem, RaceResultsResponse,
};

pub use routes::races_routes;
