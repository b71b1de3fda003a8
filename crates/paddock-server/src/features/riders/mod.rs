pub mod queries;
pub mod routes;

pub use queries::{
    GetRiderError, GetRiderQuery, GetRiderStatsError, GetRiderStatsQuery, ListRidersError,
    ListRidersQuery, RiderListItem, RiderStatsResponse, RiderTotals,
};

pub use routes::riders_routes;
