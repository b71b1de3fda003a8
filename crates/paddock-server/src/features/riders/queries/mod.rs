pub mod get;
pub mod list;
pub mod stats;

pub use get::{GetRiderError, GetRiderQuery};
pub use list::{ListRidersError, ListRidersQuery, RiderListItem};
pub use stats::{GetRiderStatsError, GetRiderStatsQuery, RiderStatsResponse, RiderTotals};
