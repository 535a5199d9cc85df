// Core algorithm exports
pub mod distance;
pub mod filters;
pub mod search;

pub use distance::{distance_km, haversine_distance};
pub use filters::{city_matches, is_eligible, DonorCriteria};
pub use search::{rank_by_distance, search_donors, RankedDonor, SearchQuery, SearchResult};
