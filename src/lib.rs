//! BloodPlus - donor matching service
//!
//! Donors register with a blood group and a geocoded location. Searches rank
//! eligible donors by distance from an optional origin, and every new blood
//! request is emailed to the available donors it matches.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{distance::haversine_distance, is_eligible, search_donors, DonorCriteria, SearchQuery};
pub use error::ApiError;
pub use models::{BloodGroup, BloodRequest, Donor, GeoPoint};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let km = haversine_distance(17.385, 78.4867, 17.385, 78.4867);
        assert_eq!(km, 0.0);
        assert_eq!("O-".parse::<BloodGroup>(), Ok(BloodGroup::ONegative));
    }
}
