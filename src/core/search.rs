use std::cmp::Ordering;
use std::collections::HashSet;

use crate::core::{distance::distance_km, filters::DonorCriteria};
use crate::models::{Donor, GeoPoint};

/// Donor search parameters
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub criteria: DonorCriteria,
    /// Reference point for distance ranking
    pub origin: Option<GeoPoint>,
}

/// Donor paired with its distance from the search origin
#[derive(Debug, Clone)]
pub struct RankedDonor {
    pub donor: Donor,
    pub distance_km: Option<f64>,
}

/// Result of the search pipeline
#[derive(Debug)]
pub struct SearchResult {
    pub donors: Vec<RankedDonor>,
    /// Ranked candidates before unavailable donors were dropped
    pub total_before_availability: usize,
}

/// Run the donor search pipeline over store candidates
///
/// # Pipeline Stages
/// 1. Criteria filter and de-duplication by id
/// 2. Distance annotation when an origin is given
/// 3. Stable sort, unknown distances last
/// 4. Availability filter
pub fn search_donors(candidates: Vec<Donor>, query: &SearchQuery) -> SearchResult {
    let mut seen = HashSet::with_capacity(candidates.len());
    let matching: Vec<Donor> = candidates
        .into_iter()
        .filter(|donor| query.criteria.matches(donor))
        .filter(|donor| seen.insert(donor.id))
        .collect();

    let ranked = rank_by_distance(matching, query.origin);
    let total_before_availability = ranked.len();

    // Availability is applied after ranking, never as part of the store query
    let donors: Vec<RankedDonor> = ranked
        .into_iter()
        .filter(|ranked| ranked.donor.available_to_donate)
        .collect();

    tracing::debug!(
        "Donor search kept {} of {} ranked candidates",
        donors.len(),
        total_before_availability
    );

    SearchResult {
        donors,
        total_before_availability,
    }
}

/// Annotate donors with their distance from `origin` and order them nearest first
///
/// Donors without a resolved location keep a `None` distance and sort after
/// every donor with a known distance, in their input order.
pub fn rank_by_distance(donors: Vec<Donor>, origin: Option<GeoPoint>) -> Vec<RankedDonor> {
    let mut ranked: Vec<RankedDonor> = donors
        .into_iter()
        .map(|donor| {
            let distance_km = origin
                .zip(donor.resolved_location())
                .map(|(from, to)| distance_km(from, to));
            RankedDonor { donor, distance_km }
        })
        .collect();

    if origin.is_some() {
        ranked.sort_by(|a, b| compare_distance(a.distance_km, b.distance_km));
    }

    ranked
}

#[inline]
fn compare_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BloodGroup;
    use chrono::Utc;
    use uuid::Uuid;

    const ORIGIN: GeoPoint = GeoPoint { latitude: 17.3850, longitude: 78.4867 };

    fn create_candidate(name: &str, lat: f64, lon: f64, available: bool) -> Donor {
        Donor {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: "9000000000".to_string(),
            blood_group: BloodGroup::BPositive,
            city: "Hyderabad".to_string(),
            state: "Telangana".to_string(),
            address: "Somajiguda".to_string(),
            location: Some(GeoPoint::new(lat, lon)),
            available_to_donate: available,
            last_donation_date: None,
            created_at: Utc::now(),
        }
    }

    fn names(result: &SearchResult) -> Vec<&str> {
        result.donors.iter().map(|r| r.donor.name.as_str()).collect()
    }

    #[test]
    fn test_nearest_first() {
        // ~0.01 degree latitude is ~1.1 km
        let far = create_candidate("Far", 17.3850 + 0.09, 78.4867, true);
        let near = create_candidate("Near", 17.3850 + 0.018, 78.4867, true);

        let query = SearchQuery { origin: Some(ORIGIN), ..Default::default() };
        let result = search_donors(vec![far, near], &query);

        assert_eq!(names(&result), vec!["Near", "Far"]);
        let near_km = result.donors[0].distance_km.unwrap();
        let far_km = result.donors[1].distance_km.unwrap();
        assert!((near_km - 2.0).abs() < 0.1, "got {}", near_km);
        assert!((far_km - 10.0).abs() < 0.2, "got {}", far_km);
    }

    #[test]
    fn test_unresolved_locations_rank_last_in_input_order() {
        let mut unknown_a = create_candidate("UnknownA", 0.0, 0.0, true);
        let mut unknown_b = create_candidate("UnknownB", 0.0, 0.0, true);
        unknown_b.location = None;
        unknown_a.location = Some(GeoPoint::new(0.0, 0.0));
        let known = create_candidate("Known", 18.0, 79.0, true);

        let query = SearchQuery { origin: Some(ORIGIN), ..Default::default() };
        let result = search_donors(vec![unknown_a, known, unknown_b], &query);

        assert_eq!(names(&result), vec!["Known", "UnknownA", "UnknownB"]);
        assert!(result.donors[1].distance_km.is_none());
        assert!(result.donors[2].distance_km.is_none());
    }

    #[test]
    fn test_no_origin_keeps_storage_order() {
        let a = create_candidate("A", 18.0, 79.0, true);
        let b = create_candidate("B", 17.4, 78.5, true);
        let c = create_candidate("C", 17.0, 78.0, true);

        let result = search_donors(vec![a, b, c], &SearchQuery::default());

        assert_eq!(names(&result), vec!["A", "B", "C"]);
        assert!(result.donors.iter().all(|r| r.distance_km.is_none()));
    }

    #[test]
    fn test_availability_applied_after_ranking() {
        let unavailable_near = create_candidate("Busy", 17.386, 78.4867, false);
        let available_far = create_candidate("Free", 17.6, 78.4867, true);

        let query = SearchQuery { origin: Some(ORIGIN), ..Default::default() };
        let result = search_donors(vec![unavailable_near, available_far], &query);

        assert_eq!(names(&result), vec!["Free"]);
        assert_eq!(result.total_before_availability, 2);
    }

    #[test]
    fn test_duplicates_removed() {
        let donor = create_candidate("Once", 17.4, 78.5, true);
        let result = search_donors(vec![donor.clone(), donor], &SearchQuery::default());

        assert_eq!(result.donors.len(), 1);
        assert_eq!(result.total_before_availability, 1);
    }

    #[test]
    fn test_criteria_reapplied_to_candidates() {
        let mut other_group = create_candidate("Other", 17.4, 78.5, true);
        other_group.blood_group = BloodGroup::AbNegative;
        let matching = create_candidate("Match", 17.4, 78.5, true);

        let query = SearchQuery {
            criteria: DonorCriteria::new(Some("B+"), None, None),
            origin: None,
        };
        let result = search_donors(vec![other_group, matching], &query);

        assert_eq!(names(&result), vec!["Match"]);
    }

    #[test]
    fn test_empty_candidates() {
        let query = SearchQuery {
            criteria: DonorCriteria::new(None, Some("Atlantis"), None),
            origin: Some(ORIGIN),
        };
        let result = search_donors(vec![], &query);

        assert!(result.donors.is_empty());
        assert_eq!(result.total_before_availability, 0);
    }
}
