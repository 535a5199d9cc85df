// Unit tests for BloodPlus

use bloodplus::core::{
    city_matches, distance::{distance_km, haversine_distance}, is_eligible, rank_by_distance,
    DonorCriteria,
};
use bloodplus::models::{BloodGroup, Donor, GeoPoint};
use chrono::Utc;
use uuid::Uuid;

fn create_donor(group: BloodGroup, city: &str, available: bool) -> Donor {
    Donor {
        id: Uuid::new_v4(),
        name: "Test Donor".to_string(),
        email: "donor@example.com".to_string(),
        phone: "9000000000".to_string(),
        blood_group: group,
        city: city.to_string(),
        state: "Maharashtra".to_string(),
        address: "FC Road".to_string(),
        location: None,
        available_to_donate: available,
        last_donation_date: None,
        created_at: Utc::now(),
    }
}

#[test]
fn test_haversine_distance_zero() {
    let distance = haversine_distance(19.076, 72.8777, 19.076, 72.8777);
    assert!(distance < 0.01);
}

#[test]
fn test_haversine_mumbai_to_pune() {
    // Roughly 120 km as the crow flies
    let distance = haversine_distance(19.076, 72.8777, 18.5204, 73.8567);
    assert!(distance > 110.0 && distance < 130.0, "got {}", distance);
}

#[test]
fn test_distance_is_symmetric() {
    let delhi = GeoPoint::new(28.6139, 77.209);
    let kolkata = GeoPoint::new(22.5726, 88.3639);

    let there = distance_km(delhi, kolkata);
    let back = distance_km(kolkata, delhi);
    assert!((there - back).abs() < 1e-9);
    assert!(there > 1200.0 && there < 1350.0);
}

#[test]
fn test_unresolved_location() {
    assert!(!GeoPoint::new(0.0, 0.0).is_resolved());
    assert!(!GeoPoint::new(f64::NAN, 72.0).is_resolved());
    assert!(GeoPoint::new(0.0, 72.0).is_resolved());
}

#[test]
fn test_blood_group_filter_is_exact() {
    let criteria = DonorCriteria::new(Some("O-"), None, None);

    assert!(criteria.matches(&create_donor(BloodGroup::ONegative, "Pune", true)));
    assert!(!criteria.matches(&create_donor(BloodGroup::OPositive, "Pune", true)));
    assert!(!criteria.matches(&create_donor(BloodGroup::AbNegative, "Pune", true)));
}

#[test]
fn test_city_partial_case_insensitive() {
    assert!(city_matches("Hyderabad", "hyder"));
    assert!(city_matches("hyderabad", "HYDERABAD"));
    assert!(city_matches("Navi Mumbai", "mumbai"));
    assert!(!city_matches("Pune", "mumbai"));
}

#[test]
fn test_city_pattern_characters_are_literal() {
    assert!(!city_matches("Hyderabad", "h.d"));
    assert!(city_matches("St. Thomas Mount", "st. thomas"));
}

#[test]
fn test_unavailable_donor_never_eligible() {
    let donor = create_donor(BloodGroup::BPositive, "Nagpur", false);
    assert!(!is_eligible(&donor, &DonorCriteria::default()));
    assert!(!is_eligible(&donor, &DonorCriteria::new(Some("B+"), Some("Nagpur"), None)));
}

#[test]
fn test_excluded_donor_not_eligible() {
    let donor = create_donor(BloodGroup::BPositive, "Nagpur", true);
    assert!(is_eligible(&donor, &DonorCriteria::default()));
    assert!(!is_eligible(&donor, &DonorCriteria::new(None, None, Some(donor.id))));
}

#[test]
fn test_ranking_without_origin_keeps_order() {
    let donors: Vec<Donor> = (0..5)
        .map(|_| create_donor(BloodGroup::APositive, "Pune", true))
        .collect();
    let ids: Vec<Uuid> = donors.iter().map(|d| d.id).collect();

    let ranked = rank_by_distance(donors, None);
    let ranked_ids: Vec<Uuid> = ranked.iter().map(|r| r.donor.id).collect();

    assert_eq!(ranked_ids, ids);
    assert!(ranked.iter().all(|r| r.distance_km.is_none()));
}

#[test]
fn test_ranking_puts_zero_sentinel_last() {
    let origin = GeoPoint::new(18.5204, 73.8567);

    let mut sentinel = create_donor(BloodGroup::APositive, "Pune", true);
    sentinel.location = Some(GeoPoint::new(0.0, 0.0));
    let mut nearby = create_donor(BloodGroup::APositive, "Pune", true);
    nearby.location = Some(GeoPoint::new(18.53, 73.86));
    let nearby_id = nearby.id;

    let ranked = rank_by_distance(vec![sentinel, nearby], Some(origin));

    assert_eq!(ranked[0].donor.id, nearby_id);
    assert!(ranked[1].distance_km.is_none());
}
