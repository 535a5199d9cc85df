use crate::models::Donor;
use uuid::Uuid;

/// Store-level filter shared by donor search and notification fan-out
///
/// Blood group is compared as literal text so values outside the eight
/// known groups simply match nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DonorCriteria {
    pub blood_group: Option<String>,
    pub city: Option<String>,
    pub exclude_id: Option<Uuid>,
}

impl DonorCriteria {
    /// Build criteria from raw input; blank strings mean "no filter"
    pub fn new(blood_group: Option<&str>, city: Option<&str>, exclude_id: Option<Uuid>) -> Self {
        Self {
            blood_group: non_blank(blood_group),
            city: non_blank(city),
            exclude_id,
        }
    }

    /// Check the blood group, city and exclusion filters, ignoring availability
    #[inline]
    pub fn matches(&self, donor: &Donor) -> bool {
        if let Some(exclude_id) = self.exclude_id {
            if donor.id == exclude_id {
                return false;
            }
        }

        if let Some(blood_group) = &self.blood_group {
            if donor.blood_group.as_str() != blood_group {
                return false;
            }
        }

        match &self.city {
            Some(needle) => city_matches(&donor.city, needle),
            None => true,
        }
    }
}

/// A donor is eligible when available and matching every active filter
#[inline]
pub fn is_eligible(donor: &Donor, criteria: &DonorCriteria) -> bool {
    donor.available_to_donate && criteria.matches(donor)
}

/// Case-insensitive substring match on city text
#[inline]
pub fn city_matches(city: &str, needle: &str) -> bool {
    city.to_lowercase().contains(&needle.trim().to_lowercase())
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BloodGroup, GeoPoint};
    use chrono::Utc;

    fn create_test_donor(blood_group: BloodGroup, city: &str, available: bool) -> Donor {
        Donor {
            id: Uuid::new_v4(),
            name: "Test Donor".to_string(),
            email: "donor@example.com".to_string(),
            phone: "9000000000".to_string(),
            blood_group,
            city: city.to_string(),
            state: "Telangana".to_string(),
            address: "Road No. 1".to_string(),
            location: Some(GeoPoint::new(17.385, 78.4867)),
            available_to_donate: available,
            last_donation_date: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_criteria_matches_everyone() {
        let criteria = DonorCriteria::default();
        let donor = create_test_donor(BloodGroup::APositive, "Pune", true);
        assert!(criteria.matches(&donor));
    }

    #[test]
    fn test_blood_group_exact() {
        let criteria = DonorCriteria::new(Some("O-"), None, None);
        assert!(criteria.matches(&create_test_donor(BloodGroup::ONegative, "Pune", true)));
        assert!(!criteria.matches(&create_test_donor(BloodGroup::OPositive, "Pune", true)));
    }

    #[test]
    fn test_unknown_blood_group_matches_nothing() {
        let criteria = DonorCriteria::new(Some("Z+"), None, None);
        for group in BloodGroup::ALL {
            assert!(!criteria.matches(&create_test_donor(group, "Pune", true)));
        }
    }

    #[test]
    fn test_city_substring_case_insensitive() {
        let criteria = DonorCriteria::new(None, Some("hyder"), None);
        assert!(criteria.matches(&create_test_donor(BloodGroup::BPositive, "Hyderabad", true)));
        assert!(!criteria.matches(&create_test_donor(BloodGroup::BPositive, "Chennai", true)));
    }

    #[test]
    fn test_city_with_regex_characters_is_literal() {
        let criteria = DonorCriteria::new(None, Some("a.b"), None);
        assert!(!criteria.matches(&create_test_donor(BloodGroup::BPositive, "axb", true)));
    }

    #[test]
    fn test_exclusion() {
        let donor = create_test_donor(BloodGroup::APositive, "Pune", true);
        let criteria = DonorCriteria::new(None, None, Some(donor.id));
        assert!(!criteria.matches(&donor));
    }

    #[test]
    fn test_unavailable_never_eligible() {
        let criteria = DonorCriteria::default();
        let donor = create_test_donor(BloodGroup::APositive, "Pune", false);
        assert!(criteria.matches(&donor));
        assert!(!is_eligible(&donor, &criteria));
    }

    #[test]
    fn test_blank_inputs_are_no_filter() {
        let criteria = DonorCriteria::new(Some("  "), Some(""), None);
        assert_eq!(criteria, DonorCriteria::default());
    }
}
