use crate::core::{DonorCriteria, SearchQuery};
use crate::models::domain::{BloodGroup, GeoPoint, RequestStatus, Urgency};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Reject text that is empty once surrounding whitespace is removed
pub fn non_blank<T: AsRef<str> + ?Sized>(value: &T) -> Result<(), ValidationError> {
    if value.as_ref().trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Keep `null` distinct from an absent field
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Register a new donor
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(custom(function = "non_blank"))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
    #[validate(custom(function = "non_blank"))]
    pub phone: String,
    #[serde(rename = "bloodGroup")]
    pub blood_group: BloodGroup,
    #[validate(custom(function = "non_blank"))]
    pub city: String,
    #[validate(custom(function = "non_blank"))]
    pub state: String,
    #[validate(custom(function = "non_blank"))]
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Partial profile update; absent fields are left unchanged
///
/// `lastDonationDate: null` clears the stored date.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(custom(function = "non_blank"))]
    pub name: Option<String>,
    #[validate(custom(function = "non_blank"))]
    pub phone: Option<String>,
    #[validate(custom(function = "non_blank"))]
    pub city: Option<String>,
    #[validate(custom(function = "non_blank"))]
    pub state: Option<String>,
    #[validate(custom(function = "non_blank"))]
    pub address: Option<String>,
    #[serde(rename = "availableToDonate")]
    pub available_to_donate: Option<bool>,
    #[serde(
        rename = "lastDonationDate",
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_donation_date: Option<Option<DateTime<Utc>>>,
}

impl UpdateProfileRequest {
    /// Whether the update touches any field that feeds the geocoder
    pub fn changes_address(&self) -> bool {
        self.city.is_some() || self.state.is_some() || self.address.is_some()
    }
}

/// Query string of `GET /donors/search`
///
/// Every field is kept as raw text: malformed values degrade to "no filter"
/// instead of rejecting the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchDonorsParams {
    #[serde(rename = "bloodGroup")]
    pub blood_group: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    #[serde(rename = "excludeUserId")]
    pub exclude_user_id: Option<String>,
}

impl SearchDonorsParams {
    pub fn origin(&self) -> Option<GeoPoint> {
        let latitude = parse_coordinate(self.latitude.as_deref())?;
        let longitude = parse_coordinate(self.longitude.as_deref())?;
        Some(GeoPoint::new(latitude, longitude))
    }

    pub fn exclude_id(&self) -> Option<Uuid> {
        self.exclude_user_id
            .as_deref()
            .map(str::trim)
            .and_then(|id| Uuid::parse_str(id).ok())
    }

    pub fn to_query(&self) -> SearchQuery {
        SearchQuery {
            criteria: DonorCriteria::new(
                self.blood_group.as_deref(),
                self.city.as_deref(),
                self.exclude_id(),
            ),
            origin: self.origin(),
        }
    }
}

fn parse_coordinate(raw: Option<&str>) -> Option<f64> {
    raw.map(str::trim)
        .and_then(|value| value.parse::<f64>().ok())
        .filter(|value| value.is_finite())
}

/// Query string of `GET /requests/search`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequestsParams {
    #[serde(rename = "bloodGroup")]
    pub blood_group: Option<String>,
    pub city: Option<String>,
}

impl SearchRequestsParams {
    pub fn to_criteria(&self) -> DonorCriteria {
        DonorCriteria::new(self.blood_group.as_deref(), self.city.as_deref(), None)
    }
}

/// Body of `POST /requests/create`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBloodRequest {
    #[validate(custom(function = "non_blank"))]
    #[serde(rename = "patientName")]
    pub patient_name: String,
    #[serde(rename = "bloodGroup")]
    pub blood_group: BloodGroup,
    #[validate(range(min = 1))]
    #[serde(rename = "unitsNeeded")]
    pub units_needed: i32,
    #[validate(custom(function = "non_blank"))]
    #[serde(rename = "hospitalName")]
    pub hospital_name: String,
    #[validate(custom(function = "non_blank"))]
    pub city: String,
    #[validate(custom(function = "non_blank"))]
    pub state: String,
    #[validate(custom(function = "non_blank"))]
    #[serde(rename = "contactPerson")]
    pub contact_person: String,
    #[validate(custom(function = "non_blank"))]
    #[serde(rename = "contactPhone")]
    pub contact_phone: String,
    #[serde(default)]
    pub urgency: Urgency,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: RequestStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_requires_both_coordinates() {
        let params = SearchDonorsParams {
            latitude: Some("17.385".into()),
            longitude: None,
            ..Default::default()
        };
        assert!(params.origin().is_none());

        let params = SearchDonorsParams {
            latitude: Some("17.385".into()),
            longitude: Some("78.4867".into()),
            ..Default::default()
        };
        assert_eq!(params.origin(), Some(GeoPoint::new(17.385, 78.4867)));
    }

    #[test]
    fn test_malformed_params_become_no_filter() {
        let params = SearchDonorsParams {
            blood_group: Some("   ".into()),
            city: Some("".into()),
            latitude: Some("north".into()),
            longitude: Some("78.4".into()),
            exclude_user_id: Some("not-a-uuid".into()),
        };
        let query = params.to_query();

        assert!(query.criteria.blood_group.is_none());
        assert!(query.criteria.city.is_none());
        assert!(query.criteria.exclude_id.is_none());
        assert!(query.origin.is_none());
    }

    #[test]
    fn test_create_request_validation() {
        let body: CreateBloodRequest = serde_json::from_value(serde_json::json!({
            "patientName": "Ravi",
            "bloodGroup": "B+",
            "unitsNeeded": 0,
            "hospitalName": "Apollo",
            "city": "Hyderabad",
            "state": "Telangana",
            "contactPerson": "Anita",
            "contactPhone": "9000000000"
        }))
        .unwrap();

        assert_eq!(body.urgency, Urgency::Medium);
        assert!(body.validate().is_err());
    }

    #[test]
    fn test_unknown_blood_group_is_rejected_in_bodies() {
        let result: Result<CreateBloodRequest, _> = serde_json::from_value(serde_json::json!({
            "patientName": "Ravi",
            "bloodGroup": "Z+",
            "unitsNeeded": 2,
            "hospitalName": "Apollo",
            "city": "Hyderabad",
            "state": "Telangana",
            "contactPerson": "Anita",
            "contactPhone": "9000000000"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_whitespace_city_fails_request_validation() {
        let body: CreateBloodRequest = serde_json::from_value(serde_json::json!({
            "patientName": "Ravi",
            "bloodGroup": "O-",
            "unitsNeeded": 2,
            "hospitalName": "Apollo",
            "city": "   ",
            "state": "Telangana",
            "contactPerson": "Anita",
            "contactPhone": "9000000000"
        }))
        .unwrap();

        let errors = body.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("city"));
    }

    #[test]
    fn test_profile_update_rejects_blank_fields() {
        let update = UpdateProfileRequest {
            name: Some("".into()),
            city: Some("  ".into()),
            ..Default::default()
        };
        let errors = update.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("city"));

        let update = UpdateProfileRequest {
            phone: Some("9123456789".into()),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
        assert!(UpdateProfileRequest::default().validate().is_ok());
    }

    #[test]
    fn test_last_donation_date_null_differs_from_absent() {
        let absent: UpdateProfileRequest =
            serde_json::from_value(serde_json::json!({ "name": "Kiran" })).unwrap();
        assert_eq!(absent.last_donation_date, None);

        let cleared: UpdateProfileRequest =
            serde_json::from_value(serde_json::json!({ "lastDonationDate": null })).unwrap();
        assert_eq!(cleared.last_donation_date, Some(None));

        let set: UpdateProfileRequest = serde_json::from_value(serde_json::json!({
            "lastDonationDate": "2024-03-01T00:00:00Z"
        }))
        .unwrap();
        assert!(matches!(set.last_donation_date, Some(Some(_))));
    }
}
