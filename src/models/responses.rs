use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::core::{RankedDonor, SearchResult};
use crate::models::domain::{BloodGroup, BloodRequest, Donor};

/// Donor entry in a search response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonorMatch {
    #[serde(flatten)]
    pub donor: Donor,
    /// Kilometres from the search origin, two decimals; null when unknown
    pub distance: Option<f64>,
}

impl From<RankedDonor> for DonorMatch {
    fn from(ranked: RankedDonor) -> Self {
        Self {
            donor: ranked.donor,
            distance: ranked.distance_km.map(|km| (km * 100.0).round() / 100.0),
        }
    }
}

/// Response for the donor search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonorSearchResponse {
    pub count: usize,
    pub donors: Vec<DonorMatch>,
    /// Candidates matched before unavailable donors were dropped
    pub total: usize,
}

impl From<SearchResult> for DonorSearchResponse {
    fn from(result: SearchResult) -> Self {
        let donors: Vec<DonorMatch> = result.donors.into_iter().map(DonorMatch::from).collect();
        Self {
            count: donors.len(),
            donors,
            total: result.total_before_availability,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonorListResponse {
    pub count: usize,
    pub donors: Vec<Donor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpdatedResponse {
    pub message: String,
    pub donor: Donor,
}

/// Identity returned alongside a fresh token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(rename = "bloodGroup")]
    pub blood_group: BloodGroup,
    pub city: String,
}

impl From<&Donor> for UserSummary {
    fn from(donor: &Donor) -> Self {
        Self {
            id: donor.id,
            name: donor.name.clone(),
            email: donor.email.clone(),
            blood_group: donor.blood_group,
            city: donor.city.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: UserSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestResponse {
    pub message: String,
    pub request: BloodRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestListResponse<T> {
    pub count: usize,
    pub requests: Vec<T>,
}

impl<T> From<Vec<T>> for RequestListResponse<T> {
    fn from(requests: Vec<T>) -> Self {
        Self {
            count: requests.len(),
            requests,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}
