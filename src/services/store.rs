use async_trait::async_trait;
use uuid::Uuid;

use crate::core::DonorCriteria;
use crate::models::{BloodRequest, Donor, NewBloodRequest, RequestStatus, RequestWithRequester};
use crate::services::postgres::PostgresError;

/// Source of donor candidates for search and notification fan-out
///
/// Implementations apply the blood group, city and exclusion filters of
/// `criteria` but never the availability flag.
#[async_trait]
pub trait DonorStore: Send + Sync {
    async fn find_donors(&self, criteria: &DonorCriteria) -> Result<Vec<Donor>, PostgresError>;
}

/// Persistence for blood requests
#[async_trait]
pub trait RequestStore: Send + Sync {
    async fn create_request(&self, new: NewBloodRequest) -> Result<BloodRequest, PostgresError>;

    /// Active requests matching the blood group and city filters, newest first
    async fn active_requests(
        &self,
        criteria: &DonorCriteria,
    ) -> Result<Vec<RequestWithRequester>, PostgresError>;

    /// `None` when no request has this id
    async fn update_request_status(
        &self,
        id: Uuid,
        status: RequestStatus,
    ) -> Result<Option<BloodRequest>, PostgresError>;

    async fn requests_by_donor(&self, donor_id: Uuid) -> Result<Vec<BloodRequest>, PostgresError>;
}
