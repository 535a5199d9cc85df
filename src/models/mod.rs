// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{BloodGroup, BloodRequest, Donor, DonorUpdate, GeoPoint, NewBloodRequest, NewDonor, Requester, RequestStatus, RequestWithRequester, Urgency};
pub use requests::{CreateBloodRequest, LoginRequest, RegisterRequest, SearchDonorsParams, SearchRequestsParams, UpdateProfileRequest, UpdateStatusRequest};
pub use responses::{AuthResponse, DonorListResponse, DonorMatch, DonorSearchResponse, ErrorResponse, HealthResponse, ProfileUpdatedResponse, RequestListResponse, RequestResponse, UserSummary};
