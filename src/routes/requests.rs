use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::core::DonorCriteria;
use crate::error::ApiError;
use crate::models::{
    CreateBloodRequest, NewBloodRequest, RequestListResponse, RequestResponse,
    SearchRequestsParams, UpdateStatusRequest,
};
use crate::services::RequestAlert;

use super::{AppState, AuthenticatedUser};

/// Configure blood request routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/create", web::post().to(create))
        .route("/active", web::get().to(active))
        .route("/search", web::get().to(search))
        .route("/my-requests", web::get().to(my_requests))
        .route("/{id}/status", web::put().to(update_status));
}

/// POST /api/requests/create
///
/// The request is stored before any donor is emailed; the fan-out runs on
/// its own task and never affects this response.
async fn create(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<CreateBloodRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;
    let req = req.into_inner();

    let request = state
        .requests
        .create_request(NewBloodRequest {
            patient_name: req.patient_name,
            blood_group: req.blood_group,
            units_needed: req.units_needed,
            hospital_name: req.hospital_name,
            city: req.city,
            state: req.state,
            contact_person: req.contact_person,
            contact_phone: req.contact_phone,
            urgency: req.urgency,
            requested_by: user.donor_id,
        })
        .await?;

    tracing::info!(
        "Created {} request {} for {} in {}",
        request.urgency.as_str(),
        request.id,
        request.blood_group,
        request.city
    );

    state.notifier.spawn(RequestAlert::from(&request));

    Ok(HttpResponse::Created().json(RequestResponse {
        message: "Blood request created successfully".to_string(),
        request,
    }))
}

/// GET /api/requests/active
async fn active(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let requests = state.requests.active_requests(&DonorCriteria::default()).await?;
    Ok(HttpResponse::Ok().json(RequestListResponse::from(requests)))
}

/// GET /api/requests/search?bloodGroup=B%2B&city=pune
async fn search(
    state: web::Data<AppState>,
    params: web::Query<SearchRequestsParams>,
) -> Result<HttpResponse, ApiError> {
    let requests = state.requests.active_requests(&params.to_criteria()).await?;
    Ok(HttpResponse::Ok().json(RequestListResponse::from(requests)))
}

/// PUT /api/requests/{id}/status
async fn update_status(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    req: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, ApiError> {
    let not_found = || ApiError::NotFound("Request not found".to_string());

    let id = Uuid::parse_str(path.trim()).map_err(|_| not_found())?;

    let request = state
        .requests
        .update_request_status(id, req.status)
        .await?
        .ok_or_else(not_found)?;

    tracing::info!(
        "Donor {} set request {} to {}",
        user.donor_id,
        request.id,
        request.status.as_str()
    );

    Ok(HttpResponse::Ok().json(RequestResponse {
        message: "Request status updated".to_string(),
        request,
    }))
}

/// GET /api/requests/my-requests
async fn my_requests(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let requests = state.requests.requests_by_donor(user.donor_id).await?;
    Ok(HttpResponse::Ok().json(RequestListResponse::from(requests)))
}
