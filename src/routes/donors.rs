use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::core::{search_donors, DonorCriteria};
use crate::error::ApiError;
use crate::models::{
    DonorListResponse, DonorSearchResponse, DonorUpdate, ProfileUpdatedResponse,
    SearchDonorsParams, UpdateProfileRequest,
};

use super::{AppState, AuthenticatedUser};

/// Configure donor routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/search", web::get().to(search))
        .route("/profile/{id}", web::get().to(get_profile))
        .route("/profile/{id}", web::put().to(update_profile))
        .route("/all", web::get().to(list_all));
}

/// Search donors
///
/// GET /api/donors/search?bloodGroup=O-&city=hyder&latitude=17.38&longitude=78.48&excludeUserId=...
///
/// Donors are ranked by distance when both coordinates are given, then
/// unavailable donors are dropped.
async fn search(
    state: web::Data<AppState>,
    params: web::Query<SearchDonorsParams>,
) -> Result<HttpResponse, ApiError> {
    let query = params.to_query();

    let candidates = state.postgres.find_donors(&query.criteria).await?;
    let result = search_donors(candidates, &query);

    tracing::info!(
        "Donor search {:?} returned {} of {} candidates",
        query.criteria,
        result.donors.len(),
        result.total_before_availability
    );

    Ok(HttpResponse::Ok().json(DonorSearchResponse::from(result)))
}

/// GET /api/donors/profile/{id}
async fn get_profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_donor_id(&path)?;

    let donor = state
        .postgres
        .get_donor(id)
        .await?
        .ok_or_else(donor_not_found)?;

    Ok(HttpResponse::Ok().json(donor))
}

/// PUT /api/donors/profile/{id}
///
/// Only the donor themselves may edit a profile. Changing any address field
/// re-resolves the stored coordinates.
async fn update_profile(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    req: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_donor_id(&path)?;
    if user.donor_id != id {
        return Err(ApiError::Forbidden("Cannot edit another donor's profile".to_string()));
    }

    req.validate()?;
    let req = req.into_inner();

    let location = if req.changes_address() {
        let current = state
            .postgres
            .get_donor(id)
            .await?
            .ok_or_else(donor_not_found)?;

        let address = req.address.as_deref().unwrap_or(&current.address);
        let city = req.city.as_deref().unwrap_or(&current.city);
        let region = req.state.as_deref().unwrap_or(&current.state);

        Some(state.geocoder.resolve_coordinates(address, city, region).await)
    } else {
        None
    };

    let update = DonorUpdate {
        name: req.name,
        phone: req.phone,
        city: req.city,
        state: req.state,
        address: req.address,
        location,
        available_to_donate: req.available_to_donate,
        last_donation_date: req.last_donation_date,
    };

    let donor = state
        .postgres
        .update_donor(id, update)
        .await?
        .ok_or_else(donor_not_found)?;

    Ok(HttpResponse::Ok().json(ProfileUpdatedResponse {
        message: "Profile updated successfully".to_string(),
        donor,
    }))
}

/// GET /api/donors/all
async fn list_all(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let donors = state.postgres.find_donors(&DonorCriteria::default()).await?;

    Ok(HttpResponse::Ok().json(DonorListResponse {
        count: donors.len(),
        donors,
    }))
}

fn parse_donor_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| donor_not_found())
}

fn donor_not_found() -> ApiError {
    ApiError::NotFound("Donor not found".to_string())
}
