use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::error::ApiError;
use crate::models::{AuthResponse, LoginRequest, NewDonor, RegisterRequest, UserSummary};
use crate::services::{PostgresError, TokenService};

use super::AppState;

/// Configure authentication routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/register", web::post().to(register))
        .route("/login", web::post().to(login));
}

/// POST /api/auth/register
async fn register(
    state: web::Data<AppState>,
    tokens: web::Data<TokenService>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;
    let req = req.into_inner();
    let email = req.email.trim().to_lowercase();

    if state.postgres.find_credentials(&email).await?.is_some() {
        return Err(ApiError::BadRequest("User already exists".to_string()));
    }

    // PBKDF2 is CPU bound
    let passwords = state.passwords.clone();
    let password = req.password;
    let password_hash = web::block(move || passwords.hash(&password)).await??;

    let location = state
        .geocoder
        .resolve_coordinates(&req.address, &req.city, &req.state)
        .await;

    let donor = state
        .postgres
        .create_donor(NewDonor {
            name: req.name,
            email,
            password_hash,
            phone: req.phone,
            blood_group: req.blood_group,
            city: req.city,
            state: req.state,
            address: req.address,
            location,
        })
        .await
        .map_err(|e| match e {
            PostgresError::Conflict(_) => ApiError::BadRequest("User already exists".to_string()),
            other => ApiError::Store(other),
        })?;

    let token = tokens.issue(donor.id)?;

    tracing::info!("Registered donor {} ({}, {})", donor.id, donor.blood_group, donor.city);

    Ok(HttpResponse::Created().json(AuthResponse {
        message: "User registered successfully".to_string(),
        token,
        user: UserSummary::from(&donor),
    }))
}

/// POST /api/auth/login
async fn login(
    state: web::Data<AppState>,
    tokens: web::Data<TokenService>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let invalid = || ApiError::BadRequest("Invalid credentials".to_string());

    let req = req.into_inner();
    let email = req.email.trim().to_lowercase();

    let (donor, password_hash) = state
        .postgres
        .find_credentials(&email)
        .await?
        .ok_or_else(invalid)?;

    let passwords = state.passwords.clone();
    let password = req.password;
    let matches = web::block(move || passwords.verify(&password, &password_hash)).await?;
    if !matches {
        return Err(invalid());
    }

    let token = tokens.issue(donor.id)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        message: "Login successful".to_string(),
        token,
        user: UserSummary::from(&donor),
    }))
}
