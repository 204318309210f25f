use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;
use crate::models::{OrganizationProfile, SaveProfileResponse};
use crate::routes::{error_response, store_error_response, AppState};

/// Configure organization profile routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/profiles", web::post().to(save_profile))
        .route("/profiles/{user_id}", web::get().to(get_profile));
}

/// Store a new organization profile
///
/// POST /api/v1/profiles
async fn save_profile(
    state: web::Data<AppState>,
    profile: web::Json<OrganizationProfile>,
) -> impl Responder {
    if let Err(errors) = profile.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }
    if profile.organization_name.trim().is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Validation failed",
            "organization_name is required",
        );
    }

    match state.store.save_profile(&profile).await {
        Ok(user_id) => HttpResponse::Created().json(SaveProfileResponse {
            status: "success".to_string(),
            user_id,
            message: "Profile saved successfully".to_string(),
        }),
        Err(e) => {
            tracing::error!("Failed to save profile: {}", e);
            store_error_response("Failed to save profile", &e)
        }
    }
}

/// Fetch an organization profile
///
/// GET /api/v1/profiles/{userId}
async fn get_profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let user_id = path.into_inner();

    match state.load_profile(&user_id).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(e) => {
            tracing::info!("Profile lookup for {} failed: {}", user_id, e);
            store_error_response("Failed to fetch profile", &e)
        }
    }
}
