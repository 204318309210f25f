use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use std::collections::HashSet;
use validator::Validate;
use crate::core::{is_excluded, recommendations};
use crate::models::{FindMatchesRequest, FindMatchesResponse, GrantListResponse, HealthResponse, UserQuery};
use crate::routes::{error_response, store_error_response, AppState};

/// Configure matching routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/find", web::post().to(find_matches))
        .route("/recommendations", web::get().to(get_recommendations));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Find matches endpoint
///
/// POST /api/v1/matches/find
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "profile": { "issue_areas": ["Eldercare"], "project_types": [], "funding_min": 0, "funding_max": 0 },
///   "limit": 20,
///   "excludeGrantIds": ["string"]
/// }
/// ```
///
/// An inline `profile` takes precedence over the stored profile for `userId`.
/// Grants the user already swiped on are left out.
async fn find_matches(
    state: web::Data<AppState>,
    req: web::Json<FindMatchesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for find_matches request: {:?}", errors);
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    let req = req.into_inner();
    let limit = state.matching.resolve_limit(req.limit);

    let profile = match (req.profile, req.user_id.as_deref()) {
        (Some(profile), _) => profile,
        (None, Some(user_id)) => match state.load_profile(user_id).await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::error!("Failed to fetch profile for {}: {}", user_id, e);
                return store_error_response("Failed to fetch organization profile", &e);
            }
        },
        (None, None) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "Missing profile",
                "Either profile or userId is required",
            );
        }
    };

    let mut excluded: HashSet<String> = req.exclude_grant_ids.into_iter().collect();

    if let Some(user_id) = req.user_id.as_deref() {
        match state.postgres.get_swiped_grant_ids(user_id).await {
            Ok(ids) => excluded.extend(ids),
            Err(e) => {
                tracing::warn!("Failed to fetch swipes for {}, proceeding without filtering: {}", user_id, e);
            }
        }
    }

    let grants = match state.load_grants().await {
        Ok(grants) => grants,
        Err(e) => {
            tracing::error!("Failed to load grants: {}", e);
            return store_error_response("Failed to load grants", &e);
        }
    };

    tracing::debug!("Ranking {} grants, excluding {}", grants.len(), excluded.len());

    let result = state.matcher.rank_iter(
        &profile,
        grants.iter().filter(|grant| !is_excluded(grant, &excluded)),
        limit,
    );

    tracing::info!(
        "Returning {} matches (from {} candidates, limit {})",
        result.matches.len(),
        result.total_candidates,
        limit
    );

    HttpResponse::Ok().json(FindMatchesResponse {
        matches: result.matches,
        total_results: result.total_candidates,
    })
}

/// Grants the user hasn't liked yet, in catalog order
///
/// GET /api/v1/recommendations?userId={userId}&limit={limit}
async fn get_recommendations(
    state: web::Data<AppState>,
    query: web::Query<UserQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    let limit = state.matching.resolve_limit(query.limit);

    let liked = match state.postgres.get_liked_grant_ids(&query.user_id).await {
        Ok(ids) => ids,
        Err(e) => {
            tracing::warn!("Failed to fetch likes for {}, returning unfiltered grants: {}", query.user_id, e);
            HashSet::new()
        }
    };

    let grants = match state.load_grants().await {
        Ok(grants) => grants,
        Err(e) => {
            tracing::error!("Failed to load grants: {}", e);
            return store_error_response("Failed to load grants", &e);
        }
    };

    HttpResponse::Ok().json(GrantListResponse::new(recommendations(&grants, &liked, limit)))
}
