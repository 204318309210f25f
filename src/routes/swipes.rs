use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;
use crate::core::saved_grants;
use crate::models::{GrantListResponse, RecordSwipeRequest, RecordSwipeResponse, Swipe, UndoSwipeRequest, UserQuery};
use crate::routes::{error_response, store_error_response, AppState};
use crate::services::ActionType;

/// Configure swipe routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/swipes", web::post().to(record_swipe))
        .route("/swipes", web::delete().to(undo_swipe))
        .route("/swipes/saved", web::get().to(get_saved_grants))
        .route("/swipes/stats", web::get().to(get_swipe_stats));
}

/// Record swipe endpoint
///
/// POST /api/v1/swipes
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "grantId": "string",
///   "action": "like|dislike",
///   "matchScore": 72.5
/// }
/// ```
async fn record_swipe(
    state: web::Data<AppState>,
    req: web::Json<RecordSwipeRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    let swipe = Swipe {
        user_id: req.user_id.clone(),
        grant_id: req.grant_id.clone(),
        action: req.action,
        match_score: req.match_score,
        created_at: chrono::Utc::now(),
    };

    // PostgreSQL is the source of truth for exclusion and saved grants
    let postgres_result = state
        .postgres
        .record_swipe(&swipe.user_id, &swipe.grant_id, ActionType::from(swipe.action), swipe.match_score)
        .await;

    if let Err(e) = postgres_result {
        tracing::error!("Failed to record swipe in PostgreSQL: {}", e);
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to record swipe", e);
    }

    // The document store copy is best-effort
    if let Err(e) = state.store.record_swipe(&swipe).await {
        tracing::warn!("Swipe recorded in PostgreSQL but document store mirroring failed: {}", e);
    }

    tracing::debug!("Recorded swipe: {} -> {} ({:?})", swipe.user_id, swipe.grant_id, swipe.action);

    HttpResponse::Ok().json(RecordSwipeResponse {
        success: true,
        swipe_id: uuid::Uuid::new_v4().to_string(),
    })
}

/// Undo a swipe
///
/// DELETE /api/v1/swipes
async fn undo_swipe(
    state: web::Data<AppState>,
    req: web::Json<UndoSwipeRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    match state.postgres.remove_swipe(&req.user_id, &req.grant_id).await {
        Ok(true) => HttpResponse::NoContent().finish(),
        Ok(false) => error_response(
            StatusCode::NOT_FOUND,
            "Swipe not found",
            format!("No swipe by {} on {}", req.user_id, req.grant_id),
        ),
        Err(e) => {
            tracing::error!("Failed to remove swipe: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to remove swipe", e)
        }
    }
}

/// Grants the user liked
///
/// GET /api/v1/swipes/saved?userId={userId}
async fn get_saved_grants(
    state: web::Data<AppState>,
    query: web::Query<UserQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    let liked = match state.postgres.get_liked_grant_ids(&query.user_id).await {
        Ok(ids) => ids,
        Err(e) => {
            tracing::error!("Failed to fetch likes for {}: {}", query.user_id, e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch saved grants", e);
        }
    };

    if liked.is_empty() {
        return HttpResponse::Ok().json(GrantListResponse::new(Vec::new()));
    }

    let grants = match state.load_grants().await {
        Ok(grants) => grants,
        Err(e) => {
            tracing::error!("Failed to load grants: {}", e);
            return store_error_response("Failed to load grants", &e);
        }
    };

    HttpResponse::Ok().json(GrantListResponse::new(saved_grants(&grants, &liked)))
}

/// Swipe counts for a user
///
/// GET /api/v1/swipes/stats?userId={userId}
async fn get_swipe_stats(
    state: web::Data<AppState>,
    query: web::Query<UserQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors);
    }

    match state.postgres.get_swipe_stats(&query.user_id).await {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => {
            tracing::error!("Failed to fetch swipe stats for {}: {}", query.user_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch swipe stats", e)
        }
    }
}
