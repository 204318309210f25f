use actix_web::{web, HttpResponse, Responder};
use crate::core::{apply_filters, summarize};
use crate::models::{GrantFilters, GrantListResponse};
use crate::routes::{store_error_response, AppState};

/// Configure grant catalog routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/grants/filter", web::post().to(filter_grants))
        .route("/grants/summary", web::get().to(grants_summary));
}

/// Filter the catalog for browsing
///
/// POST /api/v1/grants/filter
///
/// Request body:
/// ```json
/// {
///   "issueAreas": ["Eldercare"],
///   "scopes": ["Programme"],
///   "fundingMin": 10000,
///   "fundingMax": 50000,
///   "deadlineAfter": "2025-01-01",
///   "deadlineBefore": "2025-12-31",
///   "openOn": "2025-06-01"
/// }
/// ```
async fn filter_grants(
    state: web::Data<AppState>,
    filters: web::Json<GrantFilters>,
) -> impl Responder {
    let grants = match state.load_grants().await {
        Ok(grants) => grants,
        Err(e) => {
            tracing::error!("Failed to load grants: {}", e);
            return store_error_response("Failed to load grants", &e);
        }
    };

    let filtered = apply_filters(&grants, &filters);

    tracing::debug!("Filter kept {} of {} grants", filtered.len(), grants.len());

    HttpResponse::Ok().json(GrantListResponse::new(filtered))
}

/// Catalog counts
///
/// GET /api/v1/grants/summary
async fn grants_summary(state: web::Data<AppState>) -> impl Responder {
    match state.load_grants().await {
        Ok(grants) => HttpResponse::Ok().json(summarize(&grants)),
        Err(e) => {
            tracing::error!("Failed to load grants for summary: {}", e);
            store_error_response("Failed to load grants", &e)
        }
    }
}
