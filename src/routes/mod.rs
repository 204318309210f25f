// Route exports
pub mod grants;
pub mod matches;
pub mod profiles;
pub mod swipes;

use actix_web::{http::StatusCode, web, HttpResponse};
use std::sync::Arc;
use crate::config::MatchingSettings;
use crate::core::Matcher;
use crate::models::{ErrorResponse, GrantRecord, OrganizationProfile};
use crate::services::{CacheError, CacheKey, CacheManager, FirestoreClient, PostgresClient, StoreError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<FirestoreClient>,
    pub cache: Arc<CacheManager>,
    pub postgres: Arc<PostgresClient>,
    pub matcher: Matcher,
    pub matching: MatchingSettings,
}

impl AppState {
    /// Grant catalog, served from cache when possible
    pub async fn load_grants(&self) -> Result<Vec<GrantRecord>, StoreError> {
        let key = CacheKey::grants();

        match self.cache.get::<Vec<GrantRecord>>(&key).await {
            Ok(grants) => return Ok(grants),
            Err(CacheError::CacheMiss(_)) => {}
            Err(e) => tracing::warn!("Grant cache read failed, falling back to store: {}", e),
        }

        let grants = self.store.fetch_grants().await?;

        if let Err(e) = self.cache.set(&key, &grants).await {
            tracing::warn!("Failed to cache grant catalog: {}", e);
        }

        Ok(grants)
    }

    /// Organization profile, served from cache when possible
    pub async fn load_profile(&self, user_id: &str) -> Result<OrganizationProfile, StoreError> {
        let key = CacheKey::profile(user_id);

        match self.cache.get::<OrganizationProfile>(&key).await {
            Ok(profile) => return Ok(profile),
            Err(CacheError::CacheMiss(_)) => {}
            Err(e) => tracing::warn!("Profile cache read failed, falling back to store: {}", e),
        }

        let profile = self.store.get_profile(user_id).await?;

        if let Err(e) = self.cache.set(&key, &profile).await {
            tracing::warn!("Failed to cache profile {}: {}", user_id, e);
        }

        Ok(profile)
    }
}

/// JSON error body with a matching status code
pub fn error_response(status: StatusCode, error: &str, message: impl ToString) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message: message.to_string(),
        status_code: status.as_u16(),
    })
}

/// Map a store failure to a response, keeping 404s distinct
pub fn store_error_response(error: &str, err: &StoreError) -> HttpResponse {
    let status = match err {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::Unauthorized => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, error, err)
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure)
            .configure(grants::configure)
            .configure(profiles::configure)
            .configure(swipes::configure),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn test_store_error_status() {
        let not_found = store_error_response("Failed", &StoreError::NotFound("x".into()));
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let api = store_error_response("Failed", &StoreError::ApiError("boom".into()));
        assert_eq!(api.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(api.into_body()).await.unwrap();
        let parsed: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.status_code, 500);
        assert_eq!(parsed.message, "API returned error: boom");
    }
}
