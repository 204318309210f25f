use serde::{Deserialize, Serialize};
use crate::models::domain::{GrantRecord, ScoredMatch};

/// Response for find matches endpoint
#[derive(Debug, Clone, Serialize)]
pub struct FindMatchesResponse<'a> {
    pub matches: Vec<ScoredMatch<'a>>,
    pub total_results: usize,
}

/// Plain list of grants, used by filter, saved and recommendation endpoints
#[derive(Debug, Clone, Serialize)]
pub struct GrantListResponse<'a> {
    pub grants: Vec<&'a GrantRecord>,
    pub count: usize,
}

impl<'a> GrantListResponse<'a> {
    pub fn new(grants: Vec<&'a GrantRecord>) -> Self {
        let count = grants.len();
        Self { grants, count }
    }
}

/// Catalog-wide counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantsSummary {
    pub total_grants: usize,
    pub agencies: usize,
    pub issue_areas: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Save profile response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveProfileResponse {
    pub status: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub message: String,
}

/// Record swipe response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSwipeResponse {
    pub success: bool,
    pub swipe_id: String,
}
