use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{OrganizationProfile, SwipeAction};

/// Request to rank grants for an organization
///
/// Either `profile` is given inline, or the stored profile for `userId` is
/// used.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindMatchesRequest {
    #[serde(alias = "user_id", rename = "userId", default)]
    pub user_id: Option<String>,
    #[validate(nested)]
    #[serde(default)]
    pub profile: Option<OrganizationProfile>,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub limit: Option<u16>,
    #[serde(alias = "exclude_grant_ids", rename = "excludeGrantIds", default)]
    pub exclude_grant_ids: Vec<String>,
}

/// Request to record a swipe on a grant
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordSwipeRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "grant_id", rename = "grantId")]
    pub grant_id: String,
    pub action: SwipeAction,
    #[validate(range(min = 0.0, max = 100.0))]
    #[serde(alias = "match_score", rename = "matchScore", default)]
    pub match_score: f64,
}

/// Request to undo a swipe
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UndoSwipeRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "grant_id", rename = "grantId")]
    pub grant_id: String,
}

/// Query string for per-user listings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserQuery {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub limit: Option<u16>,
}
