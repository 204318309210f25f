// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    ApplicationWindow, ComponentScores, Eligibility, FundingInfo, GrantFilters, GrantProfile,
    GrantRecord, OrganizationProfile, ScoredMatch, ScoringWeights, Swipe, SwipeAction,
};
pub use requests::{FindMatchesRequest, RecordSwipeRequest, UndoSwipeRequest, UserQuery};
pub use responses::{
    ErrorResponse, FindMatchesResponse, GrantListResponse, GrantsSummary, HealthResponse,
    RecordSwipeResponse, SaveProfileResponse,
};
