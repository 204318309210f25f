//! Grant Match - grant discovery and matching service for non-profits
//!
//! This library ranks funding opportunities against an organization's profile
//! and serves the catalog, profiles and swipe history over HTTP.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{Matcher, MatchResult, calculate_match_score, score};
pub use crate::models::{GrantRecord, OrganizationProfile, ScoredMatch, ScoringWeights, FindMatchesRequest, FindMatchesResponse};
