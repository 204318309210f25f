// Core algorithm exports
pub mod catalog;
pub mod filters;
pub mod matcher;
pub mod scoring;
pub mod window;

pub use catalog::{is_excluded, recommendations, saved_grants, summarize};
pub use filters::{apply_filters, matches_filters};
pub use matcher::{Matcher, MatchResult, DEFAULT_LIMIT};
pub use scoring::{calculate_match_score, score, MatchScore};
pub use window::{deadline, is_open_on, parse_window_date};
