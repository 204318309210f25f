use std::collections::HashSet;
use crate::models::{ComponentScores, GrantRecord, OrganizationProfile, ScoringWeights};

/// Funding component when either side leaves the amount unspecified
const FUNDING_BASELINE: f64 = 0.5;
/// Cap covers the need but exceeds the requested maximum
const FUNDING_ABOVE_MAX: f64 = 0.8;
/// Cap falls short of the requested minimum
const FUNDING_BELOW_MIN: f64 = 0.3;

const WINDOW_ROLLING: f64 = 1.0;
const WINDOW_FIXED: f64 = 0.6;

/// Full breakdown of a profile/grant comparison
#[derive(Debug, Clone, PartialEq)]
pub struct MatchScore {
    pub total: f64,
    pub components: ComponentScores,
    pub shared_issue_areas: Vec<String>,
    pub shared_scope_tags: Vec<String>,
}

/// Calculate a match score (0-100) for a grant against an organization profile
///
/// Scoring formula:
/// score = (
///     area_score * 0.40 +      # Share of the profile's issue areas the grant covers
///     scope_score * 0.25 +     # Share of the profile's project types in the grant's scope
///     funding_score * 0.25 +   # Grant cap against the profile's funding range
///     window_score * 0.10      # Rolling windows beat fixed ones
/// ) * 100
pub fn calculate_match_score(
    profile: &OrganizationProfile,
    grant: &GrantRecord,
    weights: &ScoringWeights,
) -> MatchScore {
    let gp = &grant.grant_profile;

    let shared_issue_areas = shared_tags(&profile.issue_areas, &gp.issue_areas);
    let area_score = overlap_ratio(shared_issue_areas.len(), profile.issue_areas.len());

    let shared_scope_tags = shared_tags(&profile.project_types, &gp.scope_tags);
    let scope_score = overlap_ratio(shared_scope_tags.len(), profile.project_types.len());

    let funding_score = if profile.has_funding_need() {
        calculate_funding_score(gp.funding.effective_cap(), profile.funding_min, profile.funding_max)
    } else {
        FUNDING_BASELINE
    };

    let window_score = calculate_window_score(gp.application_window.is_open_all_year);

    let total = (area_score * weights.issue_areas
        + scope_score * weights.scope
        + funding_score * weights.funding
        + window_score * weights.window)
        * 100.0;

    MatchScore {
        total: clamp_score(total),
        components: ComponentScores {
            issue_areas: area_score,
            scope: scope_score,
            funding: funding_score,
            window: window_score,
        },
        shared_issue_areas,
        shared_scope_tags,
    }
}

/// Score only, for callers that don't need the breakdown
#[inline]
pub fn score(profile: &OrganizationProfile, grant: &GrantRecord, weights: &ScoringWeights) -> f64 {
    calculate_match_score(profile, grant, weights).total
}

/// Profile tags present in the grant's tags, in profile order
fn shared_tags(profile_tags: &[String], grant_tags: &[String]) -> Vec<String> {
    let grant_set: HashSet<&str> = grant_tags.iter().map(String::as_str).collect();
    profile_tags
        .iter()
        .filter(|tag| grant_set.contains(tag.as_str()))
        .cloned()
        .collect()
}

#[inline]
fn overlap_ratio(shared: usize, profile_len: usize) -> f64 {
    shared as f64 / profile_len.max(1) as f64
}

/// Calculate funding score (0-1) for an organization with a stated need
/// A profile maximum of zero means "no upper bound". Amounts outside the
/// cases below (negative bounds or caps) stay at the baseline.
#[inline]
fn calculate_funding_score(cap: Option<f64>, need_min: f64, need_max: f64) -> f64 {
    let cap = match cap {
        Some(cap) if cap > 0.0 => cap,
        _ => return FUNDING_BASELINE,
    };

    if cap >= need_min && (need_max == 0.0 || cap <= need_max) {
        1.0
    } else if cap >= need_min && need_max > 0.0 {
        FUNDING_ABOVE_MAX
    } else if cap < need_min {
        FUNDING_BELOW_MIN
    } else {
        FUNDING_BASELINE
    }
}

#[inline]
fn calculate_window_score(is_open_all_year: bool) -> f64 {
    if is_open_all_year { WINDOW_ROLLING } else { WINDOW_FIXED }
}

#[inline]
fn clamp_score(total: f64) -> f64 {
    if total.is_nan() {
        return 0.0;
    }
    total.clamp(0.0, 100.0)
}
