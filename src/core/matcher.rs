use crate::models::{GrantRecord, OrganizationProfile, ScoredMatch, ScoringWeights};
use crate::core::scoring::calculate_match_score;

/// Number of matches returned when the caller doesn't ask for a specific count
pub const DEFAULT_LIMIT: usize = 20;

/// Result of the matching process
#[derive(Debug)]
pub struct MatchResult<'a> {
    pub matches: Vec<ScoredMatch<'a>>,
    pub total_candidates: usize,
}

/// Ranks grants against an organization profile
///
/// Every call rescores the whole candidate slice; there is no index or
/// incremental state.
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
}

impl Matcher {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Rank grants for an organization
    ///
    /// # Arguments
    /// * `profile` - The organization being matched
    /// * `grants` - Candidate grants, already fetched
    /// * `limit` - Maximum number of matches to return
    ///
    /// # Returns
    /// MatchResult with `min(limit, grants.len())` matches, best first. Grants
    /// with equal scores keep their input order.
    pub fn rank<'a>(
        &self,
        profile: &OrganizationProfile,
        grants: &'a [GrantRecord],
        limit: usize,
    ) -> MatchResult<'a> {
        self.rank_iter(profile, grants.iter(), limit)
    }

    /// Same as [`Matcher::rank`], over any sequence of borrowed grants
    pub fn rank_iter<'a, I>(
        &self,
        profile: &OrganizationProfile,
        grants: I,
        limit: usize,
    ) -> MatchResult<'a>
    where
        I: IntoIterator<Item = &'a GrantRecord>,
    {
        let mut scored_matches: Vec<ScoredMatch<'a>> = grants
            .into_iter()
            .map(|grant| {
                let score = calculate_match_score(profile, grant, &self.weights);
                ScoredMatch {
                    grant_id: grant.document_id(),
                    grant,
                    match_score: score.total,
                    component_scores: score.components,
                    shared_issue_areas: score.shared_issue_areas,
                    shared_scope_tags: score.shared_scope_tags,
                }
            })
            .collect();

        let total_candidates = scored_matches.len();

        // Stable sort, so ties keep catalog order
        scored_matches.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
        scored_matches.truncate(limit);

        MatchResult {
            matches: scored_matches,
            total_candidates,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}
