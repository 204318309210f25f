use std::collections::HashSet;
use crate::models::{GrantRecord, GrantsSummary};

/// Count grants, distinct agencies and distinct issue-area tags
pub fn summarize(grants: &[GrantRecord]) -> GrantsSummary {
    let agencies: HashSet<&str> = grants.iter().map(|g| g.agency.as_str()).collect();
    let issue_areas: HashSet<&str> = grants
        .iter()
        .flat_map(|g| g.grant_profile.issue_areas.iter().map(String::as_str))
        .collect();

    GrantsSummary {
        total_grants: grants.len(),
        agencies: agencies.len(),
        issue_areas: issue_areas.len(),
    }
}

/// Whether the grant is one of the excluded ids
#[inline]
pub fn is_excluded(grant: &GrantRecord, excluded_ids: &HashSet<String>) -> bool {
    !excluded_ids.is_empty() && excluded_ids.contains(&grant.document_id())
}

/// First `limit` grants the user hasn't liked yet
pub fn recommendations<'a>(
    grants: &'a [GrantRecord],
    liked_ids: &HashSet<String>,
    limit: usize,
) -> Vec<&'a GrantRecord> {
    grants
        .iter()
        .filter(|grant| !is_excluded(grant, liked_ids))
        .take(limit)
        .collect()
}

/// Grants saved by the user
///
/// Liked ids may be a store id, a legacy id or the grant's source URL.
pub fn saved_grants<'a>(grants: &'a [GrantRecord], liked_ids: &HashSet<String>) -> Vec<&'a GrantRecord> {
    grants
        .iter()
        .filter(|grant| liked_ids.iter().any(|id| grant.is_identified_by(id)))
        .collect()
}
