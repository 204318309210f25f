use crate::models::{GrantFilters, GrantRecord};
use crate::core::window::{deadline, is_open_on};

/// Check if a grant passes the browse filters
///
/// A grant that leaves a field unspecified is never rejected on that field.
#[inline]
pub fn matches_filters(grant: &GrantRecord, filters: &GrantFilters) -> bool {
    let gp = &grant.grant_profile;

    // Issue areas: any overlap with the selection
    if !filters.issue_areas.is_empty()
        && !gp.issue_areas.is_empty()
        && !filters.issue_areas.iter().any(|a| gp.issue_areas.contains(a)) {
        return false;
    }

    // Scope: any of the grant's scope tags in the selection
    if !filters.scopes.is_empty()
        && !gp.scope_tags.is_empty()
        && !gp.scope_tags.iter().any(|s| filters.scopes.contains(s)) {
        return false;
    }

    // Funding: the grant's cap must reach the requested minimum
    if let Some(cap) = gp.funding.cap() {
        if cap < filters.funding_min {
            return false;
        }
    }

    // ...and its own minimum must not exceed the requested maximum
    if let (Some(grant_min), Some(max)) = (gp.funding.min(), filters.funding_max) {
        if grant_min > max {
            return false;
        }
    }

    if let Some(grant_deadline) = deadline(&gp.application_window) {
        if filters.deadline_after.is_some_and(|after| grant_deadline < after) {
            return false;
        }
        if filters.deadline_before.is_some_and(|before| grant_deadline > before) {
            return false;
        }
    }

    if let Some(date) = filters.open_on {
        if !is_open_on(&gp.application_window, date) {
            return false;
        }
    }

    true
}

/// Apply filters to a catalog, keeping catalog order
pub fn apply_filters<'a>(grants: &'a [GrantRecord], filters: &GrantFilters) -> Vec<&'a GrantRecord> {
    grants
        .iter()
        .filter(|grant| matches_filters(grant, filters))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::models::{ApplicationWindow, FundingInfo, GrantProfile};

    fn create_test_grant(
        issue_areas: &[&str],
        scope_tags: &[&str],
        cap: Option<f64>,
        min: Option<f64>,
        end_date: Option<&str>,
    ) -> GrantRecord {
        GrantRecord {
            title: "Filter Grant".to_string(),
            grant_profile: GrantProfile {
                issue_areas: issue_areas.iter().map(|s| s.to_string()).collect(),
                scope_tags: scope_tags.iter().map(|s| s.to_string()).collect(),
                funding: FundingInfo {
                    cap_amount_sgd: cap,
                    min_amount_sgd: min,
                    raw: None,
                },
                application_window: ApplicationWindow {
                    end_date: end_date.map(str::to_string),
                    ..Default::default()
                },
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_empty_filters_pass_everything() {
        let grant = create_test_grant(&["Youth"], &["Programme"], Some(1_000.0), None, None);
        assert!(matches_filters(&grant, &GrantFilters::default()));
    }

    #[test]
    fn test_issue_area_filter() {
        let filters = GrantFilters {
            issue_areas: vec!["Eldercare".to_string()],
            ..Default::default()
        };

        assert!(!matches_filters(&create_test_grant(&["Youth"], &[], None, None, None), &filters));
        assert!(matches_filters(&create_test_grant(&["Youth", "Eldercare"], &[], None, None, None), &filters));
        // Untagged grants are kept
        assert!(matches_filters(&create_test_grant(&[], &[], None, None, None), &filters));
    }

    #[test]
    fn test_scope_filter() {
        let filters = GrantFilters {
            scopes: vec!["Infrastructure".to_string()],
            ..Default::default()
        };

        assert!(!matches_filters(&create_test_grant(&[], &["Programme"], None, None, None), &filters));
        assert!(matches_filters(&create_test_grant(&[], &["Infrastructure"], None, None, None), &filters));
    }

    #[test]
    fn test_funding_filter() {
        let filters = GrantFilters {
            funding_min: 10_000.0,
            funding_max: Some(50_000.0),
            ..Default::default()
        };

        assert!(!matches_filters(&create_test_grant(&[], &[], Some(5_000.0), None, None), &filters));
        assert!(!matches_filters(&create_test_grant(&[], &[], None, Some(60_000.0), None), &filters));
        assert!(matches_filters(&create_test_grant(&[], &[], Some(20_000.0), Some(1_000.0), None), &filters));
        assert!(matches_filters(&create_test_grant(&[], &[], None, None, None), &filters));
    }

    #[test]
    fn test_deadline_filter() {
        let filters = GrantFilters {
            deadline_after: Some(date(2025, 1, 1)),
            deadline_before: Some(date(2025, 6, 30)),
            ..Default::default()
        };

        assert!(!matches_filters(&create_test_grant(&[], &[], None, None, Some("2024-12-31")), &filters));
        assert!(!matches_filters(&create_test_grant(&[], &[], None, None, Some("2025-07-01")), &filters));
        assert!(matches_filters(&create_test_grant(&[], &[], None, None, Some("2025-03-15")), &filters));
        assert!(matches_filters(&create_test_grant(&[], &[], None, None, None), &filters));
    }

    #[test]
    fn test_apply_filters_keeps_order() {
        let grants = vec![
            create_test_grant(&["Youth"], &[], None, None, None),
            create_test_grant(&["Arts"], &[], None, None, None),
            create_test_grant(&["Youth", "Arts"], &[], None, None, None),
        ];
        let filters = GrantFilters {
            issue_areas: vec!["Youth".to_string()],
            ..Default::default()
        };

        let kept = apply_filters(&grants, &filters);

        assert_eq!(kept.len(), 2);
        assert!(std::ptr::eq(kept[0], &grants[0]));
        assert!(std::ptr::eq(kept[1], &grants[2]));
    }
}
