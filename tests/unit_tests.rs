// Unit tests for Grant Match scoring

use grant_match::core::{
    scoring::calculate_match_score,
    window::{deadline, is_open_on, parse_window_date},
};
use grant_match::models::{ApplicationWindow, GrantRecord, OrganizationProfile, ScoringWeights};
use serde_json::json;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn profile(issue_areas: &[&str], project_types: &[&str], min: f64, max: f64) -> OrganizationProfile {
    OrganizationProfile {
        organization_name: "Test Org".to_string(),
        issue_areas: issue_areas.iter().map(|s| s.to_string()).collect(),
        project_types: project_types.iter().map(|s| s.to_string()).collect(),
        funding_min: min,
        funding_max: max,
        ..Default::default()
    }
}

fn grant_from_json(value: serde_json::Value) -> GrantRecord {
    serde_json::from_value(value).expect("grant should deserialize")
}

#[test]
fn test_disjoint_tags_baseline_score() {
    let p = profile(&["Youth"], &["Programme"], 0.0, 0.0);
    let g = grant_from_json(json!({
        "title": "Arts Grant",
        "grant_profile": {
            "issue_areas": ["Arts"],
            "scope_tags": ["Infrastructure"]
        }
    }));

    let result = calculate_match_score(&p, &g, &ScoringWeights::default());
    assert!(approx(result.total, 18.5), "got {}", result.total);
}

#[test]
fn test_full_match_from_stored_document() {
    let p = profile(&["Eldercare"], &["Programme"], 10_000.0, 50_000.0);
    let g = grant_from_json(json!({
        "title": "Seniors Grant",
        "grant_profile": {
            "issue_areas": ["Eldercare", "Health"],
            "scope_tags": ["Programme"],
            "funding": { "cap_amount_sgd": 50000 },
            "application_window": { "is_open_all_year": true }
        }
    }));

    let result = calculate_match_score(&p, &g, &ScoringWeights::default());
    assert!(approx(result.total, 100.0), "got {}", result.total);
}

#[test]
fn test_min_amount_used_when_cap_missing() {
    let p = profile(&[], &[], 10_000.0, 20_000.0);
    let g = grant_from_json(json!({
        "grant_profile": {
            "funding": { "cap_amount_sgd": null, "min_amount_sgd": 30000 }
        }
    }));

    let result = calculate_match_score(&p, &g, &ScoringWeights::default());
    assert!(approx(result.components.funding, 0.8));
}

#[test]
fn test_cap_below_min_contributes_seven_and_a_half() {
    let p = profile(&[], &[], 10_000.0, 0.0);
    let g = grant_from_json(json!({
        "grant_profile": { "funding": { "cap_amount_sgd": 2000 } }
    }));

    let result = calculate_match_score(&p, &g, &ScoringWeights::default());
    assert!(approx(result.components.funding * 25.0, 7.5));
}

#[test]
fn test_missing_fields_degrade_to_baseline() {
    let p = OrganizationProfile::default();
    let g = grant_from_json(json!({}));

    let result = calculate_match_score(&p, &g, &ScoringWeights::default());
    assert!(approx(result.total, 18.5));
}

#[test]
fn test_window_helpers() {
    let window = ApplicationWindow {
        start_date: Some("2025-02-01".to_string()),
        end_date: Some("2025-04-30T23:59:59Z".to_string()),
        ..Default::default()
    };

    let end = parse_window_date("2025-04-30").unwrap();
    assert_eq!(deadline(&window), Some(end));
    assert!(is_open_on(&window, end));
    assert!(!is_open_on(&window, parse_window_date("2025-01-31").unwrap()));
}
