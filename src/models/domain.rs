use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// Non-profit organization profile used as the matching input
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct OrganizationProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub organization_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub organization_type: String,
    #[serde(default)]
    pub registration_status: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub issue_areas: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub project_types: Vec<String>,
    #[validate(range(min = 0.0))]
    #[serde(default, deserialize_with = "lenient_number")]
    pub funding_min: f64,
    /// Zero means the organization has no upper bound
    #[validate(range(min = 0.0))]
    #[serde(default, deserialize_with = "lenient_number")]
    pub funding_max: f64,
    #[serde(default)]
    pub funding_urgency: Option<String>,
    #[serde(default)]
    pub years_operating: Option<u32>,
    #[serde(default)]
    pub staff_size: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mission: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl OrganizationProfile {
    /// Whether the organization stated any funding need at all
    pub fn has_funding_need(&self) -> bool {
        self.funding_min > 0.0 || self.funding_max > 0.0
    }
}

/// Grant document as stored in the `grants` collection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GrantRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firestore_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub agency: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub about: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub who_can_apply: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub when_to_apply: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub funding: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub how_to_apply: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub grant_profile: GrantProfile,
    #[serde(default, deserialize_with = "null_as_default")]
    pub documents_required: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl GrantRecord {
    /// Stable identifier for swipes and saved-grant lookups
    ///
    /// Falls back from the store id to the slug in the grant's source URL
    /// (`/grants/<slug>/...`) and finally to a slug of the title.
    pub fn document_id(&self) -> String {
        if let Some(id) = self.firestore_id.as_deref().or(self.id.as_deref()) {
            if !id.is_empty() {
                return id.to_string();
            }
        }

        if let Some(slug) = source_url_slug(&self.source_url) {
            return slug.to_string();
        }

        let title = if self.title.is_empty() { "unknown" } else { &self.title };
        slugify(title, 50)
    }

    /// Whether any of the identifiers this grant has been saved under equals `id`
    pub fn is_identified_by(&self, id: &str) -> bool {
        if id.is_empty() {
            return false;
        }
        self.firestore_id.as_deref() == Some(id)
            || self.id.as_deref() == Some(id)
            || self.source_url == id
    }
}

fn source_url_slug(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once("/grants/")?;
    let slug = rest.split(['/', '?', '#']).next()?;
    if slug.is_empty() { None } else { Some(slug) }
}

fn slugify(text: &str, max_len: usize) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').chars().take(max_len).collect()
}

/// Structured matching attributes of a grant
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GrantProfile {
    #[serde(default, deserialize_with = "null_as_default")]
    pub issue_areas: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub scope_tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub funding: FundingInfo,
    #[serde(default, deserialize_with = "null_as_default")]
    pub eligibility: Eligibility,
    #[serde(default, deserialize_with = "null_as_default")]
    pub application_window: ApplicationWindow,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FundingInfo {
    #[serde(default, deserialize_with = "lenient_amount")]
    pub cap_amount_sgd: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub min_amount_sgd: Option<f64>,
    #[serde(default)]
    pub raw: Option<String>,
}

impl FundingInfo {
    /// Amount compared against an organization's funding need
    ///
    /// The cap wins over the minimum. A stored amount of zero counts as
    /// unspecified; any other amount, negative included, is kept.
    pub fn effective_cap(&self) -> Option<f64> {
        non_zero(self.cap_amount_sgd).or_else(|| non_zero(self.min_amount_sgd))
    }

    pub fn cap(&self) -> Option<f64> {
        positive(self.cap_amount_sgd)
    }

    pub fn min(&self) -> Option<f64> {
        positive(self.min_amount_sgd)
    }
}

#[inline]
fn positive(amount: Option<f64>) -> Option<f64> {
    amount.filter(|a| *a > 0.0)
}

#[inline]
fn non_zero(amount: Option<f64>) -> Option<f64> {
    amount.filter(|a| *a != 0.0)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Eligibility {
    #[serde(default, deserialize_with = "null_as_default")]
    pub organization_types: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub requirements: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationWindow {
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_open_all_year: bool,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dates: Vec<String>,
    #[serde(default)]
    pub raw: Option<String>,
}

/// Per-component scores, each in 0..=1 before weighting
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    #[serde(rename = "issueAreas")]
    pub issue_areas: f64,
    pub scope: f64,
    pub funding: f64,
    pub window: f64,
}

/// Scored match result, borrowing the grant it was computed for
#[derive(Debug, Clone, Serialize)]
pub struct ScoredMatch<'a> {
    #[serde(rename = "grantId")]
    pub grant_id: String,
    pub grant: &'a GrantRecord,
    #[serde(rename = "matchScore")]
    pub match_score: f64,
    #[serde(rename = "componentScores")]
    pub component_scores: ComponentScores,
    #[serde(rename = "sharedIssueAreas")]
    pub shared_issue_areas: Vec<String>,
    #[serde(rename = "sharedScopeTags")]
    pub shared_scope_tags: Vec<String>,
}

/// Scoring weights, as fractions of the 100-point scale
#[derive(Debug, Clone, Copy)]
pub struct ScoringWeights {
    pub issue_areas: f64,
    pub scope: f64,
    pub funding: f64,
    pub window: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            issue_areas: 0.40,
            scope: 0.25,
            funding: 0.25,
            window: 0.10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeAction {
    Like,
    Dislike,
}

/// A user's like/dislike decision on a grant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Swipe {
    pub user_id: String,
    pub grant_id: String,
    pub action: SwipeAction,
    pub match_score: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Browse-time filters over the grant catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GrantFilters {
    #[serde(rename = "issueAreas", default)]
    pub issue_areas: Vec<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(rename = "fundingMin", default)]
    pub funding_min: f64,
    #[serde(rename = "fundingMax", default)]
    pub funding_max: Option<f64>,
    #[serde(rename = "deadlineAfter", default)]
    pub deadline_after: Option<NaiveDate>,
    #[serde(rename = "deadlineBefore", default)]
    pub deadline_before: Option<NaiveDate>,
    #[serde(rename = "openOn", default)]
    pub open_on: Option<NaiveDate>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Amounts arrive as numbers, numeric strings, or null
fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(f64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    let amount = match Option::<Amount>::deserialize(deserializer)? {
        Some(Amount::Number(n)) => Some(n),
        Some(Amount::Text(s)) => s.trim().replace(',', "").parse::<f64>().ok(),
        Some(Amount::Other(_)) | None => None,
    };

    Ok(amount.filter(|n| n.is_finite()))
}

/// Profile amounts: lenient like grant amounts, but never negative
fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match lenient_amount(deserializer)? {
        Some(n) if n < 0.0 => Err(serde::de::Error::custom(format!(
            "funding amount must not be negative, got {}",
            n
        ))),
        amount => Ok(amount.unwrap_or(0.0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_grant_with_missing_profile_deserializes() {
        let grant: GrantRecord = serde_json::from_value(json!({
            "title": "Community Fund",
            "grant_profile": null
        }))
        .unwrap();

        assert!(grant.grant_profile.issue_areas.is_empty());
        assert!(!grant.grant_profile.application_window.is_open_all_year);
        assert_eq!(grant.grant_profile.funding.effective_cap(), None);
    }

    #[test]
    fn test_lenient_amounts() {
        let funding: FundingInfo = serde_json::from_value(json!({
            "cap_amount_sgd": "50,000",
            "min_amount_sgd": true
        }))
        .unwrap();

        assert_eq!(funding.cap_amount_sgd, Some(50_000.0));
        assert_eq!(funding.min_amount_sgd, None);
    }

    #[test]
    fn test_zero_cap_falls_back_to_min() {
        let funding = FundingInfo {
            cap_amount_sgd: Some(0.0),
            min_amount_sgd: Some(5_000.0),
            raw: None,
        };

        assert_eq!(funding.effective_cap(), Some(5_000.0));
    }

    #[test]
    fn test_negative_cap_kept_over_min() {
        let funding = FundingInfo {
            cap_amount_sgd: Some(-5.0),
            min_amount_sgd: Some(20_000.0),
            raw: None,
        };

        assert_eq!(funding.effective_cap(), Some(-5.0));
        assert_eq!(funding.cap(), None);
    }

    #[test]
    fn test_profile_rejects_negative_funding() {
        let result = serde_json::from_value::<OrganizationProfile>(json!({
            "funding_min": 10000,
            "funding_max": -1
        }));
        assert!(result.is_err());

        let result = serde_json::from_value::<OrganizationProfile>(json!({
            "funding_min": "-500"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_document_id_fallbacks() {
        let mut grant = GrantRecord {
            source_url: "https://oursggrants.gov.sg/grants/aicccmda/instruction".to_string(),
            title: "Arts & Culture Fund".to_string(),
            ..Default::default()
        };
        assert_eq!(grant.document_id(), "aicccmda");

        grant.source_url = String::new();
        assert_eq!(grant.document_id(), "arts-culture-fund");

        grant.firestore_id = Some("doc123".to_string());
        assert_eq!(grant.document_id(), "doc123");
    }

    #[test]
    fn test_is_identified_by() {
        let grant = GrantRecord {
            id: Some("legacy".to_string()),
            source_url: "https://example.org/grants/x".to_string(),
            ..Default::default()
        };

        assert!(grant.is_identified_by("legacy"));
        assert!(grant.is_identified_by("https://example.org/grants/x"));
        assert!(!grant.is_identified_by(""));
        assert!(!grant.is_identified_by("other"));
    }

    #[test]
    fn test_profile_null_tags() {
        let profile: OrganizationProfile = serde_json::from_value(json!({
            "organization_name": "Helping Hands",
            "issue_areas": null,
            "funding_min": "1000"
        }))
        .unwrap();

        assert!(profile.issue_areas.is_empty());
        assert_eq!(profile.funding_min, 1000.0);
        assert!(profile.has_funding_need());
    }
}
