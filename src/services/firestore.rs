use crate::models::{GrantRecord, OrganizationProfile, Swipe};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::{Map, Number, Value};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with the document store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid API key or token")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Collection names in the document store
#[derive(Debug, Clone)]
pub struct StoreCollections {
    pub grants: String,
    pub profiles: String,
    pub swipes: String,
}

/// Firestore REST client
///
/// Handles all communication with the document store:
/// - Listing the grant catalog
/// - Reading and writing organization profiles
/// - Mirroring swipes
pub struct FirestoreClient {
    documents_url: String,
    api_key: Option<String>,
    access_token: Option<String>,
    page_size: u32,
    client: Client,
    collections: StoreCollections,
}

impl FirestoreClient {
    /// Create a new Firestore client
    pub fn new(
        endpoint: &str,
        project_id: &str,
        database_id: &str,
        collections: StoreCollections,
    ) -> Result<Self, StoreError> {
        Self::with_timeout(endpoint, project_id, database_id, collections, Duration::from_secs(30))
    }

    pub fn with_timeout(
        endpoint: &str,
        project_id: &str,
        database_id: &str,
        collections: StoreCollections,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            documents_url: format!(
                "{}/projects/{}/databases/{}/documents",
                endpoint.trim_end_matches('/'),
                project_id,
                urlencoding::encode(database_id),
            ),
            api_key: None,
            access_token: None,
            page_size: 300,
            client,
            collections,
        })
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.is_empty());
        self
    }

    pub fn with_access_token(mut self, access_token: Option<String>) -> Self {
        self.access_token = access_token.filter(|t| !t.is_empty());
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    fn authorize(&self, mut request: RequestBuilder) -> RequestBuilder {
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key)]);
        }
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }
        request
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.documents_url, collection)
    }

    /// Fetch the whole grant catalog, following page tokens
    ///
    /// Documents that don't parse as grants are skipped with a warning.
    pub async fn fetch_grants(&self) -> Result<Vec<GrantRecord>, StoreError> {
        let url = self.collection_url(&self.collections.grants);
        let mut grants = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&url)
                .query(&[("pageSize", self.page_size.to_string())]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let response = self.authorize(request).send().await?;
            let json = check_response(response, "list grants").await?;

            let documents = json
                .get("documents")
                .and_then(|d| d.as_array())
                .map(Vec::as_slice)
                .unwrap_or_default();

            for doc in documents {
                let (id, data) = match decode_document(doc) {
                    Ok(decoded) => decoded,
                    Err(e) => {
                        tracing::warn!("Skipping grant document: {}", e);
                        continue;
                    }
                };
                match serde_json::from_value::<GrantRecord>(data) {
                    Ok(mut grant) => {
                        grant.firestore_id = Some(id.clone());
                        if grant.id.is_none() {
                            grant.id = Some(id);
                        }
                        grants.push(grant);
                    }
                    Err(e) => tracing::warn!("Skipping malformed grant document {}: {}", id, e),
                }
            }

            page_token = json
                .get("nextPageToken")
                .and_then(|t| t.as_str())
                .filter(|t| !t.is_empty())
                .map(str::to_string);

            if page_token.is_none() {
                break;
            }
        }

        tracing::debug!("Fetched {} grants from {}", grants.len(), self.collections.grants);

        Ok(grants)
    }

    /// Get an organization profile by id
    pub async fn get_profile(&self, user_id: &str) -> Result<OrganizationProfile, StoreError> {
        let url = format!(
            "{}/{}",
            self.collection_url(&self.collections.profiles),
            urlencoding::encode(user_id)
        );

        tracing::debug!("Fetching profile for user: {}", user_id);

        let response = self.authorize(self.client.get(&url)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(format!("Profile not found for user {}", user_id)));
        }
        let json = check_response(response, "fetch profile").await?;

        let (id, data) = decode_document(&json)?;
        let mut profile: OrganizationProfile = serde_json::from_value(data)
            .map_err(|e| StoreError::InvalidResponse(format!("Failed to parse profile: {}", e)))?;
        profile.user_id.get_or_insert(id);

        Ok(profile)
    }

    /// Store a new organization profile and return its id
    pub async fn save_profile(&self, profile: &OrganizationProfile) -> Result<String, StoreError> {
        let user_id = uuid::Uuid::new_v4().simple().to_string();

        let mut stored = profile.clone();
        stored.user_id = Some(user_id.clone());

        let mut payload = serde_json::to_value(&stored)
            .map_err(|e| StoreError::InvalidResponse(format!("Failed to encode profile: {}", e)))?;
        if let Some(obj) = payload.as_object_mut() {
            obj.insert("created_at".to_string(), Value::String(chrono::Utc::now().to_rfc3339()));
        }

        self.create_document(&self.collections.profiles, Some(&user_id), &payload)
            .await?;

        tracing::info!("Saved profile {}", user_id);

        Ok(user_id)
    }

    /// Mirror a swipe into the document store
    pub async fn record_swipe(&self, swipe: &Swipe) -> Result<(), StoreError> {
        let payload = serde_json::to_value(swipe)
            .map_err(|e| StoreError::InvalidResponse(format!("Failed to encode swipe: {}", e)))?;

        self.create_document(&self.collections.swipes, None, &payload)
            .await?;

        tracing::debug!("Recorded swipe: {} -> {} ({:?})", swipe.user_id, swipe.grant_id, swipe.action);

        Ok(())
    }

    async fn create_document(
        &self,
        collection: &str,
        document_id: Option<&str>,
        data: &Value,
    ) -> Result<Value, StoreError> {
        let mut request = self
            .client
            .post(self.collection_url(collection))
            .json(&encode_document(data));
        if let Some(id) = document_id {
            request = request.query(&[("documentId", id)]);
        }

        let response = self.authorize(request).send().await?;
        check_response(response, "create document").await
    }
}

async fn check_response(response: reqwest::Response, action: &str) -> Result<Value, StoreError> {
    let status = response.status();

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(StoreError::Unauthorized);
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
        tracing::error!("Failed to {}: {} - {}", action, status, body);
        return Err(StoreError::ApiError(format!("Failed to {}: {}", action, status)));
    }

    Ok(response.json().await?)
}

/// Split a Firestore document into its id and plain JSON fields
pub fn decode_document(doc: &Value) -> Result<(String, Value), StoreError> {
    let name = doc
        .get("name")
        .and_then(|n| n.as_str())
        .ok_or_else(|| StoreError::InvalidResponse("Document without name".into()))?;

    let id = name.rsplit('/').next().unwrap_or(name).to_string();

    let fields = doc
        .get("fields")
        .and_then(|f| f.as_object())
        .map(decode_fields)
        .unwrap_or_default();

    Ok((id, Value::Object(fields)))
}

fn decode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, value)| (key.clone(), decode_value(value)))
        .collect()
}

/// Convert a Firestore typed value into plain JSON
///
/// Integers arrive as decimal strings and are turned back into numbers.
/// Unknown value kinds decode to null.
pub fn decode_value(value: &Value) -> Value {
    let Some((kind, inner)) = value.as_object().and_then(|o| o.iter().next()) else {
        return Value::Null;
    };

    match kind.as_str() {
        "nullValue" => Value::Null,
        "booleanValue" => inner.as_bool().map(Value::Bool).unwrap_or(Value::Null),
        "integerValue" => inner
            .as_str()
            .and_then(|s| s.parse::<i64>().ok())
            .map(|n| Value::Number(n.into()))
            .or_else(|| inner.as_i64().map(|n| Value::Number(n.into())))
            .unwrap_or(Value::Null),
        "doubleValue" => inner
            .as_f64()
            .or_else(|| inner.as_str().and_then(|s| s.parse().ok()))
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner.clone(),
        "geoPointValue" => inner.clone(),
        "arrayValue" => Value::Array(
            inner
                .get("values")
                .and_then(|v| v.as_array())
                .map(|values| values.iter().map(decode_value).collect())
                .unwrap_or_default(),
        ),
        "mapValue" => Value::Object(
            inner
                .get("fields")
                .and_then(|f| f.as_object())
                .map(decode_fields)
                .unwrap_or_default(),
        ),
        _ => Value::Null,
    }
}

/// Wrap a plain JSON object as a Firestore document body
pub fn encode_document(data: &Value) -> Value {
    let fields: Map<String, Value> = data
        .as_object()
        .map(|obj| obj.iter().map(|(k, v)| (k.clone(), encode_value(v))).collect())
        .unwrap_or_default();

    serde_json::json!({ "fields": fields })
}

/// Convert plain JSON into a Firestore typed value
pub fn encode_value(value: &Value) -> Value {
    use serde_json::json;

    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64().unwrap_or(0.0) }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(values) => json!({
            "arrayValue": { "values": values.iter().map(encode_value).collect::<Vec<_>>() }
        }),
        Value::Object(obj) => json!({
            "mapValue": {
                "fields": obj
                    .iter()
                    .map(|(k, v)| (k.clone(), encode_value(v)))
                    .collect::<Map<String, Value>>()
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn collections() -> StoreCollections {
        StoreCollections {
            grants: "grants".to_string(),
            profiles: "npo_profiles".to_string(),
            swipes: "swipes".to_string(),
        }
    }

    #[test]
    fn test_client_urls() {
        let client = FirestoreClient::new(
            "https://firestore.googleapis.com/v1/",
            "grants-prod",
            "(default)",
            collections(),
        )
        .unwrap();

        assert_eq!(
            client.collection_url("grants"),
            "https://firestore.googleapis.com/v1/projects/grants-prod/databases/%28default%29/documents/grants"
        );
    }

    #[test]
    fn test_decode_document() {
        let doc = json!({
            "name": "projects/p/databases/(default)/documents/grants/abc123",
            "fields": {
                "title": { "stringValue": "Seniors Fund" },
                "grant_profile": { "mapValue": { "fields": {
                    "issue_areas": { "arrayValue": { "values": [ { "stringValue": "Eldercare" } ] } },
                    "scope_tags": { "arrayValue": {} },
                    "funding": { "mapValue": { "fields": {
                        "cap_amount_sgd": { "integerValue": "50000" },
                        "min_amount_sgd": { "doubleValue": 1500.5 }
                    } } },
                    "application_window": { "mapValue": { "fields": {
                        "is_open_all_year": { "booleanValue": true },
                        "end_date": { "nullValue": null }
                    } } }
                } } }
            }
        });

        let (id, data) = decode_document(&doc).unwrap();
        let grant: GrantRecord = serde_json::from_value(data).unwrap();

        assert_eq!(id, "abc123");
        assert_eq!(grant.title, "Seniors Fund");
        assert_eq!(grant.grant_profile.issue_areas, vec!["Eldercare"]);
        assert!(grant.grant_profile.scope_tags.is_empty());
        assert_eq!(grant.grant_profile.funding.cap_amount_sgd, Some(50_000.0));
        assert_eq!(grant.grant_profile.funding.min_amount_sgd, Some(1500.5));
        assert!(grant.grant_profile.application_window.is_open_all_year);
    }

    #[test]
    fn test_encode_value() {
        let encoded = encode_value(&json!({ "n": 3, "x": 1.5, "tags": ["a"], "none": null }));

        assert_eq!(
            encoded,
            json!({ "mapValue": { "fields": {
                "n": { "integerValue": "3" },
                "x": { "doubleValue": 1.5 },
                "tags": { "arrayValue": { "values": [ { "stringValue": "a" } ] } },
                "none": { "nullValue": null }
            } } })
        );
    }

    #[test]
    fn test_unknown_kind_decodes_to_null() {
        assert_eq!(decode_value(&json!({ "somethingNew": 1 })), Value::Null);
        assert_eq!(decode_value(&json!("bare")), Value::Null);
    }
}
