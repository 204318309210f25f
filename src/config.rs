use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use crate::models::ScoringWeights;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub store: StoreSettings,
    #[serde(default)]
    pub collection: CollectionSettings,
    pub database: DatabaseSettings,
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Firestore REST endpoint and credentials
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_store_endpoint")]
    pub endpoint: String,
    pub project_id: String,
    #[serde(default = "default_store_database")]
    pub database_id: String,
    pub api_key: Option<String>,
    pub access_token: Option<String>,
    pub page_size: Option<u32>,
    pub timeout_secs: Option<u64>,
}

fn default_store_endpoint() -> String { "https://firestore.googleapis.com/v1".to_string() }
fn default_store_database() -> String { "(default)".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSettings {
    #[serde(default = "default_grants_collection")]
    pub grants: String,
    #[serde(default = "default_profiles_collection")]
    pub profiles: String,
    #[serde(default = "default_swipes_collection")]
    pub swipes: String,
}

impl Default for CollectionSettings {
    fn default() -> Self {
        Self {
            grants: default_grants_collection(),
            profiles: default_profiles_collection(),
            swipes: default_swipes_collection(),
        }
    }
}

fn default_grants_collection() -> String { "grants".to_string() }
fn default_profiles_collection() -> String { "npo_profiles".to_string() }
fn default_swipes_collection() -> String { "swipes".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    pub redis_url: String,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_limit")]
    pub default_limit: u16,
    #[serde(default = "default_max_limit")]
    pub max_limit: u16,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

impl MatchingSettings {
    /// Requested count, defaulted and capped
    pub fn resolve_limit(&self, requested: Option<u16>) -> usize {
        requested.unwrap_or(self.default_limit).min(self.max_limit) as usize
    }
}

fn default_limit() -> u16 { 20 }
fn default_max_limit() -> u16 { 100 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_issue_areas_weight")]
    pub issue_areas: f64,
    #[serde(default = "default_scope_weight")]
    pub scope: f64,
    #[serde(default = "default_funding_weight")]
    pub funding: f64,
    #[serde(default = "default_window_weight")]
    pub window: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            issue_areas: default_issue_areas_weight(),
            scope: default_scope_weight(),
            funding: default_funding_weight(),
            window: default_window_weight(),
        }
    }
}

impl From<WeightsConfig> for ScoringWeights {
    fn from(value: WeightsConfig) -> Self {
        ScoringWeights {
            issue_areas: value.issue_areas,
            scope: value.scope,
            funding: value.funding,
            window: value.window,
        }
    }
}

fn default_issue_areas_weight() -> f64 { 0.40 }
fn default_scope_weight() -> f64 { 0.25 }
fn default_funding_weight() -> f64 { 0.25 }
fn default_window_weight() -> f64 { 0.10 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with GRANTMATCH__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., GRANTMATCH__SERVER__PORT -> server.port
            .add_source(environment())
            .build()?;

        let settings = apply_well_known_env(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        settings.try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("GRANTMATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Honor the conventional variables set by hosting platforms
///
/// `DATABASE_URL`, `REDIS_URL` and `FIRESTORE_EMULATOR_HOST` override the
/// corresponding settings when present.
fn apply_well_known_env(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(database_url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", database_url)?;
    }
    if let Ok(redis_url) = env::var("REDIS_URL") {
        builder = builder.set_override("cache.redis_url", redis_url)?;
    }
    if let Ok(emulator_host) = env::var("FIRESTORE_EMULATOR_HOST") {
        builder = builder.set_override("store.endpoint", format!("http://{}/v1", emulator_host))?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.issue_areas, 0.40);
        assert_eq!(weights.scope, 0.25);
        assert_eq!(weights.funding, 0.25);
        assert_eq!(weights.window, 0.10);
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "json");
    }

    #[test]
    fn test_resolve_limit() {
        let matching = MatchingSettings::default();
        assert_eq!(matching.resolve_limit(None), 20);
        assert_eq!(matching.resolve_limit(Some(5)), 5);
        assert_eq!(matching.resolve_limit(Some(500)), 100);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("grant-match-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            r#"
[server]
host = "127.0.0.1"
port = 8080

[store]
project_id = "grants-test"

[database]
url = "postgres://localhost/grant_match"

[cache]
redis_url = "redis://127.0.0.1:6379"

[scoring.weights]
window = 0.2
"#,
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.store.database_id, "(default)");
        assert_eq!(settings.collection.profiles, "npo_profiles");
        assert_eq!(settings.matching.default_limit, 20);
        assert_eq!(settings.scoring.weights.window, 0.2);
        assert_eq!(settings.scoring.weights.issue_areas, 0.40);
    }
}
