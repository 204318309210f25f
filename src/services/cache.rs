use redis::aio::ConnectionManager;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache miss: {0}")]
    CacheMiss(String),
}

/// Two-tier cache for store reads
///
/// L1 is a per-process moka cache; L2 is Redis, shared across instances.
/// Both tiers expire entries after the same TTL.
pub struct CacheManager {
    redis: Arc<tokio::sync::Mutex<ConnectionManager>>,
    l1_cache: moka::future::Cache<String, Arc<Vec<u8>>>,
    ttl_secs: u64,
}

impl CacheManager {
    /// Create a new cache manager
    pub async fn new(redis_url: &str, l1_size: u64, ttl_secs: u64) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let redis = ConnectionManager::new(client).await?;

        let l1_cache = moka::future::CacheBuilder::new(l1_size)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Ok(Self {
            redis: Arc::new(tokio::sync::Mutex::new(redis)),
            l1_cache,
            ttl_secs,
        })
    }

    /// Get a value, trying L1 before L2
    pub async fn get<T>(&self, key: &str) -> Result<T, CacheError>
    where
        T: DeserializeOwned,
    {
        if let Some(bytes) = self.l1_cache.get(key).await {
            tracing::trace!("L1 cache hit: {}", key);
            return Ok(serde_json::from_slice(&bytes)?);
        }

        let mut conn = self.redis.lock().await;
        let value: Option<Vec<u8>> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut *conn)
            .await?;
        drop(conn);

        match value {
            Some(bytes) => {
                tracing::trace!("L2 cache hit: {}", key);
                let decoded = serde_json::from_slice(&bytes)?;
                self.l1_cache.insert(key.to_string(), Arc::new(bytes)).await;
                Ok(decoded)
            }
            None => {
                tracing::trace!("Cache miss: {}", key);
                Err(CacheError::CacheMiss(key.to_string()))
            }
        }
    }

    /// Set a value in both tiers
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize + ?Sized,
    {
        let bytes = Arc::new(serde_json::to_vec(value)?);

        // L1 first, so local reads keep working while Redis is down
        self.l1_cache.insert(key.to_string(), Arc::clone(&bytes)).await;

        let mut conn = self.redis.lock().await;
        redis::cmd("SETEX")
            .arg(key)
            .arg(self.ttl_secs)
            .arg(bytes.as_slice())
            .query_async::<()>(&mut *conn)
            .await?;
        drop(conn);

        tracing::trace!("Cache set: {}", key);
        Ok(())
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// The full grant catalog
    pub fn grants() -> String {
        "grants:all".to_string()
    }

    /// An organization profile
    pub fn profile(user_id: &str) -> String {
        format!("profile:{}", user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "Requires Redis"]
    async fn test_cache_set_get() {
        let cache = CacheManager::new("redis://127.0.0.1:6379", 1000, 60)
            .await
            .expect("Failed to create cache");

        let key = CacheKey::profile("cache-test");
        let value = vec!["Eldercare".to_string(), "Youth".to_string()];

        cache.set(&key, &value).await.unwrap();
        let result: Vec<String> = cache.get(&key).await.unwrap();
        assert_eq!(result, value);
    }

    #[tokio::test]
    #[ignore = "Requires Redis"]
    async fn test_set_fills_l1_before_redis() {
        let cache = CacheManager::new("redis://127.0.0.1:6379", 1000, 60)
            .await
            .expect("Failed to create cache");

        let key = CacheKey::profile("cache-l1");
        let _ = cache.set(&key, &"Helping Hands").await;

        let bytes = cache.l1_cache.get(&key).await.expect("L1 entry missing");
        assert_eq!(bytes.as_slice(), br#""Helping Hands""#);
    }

    #[test]
    fn test_cache_key_builder() {
        assert_eq!(CacheKey::grants(), "grants:all");
        assert_eq!(CacheKey::profile("user123"), "profile:user123");
    }
}
