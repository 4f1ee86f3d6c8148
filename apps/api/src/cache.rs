//! URL-list cache used by the crawler to remember resolved sitemaps.
//!
//! Injected into `SiteCrawler` as `Arc<dyn UrlListCache>`. Redis backs it in
//! production; `MemoryUrlCache` serves tests and local runs without Redis.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use thiserror::Error;
use tokio::time::Instant;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Cached value is not a URL list: {0}")]
    Decode(#[from] serde_json::Error),
}

#[async_trait]
pub trait UrlListCache: Send + Sync {
    /// Returns the cached list, or `None` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<String>>, CacheError>;

    async fn put(&self, key: &str, urls: &[String], ttl: Duration) -> Result<(), CacheError>;

    async fn expire(&self, key: &str) -> Result<(), CacheError>;
}

#[derive(Clone)]
pub struct RedisUrlCache {
    client: redis::Client,
}

impl RedisUrlCache {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UrlListCache for RedisUrlCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<String>>, CacheError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw: Option<String> = conn.get(key).await?;
        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, urls: &[String], ttl: Duration) -> Result<(), CacheError> {
        let payload = serde_json::to_string(urls)?;
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set_ex::<_, _, ()>(key, payload, ttl.as_secs().max(1))
            .await?;
        Ok(())
    }

    async fn expire(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del::<_, ()>(key).await?;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryUrlCache {
    entries: Mutex<HashMap<String, (Vec<String>, Instant)>>,
}

impl MemoryUrlCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UrlListCache for MemoryUrlCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<String>>, CacheError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(key) {
            Some((urls, expires_at)) if Instant::now() < *expires_at => Ok(Some(urls.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Expired entries for every key are dropped on each write.
    async fn put(&self, key: &str, urls: &[String], ttl: Duration) -> Result<(), CacheError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.retain(|_, (_, expires_at)| now < *expires_at);
        entries.insert(key.to_string(), (urls.to_vec(), now + ttl));
        Ok(())
    }

    async fn expire(&self, key: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls() -> Vec<String> {
        vec!["https://a.test/".to_string(), "https://a.test/b".to_string()]
    }

    #[tokio::test(start_paused = true)]
    async fn test_memory_cache_hit_within_ttl() {
        let cache = MemoryUrlCache::new();
        cache
            .put("sitemap:a", &urls(), Duration::from_secs(3600))
            .await
            .unwrap();
        tokio::time::advance(Duration::from_secs(3599)).await;
        assert_eq!(cache.get("sitemap:a").await.unwrap(), Some(urls()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_memory_cache_miss_after_ttl() {
        let cache = MemoryUrlCache::new();
        cache
            .put("sitemap:a", &urls(), Duration::from_secs(3600))
            .await
            .unwrap();
        tokio::time::advance(Duration::from_secs(3601)).await;
        assert_eq!(cache.get("sitemap:a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_cache_expire_removes_entry() {
        let cache = MemoryUrlCache::new();
        cache
            .put("sitemap:a", &urls(), Duration::from_secs(60))
            .await
            .unwrap();
        cache.expire("sitemap:a").await.unwrap();
        assert_eq!(cache.get("sitemap:a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_cache_last_writer_wins() {
        let cache = MemoryUrlCache::new();
        let ttl = Duration::from_secs(60);
        cache.put("k", &urls(), ttl).await.unwrap();
        cache.put("k", &urls()[..1], ttl).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap().map(|u| u.len()), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_memory_cache_write_evicts_expired_keys() {
        let cache = MemoryUrlCache::new();
        cache
            .put("sitemap:stale", &urls(), Duration::from_secs(60))
            .await
            .unwrap();
        cache
            .put("sitemap:fresh", &urls(), Duration::from_secs(3600))
            .await
            .unwrap();
        tokio::time::advance(Duration::from_secs(61)).await;
        cache
            .put("sitemap:other", &urls(), Duration::from_secs(3600))
            .await
            .unwrap();

        let entries = cache.entries.lock().unwrap();
        let mut keys: Vec<&str> = entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["sitemap:fresh", "sitemap:other"]);
    }
}
