use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::models::Payload;

/// A cached provider response and the instant it stops being servable
struct CacheEntry {
    payload: Payload,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Process-local TTL cache for provider responses, keyed by full request URL
///
/// Constructed once at startup and owned by the provider client. Expired
/// entries are not evicted; they stay in the map until the next miss for
/// the same key overwrites them, so memory grows with the number of
/// distinct URLs seen.
#[derive(Default)]
pub struct ResponseCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the payload for `key` if an entry exists and has not expired
    ///
    /// Never-cached and expired keys are both reported as `None`.
    pub async fn get(&self, key: &str) -> Option<Payload> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;

        if entry.is_fresh(Instant::now()) {
            tracing::debug!(key = %redact(key), "Cache hit");
            Some(entry.payload.clone())
        } else {
            tracing::debug!(key = %redact(key), "Cache entry expired");
            None
        }
    }

    /// Stores `payload` under `key` until now + `ttl`, replacing any previous entry
    pub async fn put(&self, key: &str, payload: Payload, ttl: Duration) {
        let entry = CacheEntry {
            payload,
            expires_at: Instant::now() + ttl,
        };

        self.entries.write().await.insert(key.to_string(), entry);
        tracing::debug!(key = %redact(key), ttl_secs = ttl.as_secs(), "Cached response");
    }

    /// Number of stored entries, fresh or not
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// Strips the query string so API keys never reach the logs
fn redact(key: &str) -> &str {
    key.split('?').next().unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(600);

    #[tokio::test(start_paused = true)]
    async fn test_get_before_expiry_hits() {
        let cache = ResponseCache::new();
        cache.put("http://tmdb/movie/603", b"matrix".to_vec(), TTL).await;

        tokio::time::advance(TTL - Duration::from_millis(1)).await;

        assert_eq!(
            cache.get("http://tmdb/movie/603").await,
            Some(b"matrix".to_vec())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_at_expiry_misses() {
        let cache = ResponseCache::new();
        cache.put("http://tmdb/movie/603", b"matrix".to_vec(), TTL).await;

        tokio::time::advance(TTL).await;

        assert_eq!(cache.get("http://tmdb/movie/603").await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_stays_until_overwritten() {
        let cache = ResponseCache::new();
        cache.put("k", b"old".to_vec(), TTL).await;

        tokio::time::advance(TTL * 2).await;
        assert_eq!(cache.get("k").await, None);
        assert_eq!(cache.len().await, 1);

        cache.put("k", b"new".to_vec(), TTL).await;
        assert_eq!(cache.get("k").await, Some(b"new".to_vec()));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_key_misses() {
        let cache = ResponseCache::new();
        assert!(cache.is_empty().await);
        assert_eq!(cache.get("never-fetched").await, None);
    }

    #[tokio::test]
    async fn test_put_overwrites_unconditionally() {
        let cache = ResponseCache::new();
        cache.put("k", b"first".to_vec(), TTL).await;
        cache.put("k", b"second".to_vec(), TTL).await;

        assert_eq!(cache.get("k").await, Some(b"second".to_vec()));
    }

    #[tokio::test]
    async fn test_distinct_query_strings_do_not_collide() {
        let cache = ResponseCache::new();
        cache.put("http://tmdb/search?query=alien", b"alien".to_vec(), TTL).await;
        cache.put("http://tmdb/search?query=aliens", b"aliens".to_vec(), TTL).await;

        assert_eq!(
            cache.get("http://tmdb/search?query=alien").await,
            Some(b"alien".to_vec())
        );
        assert_eq!(
            cache.get("http://tmdb/search?query=aliens").await,
            Some(b"aliens".to_vec())
        );
    }

    #[test]
    fn test_redact_drops_query() {
        assert_eq!(
            redact("https://api.themoviedb.org/3/movie/603?api_key=secret"),
            "https://api.themoviedb.org/3/movie/603"
        );
        assert_eq!(redact("plain"), "plain");
    }
}
