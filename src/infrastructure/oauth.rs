//! Bearer token caching shared by the outbound API clients.

use serde::Deserialize;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Tokens are refreshed this long before they actually expire.
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// OAuth token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

struct CachedToken {
    value: String,
    refresh_at: Instant,
}

/// Holds the current access token and fetches a new one when it is stale.
///
/// Concurrent callers wait on the same fetch instead of racing.
#[derive(Default)]
pub struct TokenCache {
    inner: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a valid token, calling `fetch` if none is cached or it is stale.
    pub async fn get_or_fetch<F, Fut, E>(&self, fetch: F) -> Result<String, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<TokenGrant, E>>,
    {
        let mut slot = self.inner.lock().await;

        if let Some(token) = slot.as_ref()
            && Instant::now() < token.refresh_at
        {
            return Ok(token.value.clone());
        }

        let grant = fetch().await?;
        let lifetime = Duration::from_secs(grant.expires_in).saturating_sub(REFRESH_MARGIN);

        // A lifetime past the clock's range is not cached at all.
        *slot = Instant::now()
            .checked_add(lifetime)
            .map(|refresh_at| CachedToken {
                value: grant.access_token.clone(),
                refresh_at,
            });

        Ok(grant.access_token)
    }

    /// Drops the cached token so the next call fetches a fresh one.
    pub async fn invalidate(&self) {
        *self.inner.lock().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn grant(token: &str, expires_in: u64) -> TokenGrant {
        TokenGrant {
            access_token: token.to_string(),
            expires_in,
        }
    }

    #[tokio::test]
    async fn test_token_is_reused_until_stale() {
        let cache = TokenCache::new();
        let calls = &AtomicUsize::new(0);

        for _ in 0..3 {
            let token = cache
                .get_or_fetch(|| async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, Infallible>(grant("t1", 3600))
                })
                .await
                .unwrap();
            assert_eq!(token, "t1");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_short_lived_token_is_refetched() {
        let cache = TokenCache::new();
        let calls = &AtomicUsize::new(0);

        for _ in 0..2 {
            cache
                .get_or_fetch(|| async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, Infallible>(grant("t", 30))
                })
                .await
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unrepresentable_lifetime_is_not_cached() {
        let cache = TokenCache::new();
        let calls = &AtomicUsize::new(0);

        for _ in 0..2 {
            let token = cache
                .get_or_fetch(|| async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, Infallible>(grant("forever", u64::MAX))
                })
                .await
                .unwrap();
            assert_eq!(token, "forever");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_fetch() {
        let cache = TokenCache::new();
        cache
            .get_or_fetch(|| async { Ok::<_, Infallible>(grant("old", 3600)) })
            .await
            .unwrap();
        cache.invalidate().await;

        let token = cache
            .get_or_fetch(|| async { Ok::<_, Infallible>(grant("new", 3600)) })
            .await
            .unwrap();
        assert_eq!(token, "new");
    }

    #[tokio::test]
    async fn test_fetch_error_is_propagated() {
        let cache = TokenCache::new();
        let result = cache
            .get_or_fetch(|| async { Err::<TokenGrant, _>("denied") })
            .await;
        assert_eq!(result.unwrap_err(), "denied");
    }
}
