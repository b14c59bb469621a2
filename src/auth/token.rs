//! OAuth2 token acquisition and caching
//!
//! Each `(token_url, client_id)` pair moves through three states: absent,
//! valid until `expires_at`, then stale. Stale entries stay in the map and
//! are overwritten by the next successful exchange; nothing is evicted, so
//! the cache never grows past the number of distinct pairs in the rules.

use super::types::OAuth2Auth;
use crate::error::{Error, Result};
use crate::http::{PendingRequest, Transport};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Seconds shaved off `expires_in` so a token is never used at the edge of validity
pub const EXPIRY_BUFFER_SECONDS: f64 = 60.0;

/// Cached token with expiration
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// The access token
    pub access_token: Arc<str>,
    /// Instant from which the token is considered stale
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Create a new cached token
    pub fn new(access_token: impl Into<Arc<str>>, expires_at: DateTime<Utc>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at,
        }
    }

    /// Create a token from an `expires_in` lifetime, minus the safety buffer.
    ///
    /// Returns `None` when the lifetime is not finite or the expiry instant
    /// does not fit in a `DateTime<Utc>`.
    pub fn expires_in(access_token: impl Into<Arc<str>>, seconds: f64) -> Option<Self> {
        let lifetime_ms = (seconds - EXPIRY_BUFFER_SECONDS) * 1000.0;
        if !lifetime_ms.is_finite() {
            return None;
        }
        // `as` saturates at the i64 bounds
        let lifetime = chrono::Duration::try_milliseconds(lifetime_ms as i64)?;
        let expires_at = Utc::now().checked_add_signed(lifetime)?;
        Some(Self::new(access_token, expires_at))
    }

    /// Whether the token can still be used
    pub fn is_valid(&self) -> bool {
        Utc::now() < self.expires_at
    }
}

/// Shared store of OAuth2 tokens keyed by `(token_url, client_id)`
///
/// Clones share the same underlying map.
#[derive(Clone, Default)]
pub struct TokenCache {
    // token_url -> client_id -> token, so lookups borrow `&str` keys
    entries: Arc<RwLock<HashMap<String, HashMap<String, CachedToken>>>>,
}

impl TokenCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the token for the key if it has not gone stale
    pub async fn get_valid(&self, token_url: &str, client_id: &str) -> Option<Arc<str>> {
        let entries = self.entries.read().await;
        entries
            .get(token_url)
            .and_then(|clients| clients.get(client_id))
            .filter(|token| token.is_valid())
            .map(|token| Arc::clone(&token.access_token))
    }

    /// Return the entry for the key, stale or not
    pub async fn get(&self, token_url: &str, client_id: &str) -> Option<CachedToken> {
        let entries = self.entries.read().await;
        entries
            .get(token_url)
            .and_then(|clients| clients.get(client_id))
            .cloned()
    }

    /// Store or overwrite the entry for the key
    pub async fn insert(&self, token_url: &str, client_id: &str, token: CachedToken) {
        let mut entries = self.entries.write().await;
        entries
            .entry(token_url.to_string())
            .or_default()
            .insert(client_id.to_string(), token);
    }

    /// Number of entries, stale ones included
    pub async fn len(&self) -> usize {
        let entries = self.entries.read().await;
        entries.values().map(HashMap::len).sum()
    }

    /// Whether the cache holds no entries
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop every entry
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

impl fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCache").finish_non_exhaustive()
    }
}

/// Hands out OAuth2 access tokens, fetching them lazily when absent or stale
///
/// There is no retry and no proactive refresh. Concurrent callers that see
/// the same stale entry may each perform an exchange; the last one written
/// wins.
#[derive(Clone)]
pub struct TokenManager {
    cache: TokenCache,
    transport: Arc<dyn Transport>,
}

impl TokenManager {
    /// Create a token manager over an explicit cache
    pub fn new(cache: TokenCache, transport: Arc<dyn Transport>) -> Self {
        Self { cache, transport }
    }

    /// The cache this manager writes to
    pub fn cache(&self) -> &TokenCache {
        &self.cache
    }

    /// Get a currently valid access token, exchanging credentials if needed
    pub async fn get_token(&self, auth: &OAuth2Auth) -> Result<Arc<str>> {
        if let Some(token) = self.cache.get_valid(&auth.token_url, &auth.client_id).await {
            debug!(client_id = %auth.client_id, "OAuth2 token cache hit");
            return Ok(token);
        }

        debug!(
            token_url = %auth.token_url,
            client_id = %auth.client_id,
            grant_type = auth.grant_type(),
            "Fetching OAuth2 token"
        );

        let response = self.transport.perform(&token_request(auth)).await?;

        if !response.is_success() {
            return Err(Error::TokenFetch {
                status: response.status,
                status_text: response.status_text,
                body: response.body,
            });
        }

        let token_response: TokenResponse = serde_json::from_str(&response.body)
            .map_err(|e| Error::oauth2(format!("Invalid token response: {e}")))?;
        let access_token: Arc<str> = Arc::from(token_response.access_token);

        match token_response.expires_in {
            Some(seconds) => match CachedToken::expires_in(Arc::clone(&access_token), seconds) {
                Some(token) => {
                    self.cache
                        .insert(&auth.token_url, &auth.client_id, token)
                        .await;
                }
                None => {
                    warn!(
                        client_id = %auth.client_id,
                        expires_in = seconds,
                        "Token expires_in out of range, not caching"
                    );
                }
            },
            None => {
                debug!(client_id = %auth.client_id, "Token response has no expires_in, not caching");
            }
        }

        Ok(access_token)
    }
}

impl fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenManager")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

/// Build the form-encoded token request for the configured grant
fn token_request(auth: &OAuth2Auth) -> PendingRequest {
    let mut form = url::form_urlencoded::Serializer::new(String::new());
    form.append_pair("grant_type", auth.grant_type());
    form.append_pair("client_id", &auth.client_id);
    form.append_pair("client_secret", &auth.client_secret);
    if let Some(ref scope) = auth.scope {
        form.append_pair("scope", scope);
    }
    if let Some(ref refresh_token) = auth.refresh_token {
        form.append_pair("refresh_token", refresh_token);
    }

    PendingRequest::post(auth.token_url.as_str())
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(form.finish())
}

/// OAuth2 token response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<f64>,
}

#[cfg(test)]
mod token_tests {
    use super::*;

    #[test]
    fn test_cached_token_valid() {
        let token = CachedToken::expires_in("test", 3600.0).unwrap();
        assert!(token.is_valid());
    }

    #[test]
    fn test_cached_token_out_of_range_lifetime() {
        assert!(CachedToken::expires_in("test", 1e13).is_none());
        assert!(CachedToken::expires_in("test", -1e300).is_none());
        assert!(CachedToken::expires_in("test", f64::INFINITY).is_none());
        assert!(CachedToken::expires_in("test", f64::NAN).is_none());
    }

    #[test]
    fn test_cached_token_inside_buffer_is_stale() {
        // 30s lifetime minus the 60s buffer is already in the past
        let token = CachedToken::expires_in("test", 30.0).unwrap();
        assert!(!token.is_valid());
    }

    #[test]
    fn test_cached_token_expired() {
        let token = CachedToken::new("test", Utc::now() - chrono::Duration::seconds(1));
        assert!(!token.is_valid());
    }

    #[test]
    fn test_token_request_client_credentials() {
        let auth = OAuth2Auth::client_credentials("https://auth.example.com/token", "id", "s&s")
            .with_scope("read write");
        let req = token_request(&auth);

        assert_eq!(req.method, reqwest::Method::POST);
        assert_eq!(req.url, "https://auth.example.com/token");
        assert_eq!(
            req.get_header("content-type"),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(
            req.body.as_deref(),
            Some("grant_type=client_credentials&client_id=id&client_secret=s%26s&scope=read+write")
        );
        assert!(req.timeout.is_none());
    }

    #[test]
    fn test_token_request_refresh() {
        let auth = OAuth2Auth::client_credentials("https://auth.example.com/token", "id", "s")
            .with_refresh_token("rt-1");
        let body = token_request(&auth).body.unwrap();

        assert_eq!(
            body,
            "grant_type=refresh_token&client_id=id&client_secret=s&refresh_token=rt-1"
        );
    }

    #[tokio::test]
    async fn test_cache_keys_are_independent() {
        let cache = TokenCache::new();
        cache
            .insert("https://a/token", "c1", CachedToken::expires_in("t1", 3600.0).unwrap())
            .await;
        cache
            .insert("https://a/token", "c2", CachedToken::expires_in("t2", 3600.0).unwrap())
            .await;
        cache
            .insert("https://b/token", "c1", CachedToken::expires_in("t3", 3600.0).unwrap())
            .await;

        assert_eq!(cache.len().await, 3);
        assert_eq!(cache.get_valid("https://a/token", "c1").await.as_deref(), Some("t1"));
        assert_eq!(cache.get_valid("https://a/token", "c2").await.as_deref(), Some("t2"));
        assert_eq!(cache.get_valid("https://b/token", "c1").await.as_deref(), Some("t3"));
        assert!(cache.get_valid("https://b/token", "c2").await.is_none());
    }

    #[tokio::test]
    async fn test_stale_entry_kept_but_ignored() {
        let cache = TokenCache::new();
        let stale = CachedToken::new("old", Utc::now() - chrono::Duration::seconds(5));
        cache.insert("https://a/token", "c", stale).await;

        assert!(cache.get_valid("https://a/token", "c").await.is_none());
        assert_eq!(
            cache.get("https://a/token", "c").await.unwrap().access_token.as_ref(),
            "old"
        );
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let cache = TokenCache::new();
        let other = cache.clone();
        other
            .insert("https://a/token", "c", CachedToken::expires_in("t", 3600.0).unwrap())
            .await;

        assert!(!cache.is_empty().await);
        cache.clear().await;
        assert!(other.is_empty().await);
    }
}
