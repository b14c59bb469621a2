//! Request dispatcher
//!
//! Loads the rules, picks a rule for the URL, applies its credential and
//! performs the request. Both entry points fold every failure into their
//! return value instead of returning `Err`.

use super::types::{FetchRequest, TestAuthReport};
use crate::auth::{Authenticator, CredentialProvider, CredentialProviders, TokenCache, TokenManager};
use crate::config::{Config, ConfigSource};
use crate::error::{Error, Result};
use crate::http::{HttpResponse, PendingRequest, ReqwestTransport, Transport};
use crate::rules::RuleMatcher;
use reqwest::Method;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// First delay between connection retries
const INITIAL_BACKOFF: Duration = Duration::from_millis(100);

/// Upper bound on the delay between connection retries
const MAX_BACKOFF: Duration = Duration::from_secs(5);

/// Authenticating request dispatcher
///
/// Clones share the transport and the OAuth2 token cache.
#[derive(Clone)]
pub struct Dispatcher {
    source: Arc<dyn ConfigSource>,
    transport: Arc<dyn Transport>,
    authenticator: Authenticator,
}

impl Dispatcher {
    /// Dispatcher with the default transport, a fresh token cache and no providers
    pub fn new(source: impl ConfigSource + 'static) -> Self {
        Self::builder(source).build()
    }

    /// Start building a dispatcher
    pub fn builder(source: impl ConfigSource + 'static) -> DispatcherBuilder {
        DispatcherBuilder {
            source: Arc::new(source),
            transport: None,
            cache: None,
            providers: CredentialProviders::new(),
        }
    }

    /// The authenticator used for matched rules
    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    /// The shared OAuth2 token cache
    pub fn token_cache(&self) -> &TokenCache {
        self.authenticator.tokens().cache()
    }

    /// Fetch a URL with whatever auth its rule calls for.
    ///
    /// Returns the response body on any HTTP status, or a description of
    /// what went wrong.
    pub async fn fetch_url(&self, request: &FetchRequest) -> String {
        match self.try_fetch(request).await {
            Ok(body) => body,
            Err(e) => {
                debug!(error = %e, "fetch_url failed");
                e.to_string()
            }
        }
    }

    /// Report which rule applies to a URL.
    ///
    /// Loads the rules on the calling thread. File sources block on disk,
    /// so async callers should run this under `spawn_blocking`.
    pub fn test_auth(&self, url: &str) -> TestAuthReport {
        let config = match self.source.load() {
            Ok(config) => config,
            Err(e) => return TestAuthReport::failed(e.to_string()),
        };

        let verbose = config.settings().verbose_test_auth;
        let rule = RuleMatcher::new(&config.auth_rules)
            .find(url)
            .map(|rule| if verbose { rule.clone() } else { rule.masked() });

        TestAuthReport {
            rule,
            config_file: self.source.location(),
            error: None,
        }
    }

    async fn try_fetch(&self, request: &FetchRequest) -> Result<String> {
        let config = self.load_config().await?;
        let settings = config.settings();

        let method = parse_method(request.method.as_deref())?;
        Url::parse(&request.url)?;

        let mut pending = PendingRequest::new(method, request.url.as_str());
        for (name, value) in &request.headers {
            pending.set_header(name.as_str(), value.as_str());
        }
        // Global settings are layered over the caller's headers
        if let Some(ref user_agent) = settings.user_agent {
            pending.set_header("User-Agent", user_agent.as_str());
        }
        pending.body.clone_from(&request.body);
        pending.timeout = Some(settings.effective_timeout(request.timeout));

        if let Some(rule) = RuleMatcher::new(&config.auth_rules).find(&request.url) {
            self.authenticator.apply(&rule.auth, &mut pending).await?;
        }

        let response = self.send(&pending, settings.retries()).await?;
        Ok(response.body)
    }

    /// Load the rules on the blocking pool
    async fn load_config(&self) -> Result<Config> {
        let source = Arc::clone(&self.source);
        tokio::task::spawn_blocking(move || source.load())
            .await
            .map_err(|e| Error::Other(format!("Config load task failed: {e}")))?
    }

    /// Perform the request, retrying connection failures only
    async fn send(&self, req: &PendingRequest, max_retries: u32) -> Result<HttpResponse> {
        let mut attempt = 0;
        loop {
            match self.perform_once(req).await {
                Err(e) if e.is_retryable() && attempt < max_retries => {
                    let delay = calculate_backoff(attempt);
                    warn!(
                        "Connection error, attempt {}/{}, retrying in {:?}",
                        attempt + 1,
                        max_retries + 1,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    /// One exchange under the request deadline; the timer is dropped with the call
    async fn perform_once(&self, req: &PendingRequest) -> Result<HttpResponse> {
        match req.timeout {
            Some(limit) => tokio::time::timeout(limit, self.transport.perform(req))
                .await
                .map_err(|_| Error::Timeout {
                    timeout_ms: limit.as_millis() as u64,
                })?,
            None => self.transport.perform(req).await,
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config_file", &self.source.location())
            .field("authenticator", &self.authenticator)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Dispatcher`]
pub struct DispatcherBuilder {
    source: Arc<dyn ConfigSource>,
    transport: Option<Arc<dyn Transport>>,
    cache: Option<TokenCache>,
    providers: CredentialProviders,
}

impl DispatcherBuilder {
    /// Use a custom transport for both resource and token requests
    #[must_use]
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Share an existing token cache
    #[must_use]
    pub fn token_cache(mut self, cache: TokenCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Register a credential provider for `function` rules
    #[must_use]
    pub fn provider(mut self, name: impl Into<String>, provider: impl CredentialProvider + 'static) -> Self {
        self.providers.register(name, provider);
        self
    }

    /// Replace the provider registry
    #[must_use]
    pub fn providers(mut self, providers: CredentialProviders) -> Self {
        self.providers = providers;
        self
    }

    /// Build the dispatcher
    pub fn build(self) -> Dispatcher {
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new()),
        };
        let tokens = TokenManager::new(self.cache.unwrap_or_default(), Arc::clone(&transport));

        Dispatcher {
            source: self.source,
            transport,
            authenticator: Authenticator::new(tokens, self.providers),
        }
    }
}

/// Parse a method name, defaulting to GET
fn parse_method(method: Option<&str>) -> Result<Method> {
    match method {
        None => Ok(Method::GET),
        Some(m) => Method::from_bytes(m.to_ascii_uppercase().as_bytes()).map_err(|_| {
            Error::InvalidMethod {
                method: m.to_string(),
            }
        }),
    }
}

/// Exponential backoff for a given attempt, capped at `MAX_BACKOFF`
pub(crate) fn calculate_backoff(attempt: u32) -> Duration {
    let factor = 2u32.saturating_pow(attempt);
    std::cmp::min(INITIAL_BACKOFF.saturating_mul(factor), MAX_BACKOFF)
}
