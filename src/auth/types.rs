//! Auth method types
//!
//! These are deserialized straight from the rules file; `${VAR}`
//! substitution has already happened by the time serde sees the text.

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Location for API key placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    /// Place in HTTP header
    #[default]
    Header,
    /// Place in query parameter
    Query,
}

/// How a matched request gets its credential
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthMethod {
    /// `Authorization: Bearer <token>`
    Bearer {
        /// The bearer token
        token: String,
    },

    /// API key in a header or query parameter
    ApiKey {
        /// Header name or query parameter name
        key: String,
        /// The API key value
        value: String,
        /// Where to place the key
        #[serde(default)]
        location: Location,
    },

    /// HTTP Basic authentication
    Basic {
        /// Username
        username: String,
        /// Password
        password: String,
    },

    /// `Cookie` header built from name/value pairs, in declaration order
    Cookie {
        /// Cookie names to values
        cookies: IndexMap<String, String>,
    },

    /// Credential produced at request time by a registered provider
    Function {
        /// Name the provider was registered under
        provider: String,
    },

    /// OAuth2 client-credentials or refresh-token flow
    #[serde(rename = "oauth2")]
    OAuth2(OAuth2Auth),
}

impl AuthMethod {
    /// The `type` tag as it appears in config files
    pub fn kind(&self) -> &'static str {
        match self {
            AuthMethod::Bearer { .. } => "bearer",
            AuthMethod::ApiKey { .. } => "api_key",
            AuthMethod::Basic { .. } => "basic",
            AuthMethod::Cookie { .. } => "cookie",
            AuthMethod::Function { .. } => "function",
            AuthMethod::OAuth2(_) => "oauth2",
        }
    }
}

/// OAuth2 token endpoint settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuth2Auth {
    /// Token endpoint URL
    pub token_url: String,
    /// Client ID
    pub client_id: String,
    /// Client secret
    pub client_secret: String,
    /// Requested scope (space separated)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Refresh token; switches the grant to `refresh_token` when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl OAuth2Auth {
    /// Client-credentials settings with no scope
    pub fn client_credentials(
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scope: None,
            refresh_token: None,
        }
    }

    /// Set the scope
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Set the refresh token
    #[must_use]
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// The grant type this configuration requests
    pub fn grant_type(&self) -> &'static str {
        if self.refresh_token.is_some() {
            "refresh_token"
        } else {
            "client_credentials"
        }
    }
}

/// What a credential provider hands back
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// Sent as `Authorization: Bearer <token>`
    Bearer(String),
    /// Merged into the request headers as-is
    Headers(HashMap<String, String>),
}

/// Produces a credential when a `function` rule matches
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Produce a fresh credential
    async fn provide(&self) -> anyhow::Result<Credential>;
}

#[async_trait]
impl<F> CredentialProvider for F
where
    F: Fn() -> anyhow::Result<Credential> + Send + Sync,
{
    async fn provide(&self) -> anyhow::Result<Credential> {
        self()
    }
}

/// Named credential providers available to `function` rules
#[derive(Clone, Default)]
pub struct CredentialProviders {
    providers: HashMap<String, Arc<dyn CredentialProvider>>,
}

impl CredentialProviders {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider, replacing any previous one with the same name
    pub fn register(&mut self, name: impl Into<String>, provider: impl CredentialProvider + 'static) {
        self.providers.insert(name.into(), Arc::new(provider));
    }

    /// Builder form of [`register`](Self::register)
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, provider: impl CredentialProvider + 'static) -> Self {
        self.register(name, provider);
        self
    }

    /// Look up a provider
    pub fn get(&self, name: &str) -> Option<Arc<dyn CredentialProvider>> {
        self.providers.get(name).cloned()
    }

    /// Number of registered providers
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether no providers are registered
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl fmt::Debug for CredentialProviders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("CredentialProviders")
            .field("providers", &names)
            .finish()
    }
}

#[cfg(test)]
mod type_tests {
    use super::*;

    #[test]
    fn test_location_default() {
        assert_eq!(Location::default(), Location::Header);
    }

    #[test]
    fn test_deserialize_api_key_default_location() {
        let method: AuthMethod =
            serde_json::from_str(r#"{"type":"api_key","key":"X-API-Key","value":"k"}"#).unwrap();
        assert_eq!(
            method,
            AuthMethod::ApiKey {
                key: "X-API-Key".to_string(),
                value: "k".to_string(),
                location: Location::Header,
            }
        );
    }

    #[test]
    fn test_deserialize_oauth2() {
        let method: AuthMethod = serde_json::from_str(
            r#"{"type":"oauth2","token_url":"https://auth.example.com/token","client_id":"id","client_secret":"s","scope":"read"}"#,
        )
        .unwrap();
        let AuthMethod::OAuth2(oauth) = method else {
            panic!("expected oauth2");
        };
        assert_eq!(oauth.scope.as_deref(), Some("read"));
        assert!(oauth.refresh_token.is_none());
        assert_eq!(oauth.grant_type(), "client_credentials");
    }

    #[test]
    fn test_cookie_order_preserved() {
        let method: AuthMethod =
            serde_json::from_str(r#"{"type":"cookie","cookies":{"z":"1","a":"2","m":"3"}}"#)
                .unwrap();
        let AuthMethod::Cookie { cookies } = method else {
            panic!("expected cookie");
        };
        let keys: Vec<&str> = cookies.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_unknown_type_rejected() {
        let result: Result<AuthMethod, _> =
            serde_json::from_str(r#"{"type":"kerberos","principal":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_kind_matches_tag() {
        let method = AuthMethod::OAuth2(OAuth2Auth::client_credentials("u", "c", "s"));
        let value = serde_json::to_value(&method).unwrap();
        assert_eq!(value["type"], method.kind());
    }

    #[test]
    fn test_grant_type_refresh() {
        let oauth = OAuth2Auth::client_credentials("u", "c", "s").with_refresh_token("r");
        assert_eq!(oauth.grant_type(), "refresh_token");
    }

    #[tokio::test]
    async fn test_closure_provider() {
        let providers = CredentialProviders::new()
            .with("static", || -> anyhow::Result<Credential> {
                Ok(Credential::Bearer("tok".to_string()))
            });
        let provider = providers.get("static").unwrap();
        assert_eq!(
            provider.provide().await.unwrap(),
            Credential::Bearer("tok".to_string())
        );
        assert!(providers.get("missing").is_none());
        assert_eq!(providers.len(), 1);
    }
}
