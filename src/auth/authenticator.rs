//! Authenticator implementation
//!
//! Applies a rule's auth method to a pending request. Every credential is
//! resolved before the request is touched, so a failure leaves the request
//! exactly as it was.

use super::token::TokenManager;
use super::types::{AuthMethod, Credential, CredentialProviders, Location};
use crate::error::{Error, Result};
use crate::http::PendingRequest;
use base64::Engine as _;

/// Authenticator applies auth methods to outbound requests
#[derive(Debug, Clone)]
pub struct Authenticator {
    /// OAuth2 token source
    tokens: TokenManager,
    /// Providers for `function` rules
    providers: CredentialProviders,
}

impl Authenticator {
    /// Create a new authenticator
    pub fn new(tokens: TokenManager, providers: CredentialProviders) -> Self {
        Self { tokens, providers }
    }

    /// The token manager used for OAuth2 rules
    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    /// Apply authentication to a request.
    ///
    /// Any failure comes back as [`Error::Auth`] with the cause as its message.
    pub async fn apply(&self, method: &AuthMethod, req: &mut PendingRequest) -> Result<()> {
        self.apply_inner(method, req).await.map_err(|e| match e {
            Error::Auth { .. } => e,
            other => Error::auth(other.to_string()),
        })
    }

    async fn apply_inner(&self, method: &AuthMethod, req: &mut PendingRequest) -> Result<()> {
        match method {
            AuthMethod::Bearer { token } => {
                req.set_header("Authorization", format!("Bearer {token}"));
            }

            AuthMethod::ApiKey {
                key,
                value,
                location,
            } => match location {
                Location::Header => req.set_header(key.as_str(), value.as_str()),
                Location::Query => req.append_query_pair(key, value)?,
            },

            AuthMethod::Basic { username, password } => {
                let encoded = base64::engine::general_purpose::STANDARD
                    .encode(format!("{username}:{password}"));
                req.set_header("Authorization", format!("Basic {encoded}"));
            }

            AuthMethod::Cookie { cookies } => {
                if !cookies.is_empty() {
                    let header = cookies
                        .iter()
                        .map(|(name, value)| format!("{name}={value}"))
                        .collect::<Vec<_>>()
                        .join("; ");
                    req.set_header("Cookie", header);
                }
            }

            AuthMethod::Function { provider } => {
                let source = self.providers.get(provider).ok_or_else(|| {
                    Error::auth(format!("No credential provider registered as '{provider}'"))
                })?;
                match source.provide().await? {
                    Credential::Bearer(token) => {
                        req.set_header("Authorization", format!("Bearer {token}"));
                    }
                    Credential::Headers(headers) => {
                        for (name, value) in headers {
                            req.set_header(name, value);
                        }
                    }
                }
            }

            AuthMethod::OAuth2(oauth) => {
                let token = self.tokens.get_token(oauth).await?;
                req.set_header("Authorization", format!("Bearer {token}"));
            }
        }

        Ok(())
    }
}
