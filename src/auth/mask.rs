//! Secret masking for rule introspection

use super::types::{AuthMethod, OAuth2Auth};

/// Replacement for every secret field
pub const MASK: &str = "***";

impl AuthMethod {
    /// Copy of this method with secret fields replaced by [`MASK`].
    ///
    /// Identifiers (header names, client ids, token URLs, provider names)
    /// pass through. Masking an already masked method changes nothing.
    pub fn masked(&self) -> AuthMethod {
        match self {
            AuthMethod::Bearer { .. } => AuthMethod::Bearer {
                token: MASK.to_string(),
            },
            AuthMethod::ApiKey { key, location, .. } => AuthMethod::ApiKey {
                key: key.clone(),
                value: MASK.to_string(),
                location: *location,
            },
            AuthMethod::Basic { .. } => AuthMethod::Basic {
                username: MASK.to_string(),
                password: MASK.to_string(),
            },
            AuthMethod::Cookie { cookies } => AuthMethod::Cookie {
                cookies: cookies
                    .keys()
                    .map(|name| (name.clone(), MASK.to_string()))
                    .collect(),
            },
            AuthMethod::Function { provider } => AuthMethod::Function {
                provider: provider.clone(),
            },
            AuthMethod::OAuth2(oauth) => AuthMethod::OAuth2(OAuth2Auth {
                token_url: oauth.token_url.clone(),
                client_id: oauth.client_id.clone(),
                client_secret: MASK.to_string(),
                scope: oauth.scope.clone(),
                refresh_token: oauth.refresh_token.as_ref().map(|_| MASK.to_string()),
            }),
        }
    }
}
