//! Authentication module
//!
//! Supports: Bearer, API Key (header or query), Basic, Cookie, provider
//! functions, and OAuth2 (client credentials or refresh token).
//!
//! The `Authenticator` applies a method to a `PendingRequest`; OAuth2 tokens
//! come from a `TokenManager` backed by an injected `TokenCache`.

mod authenticator;
mod mask;
mod token;
mod types;

pub use authenticator::Authenticator;
pub use mask::MASK;
pub use token::{CachedToken, TokenCache, TokenManager, EXPIRY_BUFFER_SECONDS};
pub use types::{
    AuthMethod, Credential, CredentialProvider, CredentialProviders, Location, OAuth2Auth,
};
