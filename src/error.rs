//! Error types for auth-fetch
//!
//! All fallible internals return `Result<T, Error>`. The two public entry
//! points on the dispatcher (`fetch_url`, `test_auth`) never return an
//! error; they fold it into their string or report output instead.

use thiserror::Error;

/// The main error type for auth-fetch
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Environment variable '{name}' referenced in config is not set")]
    MissingEnvVar { name: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    #[error("Failed to fetch OAuth2 token: {status} {status_text} - {body}")]
    TokenFetch {
        status: u16,
        status_text: String,
        body: String,
    },

    #[error("OAuth2 error: {message}")]
    OAuth2 { message: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid HTTP method: {method}")]
    InvalidMethod { method: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create an OAuth2 error
    pub fn oauth2(message: impl Into<String>) -> Self {
        Self::OAuth2 {
            message: message.into(),
        }
    }

    /// Check if this error is worth retrying the same request for.
    ///
    /// Only connection-level failures qualify; timeouts and HTTP statuses do not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(e) => e.is_connect(),
            _ => false,
        }
    }
}

/// Result type alias for auth-fetch
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::auth("no provider");
        assert_eq!(err.to_string(), "Authentication failed: no provider");

        let err = Error::Timeout { timeout_ms: 1500 };
        assert_eq!(err.to_string(), "Request timed out after 1500ms");
    }

    #[test]
    fn test_token_fetch_display() {
        let err = Error::TokenFetch {
            status: 401,
            status_text: "Unauthorized".to_string(),
            body: "invalid_client".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to fetch OAuth2 token: 401 Unauthorized - invalid_client"
        );
    }

    #[test]
    fn test_is_retryable() {
        assert!(!Error::Timeout { timeout_ms: 1000 }.is_retryable());
        assert!(!Error::config("test").is_retryable());
        assert!(!Error::auth("test").is_retryable());
    }

    #[test]
    fn test_anyhow_is_transparent() {
        let err: Error = anyhow::anyhow!("keychain locked").into();
        assert!(matches!(err, Error::Anyhow(_)));
        assert_eq!(err.to_string(), "keychain locked");
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
