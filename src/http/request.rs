//! Request and response descriptors
//!
//! A `PendingRequest` is built per call, mutated by the authenticator, and
//! handed to a [`Transport`](super::Transport). Nothing here touches the
//! network.

use crate::error::Result;
use reqwest::Method;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

/// Timeout applied when neither the caller nor the config provides one
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// An outbound request that has not been sent yet
#[derive(Debug, Clone)]
pub struct PendingRequest {
    /// Absolute request URL (rewritten when an API key goes into the query)
    pub url: String,
    /// HTTP method
    pub method: Method,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Raw request body
    pub body: Option<String>,
    /// Deadline for the whole exchange; `None` means no deadline
    pub timeout: Option<Duration>,
}

impl PendingRequest {
    /// Create a request with no headers, body or deadline
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            headers: HashMap::new(),
            body: None,
            timeout: None,
        }
    }

    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    /// Create a POST request
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    /// Set the body
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the deadline
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set a header, replacing any existing header whose name differs only in case
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.headers.retain(|k, _| !k.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value.into());
    }

    /// Look up a header by case-insensitive name
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Append `key=value` to the query string, keeping existing parameters
    pub fn append_query_pair(&mut self, key: &str, value: &str) -> Result<()> {
        let mut url = Url::parse(&self.url)?;
        url.query_pairs_mut().append_pair(key, value);
        self.url = url.into();
        Ok(())
    }
}

/// A fully-read HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code
    pub status: u16,
    /// Canonical reason phrase for the status (may be empty)
    pub status_text: String,
    /// Response headers (lowercased names)
    pub headers: HashMap<String, String>,
    /// Response body as text
    pub body: String,
}

impl HttpResponse {
    /// Build a response with no headers
    pub fn new(status: u16, status_text: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
