//! Dispatcher input and output types

use crate::rules::AuthRule;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// One `fetch_url` call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    /// Absolute URL
    pub url: String,
    /// HTTP method; GET when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Caller headers
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Raw body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Timeout in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl FetchRequest {
    /// GET request for a URL
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the method
    #[must_use]
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set the body
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the timeout in milliseconds
    #[must_use]
    pub fn timeout_ms(mut self, timeout: u64) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Result of `test_auth`: which rule applies to a URL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TestAuthReport {
    /// Matched rule (secrets masked unless verbose)
    pub rule: Option<AuthRule>,
    /// Rules file the config came from
    #[serde(rename = "configFile", skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
    /// Load or match failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TestAuthReport {
    /// Report for a failed lookup
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            rule: None,
            config_file: None,
            error: Some(error.into()),
        }
    }
}
