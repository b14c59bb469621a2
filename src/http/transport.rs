//! HTTP transport
//!
//! The dispatcher and the token manager only ever talk to the network
//! through the [`Transport`] trait, so tests and embedders can swap the
//! reqwest implementation out.

use super::request::{HttpResponse, PendingRequest};
use crate::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use tracing::debug;

/// Performs a single HTTP exchange
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and read the full response body
    async fn perform(&self, request: &PendingRequest) -> Result<HttpResponse>;
}

/// Transport backed by a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with a default client
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    /// Create a transport around an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn perform(&self, request: &PendingRequest) -> Result<HttpResponse> {
        let mut req = self
            .client
            .request(request.method.clone(), request.url.as_str());

        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        if let Some(ref body) = request.body {
            req = req.body(body.clone());
        }

        // The caller enforces `request.timeout`; reqwest gets no deadline of its own.
        let response = req.send().await?;
        let status = response.status();

        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(k, v)| {
                v.to_str()
                    .ok()
                    .map(|v| (k.as_str().to_string(), v.to_string()))
            })
            .collect();

        let body = response.text().await?;
        // URL left out on purpose: query-placed API keys live there.
        debug!(method = %request.method, status = status.as_u16(), "HTTP exchange completed");

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }
}
