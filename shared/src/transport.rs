//! The seam between the request lifecycle and the network.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TransportError;
use crate::request::RequestId;

/// HTTP method of an outbound call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    /// Every gateway operation is a POST unless overridden
    #[default]
    Post,
}

/// Per-call overrides of the transport settings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub method: Option<HttpMethod>,
    pub base_url: Option<String>,
    pub headers: BTreeMap<String, String>,
}

impl RequestOptions {
    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// One call as handed to a `Transport`
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub id: RequestId,
    pub endpoint: String,
    pub payload: Option<Value>,
    pub options: RequestOptions,
}

impl OutboundRequest {
    pub fn method(&self) -> HttpMethod {
        self.options.method.unwrap_or_default()
    }

    /// Resolve the full URL, preferring the per-call base URL over `default_base`.
    /// Absolute endpoints are used as-is.
    pub fn url(&self, default_base: &str) -> String {
        if self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://") {
            return self.endpoint.clone();
        }

        let base = self.options.base_url.as_deref().unwrap_or(default_base);
        let base = base.trim_end_matches('/');
        let endpoint = self.endpoint.trim_start_matches('/');

        if endpoint.is_empty() {
            base.to_string()
        } else {
            format!("{}/{}", base, endpoint)
        }
    }
}

/// Performs outbound calls. Implementations are injected into the lifecycle
/// manager; futures are not required to be `Send` so browser transports work.
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: OutboundRequest) -> Result<Value, TransportError>;
}
