use async_trait::async_trait;
use gloo::net::http::{Request, RequestBuilder};
use serde_json::Value;
use shared::{HttpMethod, OutboundRequest, Transport, TransportError};

use crate::services::Logger;

/// HTTP transport that sends every call to the expense gateway
#[derive(Clone, PartialEq)]
pub struct GatewayTransport {
    base_url: String,
}

impl GatewayTransport {
    /// Create a transport for the gateway mounted at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn builder(&self, request: &OutboundRequest) -> RequestBuilder {
        let url = request.url(&self.base_url);
        let mut builder = match request.method() {
            HttpMethod::Get => Request::get(&url),
            HttpMethod::Post => Request::post(&url),
        };
        for (name, value) in &request.options.headers {
            builder = builder.header(name, value);
        }
        builder
    }
}

#[async_trait(?Send)]
impl Transport for GatewayTransport {
    async fn send(&self, request: OutboundRequest) -> Result<Value, TransportError> {
        let builder = self.builder(&request);

        let prepared = match (&request.payload, request.method()) {
            (Some(payload), HttpMethod::Post) => builder.json(payload),
            (Some(_), HttpMethod::Get) => {
                Logger::warn_with_component(
                    "gateway-transport",
                    &format!("Dropping body of GET {}", request.endpoint),
                );
                builder.build()
            }
            (None, _) => builder.build(),
        }
        .map_err(|e| TransportError::Encode(e.to_string()))?;

        let response = prepared
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if !response.ok() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TransportError::Status { status, body });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))
    }
}
