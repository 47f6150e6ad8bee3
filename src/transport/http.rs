//! reqwest-backed transport.

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use std::error::Error as StdError;
use std::time::Duration;

use crate::config::schema::TransportConfig;
use crate::transport::{Transport, TransportError, TransportRequest, TransportResponse};

/// Default [`Transport`] built on a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    inner: Client,
}

impl ReqwestTransport {
    /// Build a transport from configuration.
    pub fn new(config: &TransportConfig) -> Result<Self, TransportError> {
        let inner = ClientBuilder::new()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| TransportError::Other(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { inner })
    }

    /// Wrap an existing client.
    pub fn from_client(inner: Client) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError> {
        tracing::debug!(method = %request.method, url = %request.url, "Sending HTTP request");

        let response = self
            .inner
            .request(request.method.clone(), &request.url)
            .form(&request.form)
            .send()
            .await
            .map_err(map_error)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await.map_err(map_error)?.to_vec();

        tracing::debug!(status, url = %request.url, bytes = body.len(), "Received HTTP response");
        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

// A connect timeout reports both is_connect and is_timeout; it counts as a
// connection failure.
fn map_error(err: reqwest::Error) -> TransportError {
    let message = describe(&err);
    if err.is_connect() {
        TransportError::Connect(message)
    } else if err.is_timeout() {
        TransportError::Timeout(message)
    } else if err.is_request() && err.status().is_none() {
        TransportError::NoResponse(message)
    } else {
        TransportError::Other(message)
    }
}

/// Render an error and every `source()` below it, joined by `": "`.
fn describe(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
