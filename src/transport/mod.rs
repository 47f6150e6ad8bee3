//! HTTP transport boundary.
//!
//! # Responsibilities
//! - Perform one method/URL/form-body exchange
//! - Report what happened: a response (any status) or a transport failure
//!
//! # Design Decisions
//! - The client depends on the [`Transport`] trait only, never on reqwest types
//!   beyond `Method`
//! - Connection pooling, TLS and timeouts belong to the implementation
//! - Errors carry messages, not library error objects, so classification stays
//!   library-agnostic

pub mod http;

use async_trait::async_trait;
use reqwest::Method;
use thiserror::Error;

pub use http::ReqwestTransport;

/// One outbound exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    /// Sent as `application/x-www-form-urlencoded`.
    pub form: Vec<(String, String)>,
}

/// What came back from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into [`TransportError::Status`].
    pub fn error_for_status(self) -> Result<Self, TransportError> {
        if self.is_success() {
            return Ok(self);
        }
        Err(TransportError::Status {
            status: self.status,
            body: String::from_utf8_lossy(&self.body).into_owned(),
        })
    }
}

/// Transport-level failures.
///
/// Messages carry the whole cause chain of the underlying error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The connection could not be established; nothing reached the server.
    #[error("connection failed: {0}")]
    Connect(String),

    /// No response arrived in time.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The request went out but the connection ended before any response.
    #[error("no response received: {0}")]
    NoResponse(String),

    /// The server answered with a non-success status.
    #[error("server returned HTTP {status}")]
    Status { status: u16, body: String },

    /// Anything else (protocol errors, body read failures, ...).
    #[error("transport error: {0}")]
    Other(String),
}

/// Performs HTTP exchanges for the client.
///
/// Implementations must be safe to call from several tasks at once.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and return the server's response regardless of status.
    async fn send(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError>;
}
