//! Client error type.

use thiserror::Error;

use crate::codec::CodecError;
use crate::transport::TransportError;

/// Errors returned by [`crate::Client`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// Client setup or request routing problem (unknown endpoint key, bad
    /// transport settings). Never retried.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The final, non-retryable transport failure.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body was not well-formed XML.
    #[error("failed to parse response: {0}")]
    Parse(#[from] CodecError),

    /// Every allowed attempt failed with a retryable error.
    #[error("request failed after {attempts} attempt(s): {source}")]
    ExhaustedRetries {
        attempts: u32,
        #[source]
        source: TransportError,
    },
}

impl ClientError {
    /// The underlying transport failure, if any.
    pub fn transport_error(&self) -> Option<&TransportError> {
        match self {
            ClientError::Transport(e) | ClientError::ExhaustedRetries { source: e, .. } => Some(e),
            _ => None,
        }
    }

    /// Short label used for metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            ClientError::Configuration(_) => "configuration_error",
            ClientError::Transport(_) => "transport_error",
            ClientError::Parse(_) => "parse_error",
            ClientError::ExhaustedRetries { .. } => "exhausted_retries",
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
