//! Request dispatch.
//!
//! Ties the codec, the transport and the retry controller into one `send`.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use reqwest::Method;
use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

use crate::client::endpoints::EndpointMap;
use crate::codec::{build_envelope, parse_response, SignedEnvelope};
use crate::config::validation::validate_config;
use crate::config::{ClientConfig, Credentials, RetryPolicy};
use crate::error::ClientError;
use crate::observability::{metrics, RetryLogger, TracingRetryLogger};
use crate::protocol::{ApiRequest, ApiResponse};
use crate::resilience::{FailureKind, RetryAttempt, RetryController, RetryError};
use crate::transport::{ReqwestTransport, Transport, TransportRequest};

/// A request resolved and signed, ready to go on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: String,
    pub envelope: SignedEnvelope,
}

impl PreparedRequest {
    pub fn transport_request(&self) -> TransportRequest {
        TransportRequest {
            method: self.method.clone(),
            url: self.url.clone(),
            form: self.envelope.form_fields(),
        }
    }
}

/// ZhiYouBao API client.
///
/// All state is read-only after construction, so one client can serve
/// concurrent `send` calls; clones share the transport and logger.
#[derive(Clone)]
pub struct Client {
    credentials: Credentials,
    policy: RetryPolicy,
    endpoints: EndpointMap,
    transport: Arc<dyn Transport>,
    logger: Arc<dyn RetryLogger>,
}

impl Client {
    /// Build a client with the default reqwest transport.
    ///
    /// # Errors
    /// [`ClientError::Configuration`] if the config fails validation or the
    /// HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        check_config(&config)?;
        let transport = ReqwestTransport::new(&config.transport)
            .map_err(|e| ClientError::Configuration(e.to_string()))?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Build a client on top of a caller-supplied transport.
    ///
    /// # Errors
    /// [`ClientError::Configuration`] if the config fails validation.
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ClientError> {
        check_config(&config)?;
        Ok(Self {
            credentials: config.credentials,
            policy: config.retry,
            endpoints: EndpointMap::from(config.endpoints),
            transport,
            logger: Arc::new(TracingRetryLogger),
        })
    }

    /// Replace the retry/failure logging sink.
    pub fn with_logger(mut self, logger: Arc<dyn RetryLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn endpoints(&self) -> &EndpointMap {
        &self.endpoints
    }

    /// Resolve the endpoint and build the signed envelope without sending.
    ///
    /// # Errors
    /// [`ClientError::Configuration`] if the request's endpoint key is unknown.
    pub fn prepare<R: ApiRequest>(&self, request: &R) -> Result<PreparedRequest, ClientError> {
        let url = self.endpoints.resolve(request.endpoint_key())?.to_string();
        let xml = build_envelope(request.api_name(), &request.params(), &self.credentials);

        Ok(PreparedRequest {
            method: request.method(),
            url,
            envelope: SignedEnvelope::new(xml, &self.credentials.private_key),
        })
    }

    /// Send `request` and return the parsed response tree.
    ///
    /// The envelope is built and signed once; retryable failures resend the
    /// same payload after a backoff delay.
    ///
    /// # Errors
    /// - [`ClientError::Configuration`]: unknown endpoint key
    /// - [`ClientError::Transport`]: a non-retryable transport failure
    /// - [`ClientError::Parse`]: the reply was not well-formed XML
    /// - [`ClientError::ExhaustedRetries`]: retry budget spent
    pub async fn send<R: ApiRequest>(&self, request: &R) -> Result<Value, ClientError> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "send",
            %request_id,
            api = request.api_name(),
            endpoint = request.endpoint_key()
        );

        self.dispatch(request).instrument(span).await
    }

    /// [`Client::send`] followed by the request's response adapter.
    pub async fn call<R: ApiRequest>(&self, request: &R) -> Result<R::Response, ClientError> {
        let tree = self.send(request).await?;
        Ok(R::Response::from_tree(tree))
    }

    async fn dispatch<R: ApiRequest>(&self, request: &R) -> Result<Value, ClientError> {
        let start = Instant::now();
        let api = request.api_name();

        let prepared = match self.prepare(request) {
            Ok(prepared) => prepared,
            Err(e) => {
                tracing::error!(error = %e, "Cannot dispatch request");
                self.logger.log(&format!("{} failed before sending: {}", api, e));
                metrics::record_request(api, e.outcome(), start);
                return Err(e);
            }
        };
        let outbound = prepared.transport_request();
        let outbound = &outbound;

        let controller = RetryController::new(&self.policy, self.logger.as_ref(), api);
        let result = controller
            .run(classify, move |attempt| self.attempt(outbound, attempt))
            .await;

        let result = match result {
            Ok(tree) => Ok(tree),
            Err(RetryError::Exhausted {
                attempts,
                source: ClientError::Transport(source),
            }) => Err(ClientError::ExhaustedRetries { attempts, source }),
            Err(other) => Err(other.into_source()),
        };

        match &result {
            Ok(_) => {
                tracing::info!(elapsed = ?start.elapsed(), "Request completed");
                metrics::record_request(api, "success", start);
            }
            Err(e) => {
                tracing::warn!(error = %e, elapsed = ?start.elapsed(), "Request failed");
                metrics::record_request(api, e.outcome(), start);
            }
        }

        result
    }

    async fn attempt(
        &self,
        outbound: &TransportRequest,
        attempt: RetryAttempt,
    ) -> Result<Value, ClientError> {
        tracing::debug!(
            attempt = attempt.index + 1,
            delay_ms = attempt.delay.as_millis() as u64,
            url = %outbound.url,
            "Sending attempt"
        );

        let response = self.transport.send(outbound).await?.error_for_status()?;
        let tree = parse_response(&response.body)?;
        Ok(tree)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("credentials", &self.credentials)
            .field("policy", &self.policy)
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}

fn check_config(config: &ClientConfig) -> Result<(), ClientError> {
    validate_config(config).map_err(|errors| {
        let details: Vec<String> = errors.iter().map(ToString::to_string).collect();
        ClientError::Configuration(format!("invalid configuration: {}", details.join(", ")))
    })
}

/// Only transport failures are candidates for retry; a parse failure means
/// the exchange itself succeeded.
fn classify(error: &ClientError) -> FailureKind {
    match error {
        ClientError::Transport(e) => FailureKind::of(e),
        _ => FailureKind::Other,
    }
}
