//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check credentials are present
//! - Validate value ranges (multiplier > 0, timeouts > 0)
//! - Check every endpoint is an absolute http(s) URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the client

use thiserror::Error;
use url::Url;

use crate::config::schema::ClientConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("credentials.{0} must not be empty")]
    MissingCredential(&'static str),

    #[error("retry.multiplier must be a finite number greater than 0, got {0}")]
    InvalidMultiplier(f64),

    #[error("transport.{0} must be greater than 0")]
    ZeroTimeout(&'static str),

    #[error("at least one endpoint must be configured")]
    NoEndpoints,

    #[error("endpoint '{key}' has invalid URL '{url}': {reason}")]
    InvalidEndpoint {
        key: String,
        url: String,
        reason: String,
    },
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let credentials = &config.credentials;
    for (field, value) in [
        ("corp_code", &credentials.corp_code),
        ("user_name", &credentials.user_name),
        ("application", &credentials.application),
        ("private_key", &credentials.private_key),
    ] {
        if value.trim().is_empty() {
            errors.push(ValidationError::MissingCredential(field));
        }
    }

    let multiplier = config.retry.multiplier;
    if !multiplier.is_finite() || multiplier <= 0.0 {
        errors.push(ValidationError::InvalidMultiplier(multiplier));
    }

    if config.transport.connect_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_timeout_secs"));
    }
    if config.transport.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_timeout_secs"));
    }

    if config.endpoints.is_empty() {
        errors.push(ValidationError::NoEndpoints);
    }
    for (key, url) in &config.endpoints {
        if let Err(reason) = check_endpoint(url) {
            errors.push(ValidationError::InvalidEndpoint {
                key: key.clone(),
                url: url.clone(),
                reason,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_endpoint(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("unsupported scheme '{}'", other)),
    }
}
