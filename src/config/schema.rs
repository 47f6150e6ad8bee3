//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::client::endpoints::{DEFAULT_ENDPOINT_KEY, DEFAULT_ENDPOINT_URL};

/// Root configuration for the API client.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Account identity and signing key.
    pub credentials: Credentials,

    /// Retry and backoff policy.
    pub retry: RetryPolicy,

    /// HTTP transport settings.
    pub transport: TransportConfig,

    /// Endpoint key → URL.
    pub endpoints: BTreeMap<String, String>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

fn default_endpoints() -> BTreeMap<String, String> {
    BTreeMap::from([(
        DEFAULT_ENDPOINT_KEY.to_string(),
        DEFAULT_ENDPOINT_URL.to_string(),
    )])
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            credentials: Credentials::default(),
            retry: RetryPolicy::default(),
            transport: TransportConfig::default(),
            endpoints: default_endpoints(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Config with the given credentials and defaults everywhere else.
    pub fn new(
        corp_code: impl Into<String>,
        user_name: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Self {
        Self {
            credentials: Credentials {
                corp_code: corp_code.into(),
                user_name: user_name.into(),
                private_key: private_key.into(),
                ..Credentials::default()
            },
            ..Self::default()
        }
    }
}

/// Account identity.
///
/// # Security
/// The private key is never serialized and is redacted from `Debug` output.
#[derive(Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Credentials {
    /// Enterprise code issued by the service.
    pub corp_code: String,

    /// Account user name.
    pub user_name: String,

    /// Application identifier placed in the envelope header.
    pub application: String,

    /// Shared secret used for signing.
    #[serde(skip_serializing)]
    pub private_key: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            corp_code: String::new(),
            user_name: String::new(),
            application: "SendCode".to_string(),
            private_key: String::new(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("corp_code", &self.corp_code)
            .field("user_name", &self.user_name)
            .field("application", &self.application)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt (0 disables retrying).
    pub max_retries: u32,

    /// Delay before the first retry in milliseconds.
    pub initial_delay_ms: u64,

    /// Backoff multiplier applied per retry.
    pub multiplier: f64,

    /// Upper bound for any single delay in milliseconds.
    pub max_delay_ms: u64,

    /// Retry when no response arrived in time.
    pub retry_on_timeout: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 1000,
            multiplier: 2.0,
            max_delay_ms: 30_000,
            retry_on_timeout: true,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            initial_delay_ms: 0,
            multiplier: 1.0,
            max_delay_ms: 0,
            retry_on_timeout: false,
        }
    }
}

/// HTTP transport configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct TransportConfig {
    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Total request timeout in seconds.
    pub request_timeout_secs: u64,

    /// User agent string.
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            user_agent: format!("zhiyoubao-sdk/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_service_conventions() {
        let config = ClientConfig::new("CORP", "user", "key");
        assert_eq!(config.credentials.application, "SendCode");
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.retry.initial_delay_ms, 1000);
        assert_eq!(config.retry.multiplier, 2.0);
        assert_eq!(config.retry.max_delay_ms, 30_000);
        assert!(config.retry.retry_on_timeout);
        assert_eq!(config.transport.request_timeout_secs, 30);
        assert_eq!(
            config.endpoints.get(DEFAULT_ENDPOINT_KEY).map(String::as_str),
            Some(DEFAULT_ENDPOINT_URL)
        );
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            [credentials]
            corp_code = "CORP"
            user_name = "user"
            private_key = "key"

            [retry]
            max_retries = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.retry.initial_delay_ms, 1000);
        assert_eq!(config.credentials.application, "SendCode");
        assert!(config.endpoints.contains_key(DEFAULT_ENDPOINT_KEY));
    }

    #[test]
    fn test_private_key_not_leaked() {
        let config = ClientConfig::new("CORP", "user", "super-secret");
        assert!(!format!("{:?}", config).contains("super-secret"));

        let serialized = toml::to_string(&config).unwrap();
        assert!(!serialized.contains("super-secret"));
    }

    #[test]
    fn test_disabled_policy() {
        let policy = RetryPolicy::disabled();
        assert_eq!(policy.max_retries, 0);
        assert!(!policy.retry_on_timeout);
    }
}
