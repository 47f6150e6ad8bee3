//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber for binaries
//! - Provide the retry/failure logging boundary used by the client
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` wins over the configured level
//! - Retry logging is infallible; a sink cannot disturb the retry loop

use std::sync::{Arc, Mutex};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Install a global fmt subscriber.
///
/// Does nothing if a subscriber is already installed.
pub fn init_logging(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directives(&config.log_level).into());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Filter directives used when `RUST_LOG` is unset.
fn default_directives(level: &str) -> String {
    format!("zhiyoubao_sdk={0},zyb={0}", level)
}

/// Receives one message per retry and per terminal failure.
pub trait RetryLogger: Send + Sync {
    fn log(&self, message: &str);
}

/// Default sink: emits a `warn` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingRetryLogger;

impl RetryLogger for TracingRetryLogger {
    fn log(&self, message: &str) {
        tracing::warn!(target: "zhiyoubao_sdk::retry", "{}", message);
    }
}

/// Keeps messages in memory. Handy in tests and for surfacing retry history.
#[derive(Debug, Clone, Default)]
pub struct MemoryRetryLogger {
    messages: Arc<Mutex<Vec<String>>>,
}

impl MemoryRetryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        match self.messages.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl RetryLogger for MemoryRetryLogger {
    fn log(&self, message: &str) {
        match self.messages.lock() {
            Ok(mut guard) => guard.push(message.to_string()),
            Err(poisoned) => poisoned.into_inner().push(message.to_string()),
        }
    }
}
