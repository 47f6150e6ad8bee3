//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! client::Client::send produces:
//!     → logging.rs (tracing events + RetryLogger messages)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → whatever subscriber / metrics recorder the application installs
//! ```
//!
//! # Design Decisions
//! - Request ID (uuid v4) on every send span
//! - The private key never appears in any event

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, MemoryRetryLogger, RetryLogger, TracingRetryLogger};
