//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Signed envelope from client::Client::send:
//!     → transport attempt (connect/request timeouts enforced by the transport)
//!     → On failure: retries.rs (classify, decide whether to retry)
//!     → backoff.rs (delay before the next attempt)
//! ```
//!
//! # Design Decisions
//! - Attempts are strictly sequential; at most one request in flight per call
//! - Every API call is POST, but ZhiYouBao requests are safe to resend
//! - Budget exhaustion and non-retryable failures are reported differently

pub mod backoff;
pub mod retries;

pub use backoff::{calculate_backoff, calculate_backoff_with};
pub use retries::{is_retryable, FailureKind, RetryAttempt, RetryController, RetryError};
