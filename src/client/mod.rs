//! ZhiYouBao API client.
//!
//! # Data Flow
//! ```text
//! ApiRequest
//!     → endpoints.rs (endpoint key → URL, unknown key is fatal)
//!     → codec (envelope + signature, built once)
//!     → dispatcher.rs (RetryController loop around Transport::send)
//!     → codec::parse_response (generic tree)
//!     → ApiResponse adapter (Client::call only)
//! ```
//!
//! # Design Decisions
//! - The endpoint table is owned by each client, never process-wide
//! - Transport and retry logger are trait objects so tests can swap them
//! - A parse failure is final: the exchange itself already succeeded

pub mod dispatcher;
pub mod endpoints;

pub use dispatcher::{Client, PreparedRequest};
pub use endpoints::{EndpointMap, DEFAULT_ENDPOINT_KEY, DEFAULT_ENDPOINT_URL};
