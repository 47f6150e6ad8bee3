//! ZhiYouBao ticketing API client.
//!
//! Builds signed XML envelopes, posts them over HTTP with retry and
//! exponential backoff, and parses the XML replies into a generic tree.
//!
//! # Architecture Overview
//!
//! ```text
//!     caller
//!       │  ApiRequest (protocol)
//!       ▼
//!  ┌──────────┐   ┌─────────┐   ┌────────────┐   ┌───────────┐
//!  │  client  │──▶│  codec  │──▶│ resilience │──▶│ transport │──▶ ZhiYouBao
//!  │dispatcher│   │envelope │   │  retries   │   │  reqwest  │
//!  └──────────┘   │  sign   │   │  backoff   │   └───────────┘
//!       ▲         └─────────┘   └────────────┘         │
//!       │              parse ◀─────────────────────────┘
//!       │
//!  ┌────────────────────────────────────────┐
//!  │ config (TOML + env) · observability    │
//!  └────────────────────────────────────────┘
//! ```

pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod observability;
pub mod protocol;
pub mod resilience;
pub mod transport;

pub use client::{Client, EndpointMap};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use protocol::{ApiRequest, ApiResponse, QueryOrderStatusRequest, QueryOrderStatusResponse};
