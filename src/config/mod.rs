//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → ZYB_* environment overrides (credentials)
//!     → validation.rs (semantic checks)
//!     → ClientConfig (validated, immutable)
//!     → owned by client::Client for its lifetime
//! ```
//!
//! # Design Decisions
//! - Config is immutable once handed to the client
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::ClientConfig;
pub use schema::Credentials;
pub use schema::ObservabilityConfig;
pub use schema::RetryPolicy;
pub use schema::TransportConfig;
