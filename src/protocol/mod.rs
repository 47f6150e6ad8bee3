//! Request and response shape contracts.
//!
//! # Data Flow
//! ```text
//! caller
//!     → QueryOrderStatusRequest (ApiRequest: method, api name, endpoint key, params)
//!     → client::Client::send (envelope, sign, transport, retry)
//!     → generic tree (serde_json::Value)
//!     → QueryOrderStatusResponse (ApiResponse adapter)
//! ```
//!
//! # Design Decisions
//! - One type per remote operation; the response adapter is an associated type
//! - Params keep insertion order because it is covered by the signature
//! - Adapters own single-vs-list normalization, the codec never guesses

pub mod order;
pub mod params;
pub mod request;
pub mod response;

pub use order::{QueryOrderStatusRequest, QueryOrderStatusResponse, TicketOrder};
pub use params::{ParamValue, Params};
pub use request::ApiRequest;
pub use response::{ApiResponse, RawResponse};
