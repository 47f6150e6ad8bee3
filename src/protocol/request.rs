//! Request shape contract.

use reqwest::Method;

use crate::client::endpoints::DEFAULT_ENDPOINT_KEY;
use crate::protocol::params::Params;
use crate::protocol::response::ApiResponse;

/// One remote operation.
///
/// Implementors describe what to send; the client takes care of the envelope,
/// signing, transport and retries.
pub trait ApiRequest {
    /// Adapter that turns the generic response tree into a typed response.
    type Response: ApiResponse;

    /// HTTP method used for the exchange.
    fn method(&self) -> Method {
        Method::POST
    }

    /// Transaction name placed in the envelope (e.g. `NEW_QUERY_ORDER_REQ`).
    fn api_name(&self) -> &str;

    /// Key into the client's endpoint map.
    fn endpoint_key(&self) -> &str {
        DEFAULT_ENDPOINT_KEY
    }

    /// Business parameters appended after the identity block.
    fn params(&self) -> Params;
}
