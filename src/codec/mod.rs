//! XML wire codec.
//!
//! # Data Flow
//! ```text
//! Outbound:
//!     ApiRequest params + credentials
//!     → envelope.rs (fixed skeleton, CDATA leaves)
//!     → signature.rs (md5 over "xmlMsg=" + envelope + key)
//!     → form body { xmlMsg, sign }
//!
//! Inbound:
//!     response bytes
//!     → parse.rs (XML → serde_json::Value tree)
//! ```
//!
//! # Design Decisions
//! - Envelope is built and signed once per call; every attempt resends the same bytes
//! - No XML-name escaping: parameter keys are trusted identifiers
//! - Parsing never normalizes single-vs-list shapes

pub mod envelope;
pub mod parse;
pub mod signature;

pub use envelope::{build_envelope, build_envelope_on};
pub use parse::{parse_response, CodecError};
pub use signature::{sign, Signature};

/// A built envelope together with its signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedEnvelope {
    pub xml: String,
    pub signature: Signature,
}

impl SignedEnvelope {
    /// Sign `xml` with `private_key`.
    pub fn new(xml: String, private_key: &str) -> Self {
        let signature = sign(&xml, private_key);
        Self { xml, signature }
    }

    /// Form fields sent as the request body.
    pub fn form_fields(&self) -> Vec<(String, String)> {
        vec![
            ("xmlMsg".to_string(), self.xml.clone()),
            ("sign".to_string(), self.signature.as_str().to_string()),
        ]
    }
}
