//! Response shape contract.
//!
//! The codec hands back an untyped tree; adapters implementing
//! [`ApiResponse`] pick out the fields they care about and smooth over the
//! single-item vs. list ambiguity of the remote schema.

use serde_json::Value;

/// Code the service returns for a successful call.
pub const SUCCESS_CODE: &str = "0";

/// Typed view over a parsed response tree.
pub trait ApiResponse: Sized {
    /// Build the response from the generic tree. Missing fields are tolerated.
    fn from_tree(tree: Value) -> Self;

    /// The raw tree this response was built from.
    fn raw(&self) -> &Value;

    fn code(&self) -> &str;

    fn description(&self) -> &str;

    fn is_success(&self) -> bool {
        self.code() == SUCCESS_CODE
    }
}

/// Read a string leaf, treating numbers as their textual form.
pub fn text_field(tree: &Value, key: &str) -> Option<String> {
    match tree.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Normalize a repeated element to a list.
///
/// The service returns a bare object when an element occurs once and an
/// array when it repeats.
pub fn as_list(value: Option<&Value>) -> Vec<&Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().collect(),
        Some(Value::String(s)) if s.is_empty() => Vec::new(),
        Some(other) => vec![other],
    }
}

/// Untyped response for callers that only need the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    code: String,
    description: String,
    tree: Value,
}

impl ApiResponse for RawResponse {
    fn from_tree(tree: Value) -> Self {
        Self {
            code: text_field(&tree, "code").unwrap_or_default(),
            description: text_field(&tree, "description").unwrap_or_default(),
            tree,
        }
    }

    fn raw(&self) -> &Value {
        &self.tree
    }

    fn code(&self) -> &str {
        &self.code
    }

    fn description(&self) -> &str {
        &self.description
    }
}
