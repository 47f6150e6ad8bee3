//! Endpoint key → URL resolution.

use std::collections::BTreeMap;

use crate::error::ClientError;

/// Key used by requests that do not name an endpoint.
pub const DEFAULT_ENDPOINT_KEY: &str = "default";

/// Service URL registered under [`DEFAULT_ENDPOINT_KEY`] unless configured otherwise.
pub const DEFAULT_ENDPOINT_URL: &str = "http://zyb-zff.sendinfo.com.cn/boss/service/code.htm";

/// Immutable endpoint table owned by a [`crate::Client`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointMap {
    urls: BTreeMap<String, String>,
}

impl EndpointMap {
    pub fn new(urls: BTreeMap<String, String>) -> Self {
        Self { urls }
    }

    /// Add or replace one entry.
    pub fn with(mut self, key: impl Into<String>, url: impl Into<String>) -> Self {
        self.urls.insert(key.into(), url.into());
        self
    }

    /// Look up the URL for `key`.
    ///
    /// # Errors
    /// [`ClientError::Configuration`] if the key is unknown.
    pub fn resolve(&self, key: &str) -> Result<&str, ClientError> {
        self.urls
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| ClientError::Configuration(format!("unknown endpoint key '{}'", key)))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.urls.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

impl Default for EndpointMap {
    fn default() -> Self {
        Self::new(BTreeMap::new()).with(DEFAULT_ENDPOINT_KEY, DEFAULT_ENDPOINT_URL)
    }
}

impl From<BTreeMap<String, String>> for EndpointMap {
    fn from(urls: BTreeMap<String, String>) -> Self {
        Self::new(urls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_map() {
        let map = EndpointMap::default();
        assert_eq!(map.resolve(DEFAULT_ENDPOINT_KEY).unwrap(), DEFAULT_ENDPOINT_URL);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_unknown_key() {
        let map = EndpointMap::default();
        let err = map.resolve("ota").unwrap_err();
        assert!(matches!(err, ClientError::Configuration(ref msg) if msg.contains("'ota'")));
    }

    #[test]
    fn test_with_replaces() {
        let map = EndpointMap::default()
            .with(DEFAULT_ENDPOINT_KEY, "http://127.0.0.1:9000/api")
            .with("backup", "http://127.0.0.1:9001/api");

        assert_eq!(map.resolve("default").unwrap(), "http://127.0.0.1:9000/api");
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["backup", "default"]);
    }
}
