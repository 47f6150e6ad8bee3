//! Request signing.
//!
//! `sign = hex(md5("xmlMsg=" + envelope + private_key))`, lowercase. The
//! service recomputes the digest over the bytes it receives, so the input
//! must be the exact envelope that goes on the wire.

use md5::{Digest, Md5};
use std::fmt;

/// Prefix mixed into the digest ahead of the envelope.
pub const SIGN_PREFIX: &str = "xmlMsg=";

/// Lowercase hex MD5 digest of a signed envelope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature(String);

impl Signature {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sign an envelope with the account's private key.
pub fn sign(envelope: &str, private_key: &str) -> Signature {
    let mut hasher = Md5::new();
    hasher.update(SIGN_PREFIX.as_bytes());
    hasher.update(envelope.as_bytes());
    hasher.update(private_key.as_bytes());
    Signature(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digest() {
        // md5("xmlMsg=") with empty envelope and key
        assert_eq!(sign("", "").as_str(), hex::encode(Md5::digest(b"xmlMsg=")));
        // md5("xmlMsg=<a/>key")
        assert_eq!(
            sign("<a/>", "key").as_str(),
            hex::encode(Md5::digest(b"xmlMsg=<a/>key"))
        );
    }

    #[test]
    fn test_format_is_lowercase_hex() {
        let signature = sign("<PWBRequest></PWBRequest>", "private");
        assert_eq!(signature.as_str().len(), 32);
        assert!(signature
            .as_str()
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(sign("<x>1</x>", "k"), sign("<x>1</x>", "k"));
    }

    #[test]
    fn test_single_byte_changes_digest() {
        let base = sign("<x>1</x>", "k");
        assert_ne!(base, sign("<x>2</x>", "k"));
        assert_ne!(base, sign("<x>1</x>", "K"));
        assert_ne!(base, sign("<x>1</x> ", "k"));
    }

    #[test]
    fn test_concatenation_order() {
        // envelope + key must not be confused with key + envelope
        assert_ne!(sign("ab", "cd"), sign("cd", "ab"));
        assert_eq!(sign("ab", "cd"), sign("abc", "d"));
    }
}
