//! Fixed 32-byte SHA-256 digests.
//!
//! Every leaf and every internal tree node is a [`Digest`]; the same hash
//! function is used end-to-end so proofs compare digests as opaque values.
//! The canonical external representation is the lowercase hex string, which
//! is also how digests serialize in proofs, headers, and receipts.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest as _, Sha256};
use std::fmt;
use thiserror::Error;

/// Error type for digest operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DigestError {
    /// Digest has wrong length
    #[error("Invalid digest length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Invalid hex string
    #[error("Invalid hex string: {0}")]
    InvalidHex(String),
}

impl From<hex::FromHexError> for DigestError {
    fn from(err: hex::FromHexError) -> Self {
        DigestError::InvalidHex(err.to_string())
    }
}

/// 32-byte fixed-size digest
///
/// Wraps a SHA-256 output. Hex parsing accepts either case and
/// canonicalizes to bytes, so digest comparison is case-insensitive
/// by construction.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Digest(pub [u8; 32]);

impl Digest {
    /// Create a digest from raw bytes
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse a digest from a hex string
    pub fn from_hex(s: &str) -> Result<Self, DigestError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(DigestError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// Lowercase hex representation
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Compute the SHA-256 digest of arbitrary bytes
    pub fn sha256(data: &[u8]) -> Self {
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&Sha256::digest(data));
        Self(arr)
    }

    /// Hash two digests into their parent node, left digest first
    pub fn combine(left: &Self, right: &Self) -> Self {
        let mut combined = Vec::with_capacity(64);
        combined.extend_from_slice(&left.0);
        combined.extend_from_slice(&right.0);
        Self::sha256(&combined)
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({}...)", &self.to_hex()[..16])
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for Digest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Digest::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_hex_roundtrip() {
        let original = Digest::new([0x42u8; 32]);
        let hex = original.to_hex();
        let parsed = Digest::from_hex(&hex).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_digest_hex_case_insensitive() {
        let lower = Digest::from_hex(&"ab".repeat(32)).unwrap();
        let upper = Digest::from_hex(&"AB".repeat(32)).unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_digest_rejects_wrong_length() {
        assert!(matches!(
            Digest::from_hex("abcd"),
            Err(DigestError::InvalidLength { .. })
        ));
        assert!(matches!(
            Digest::from_hex("zz"),
            Err(DigestError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_sha256_known_vector() {
        // SHA-256 of the empty string
        let digest = Digest::sha256(b"");
        assert_eq!(
            digest.to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_combine_is_order_sensitive() {
        let left = Digest::new([0x11u8; 32]);
        let right = Digest::new([0x22u8; 32]);
        assert_ne!(Digest::combine(&left, &right), Digest::combine(&right, &left));
    }

    #[test]
    fn test_serde_as_hex_string() {
        let digest = Digest::sha256(b"receipt");
        let json = serde_json::to_string(&digest).unwrap();
        assert_eq!(json, format!("\"{}\"", digest.to_hex()));

        let back: Digest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, digest);
    }
}
