//! Content digest newtype.

use serde::{Deserialize, Deserializer, Serialize};

use crate::SchemaError;

/// Length in bytes of a SHA1 digest (160 bits).
pub const SHA1_LEN: usize = 20;

/// A validated SHA1 digest (40 lower-case hex characters).
///
/// This is the only key used to query lookup services. Validation happens at
/// construction and at deserialization so a malformed digest never reaches a
/// request URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Sha1Digest(String);

impl Sha1Digest {
    /// Create a new `Sha1Digest`, validating the input.
    ///
    /// Accepts strings with or without a `sha1:` prefix. Upper-case hex is
    /// normalized to lower-case.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidDigest`] if the hex portion is not exactly
    /// 40 ASCII hex characters.
    pub fn new(s: impl Into<String>) -> Result<Self, SchemaError> {
        let s = s.into();
        let hex = s.strip_prefix("sha1:").unwrap_or(&s);

        if hex.len() != SHA1_LEN * 2 {
            return Err(SchemaError::InvalidDigest(format!(
                "expected 40 hex characters, got {} in '{s}'",
                hex.len()
            )));
        }

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(SchemaError::InvalidDigest(format!(
                "contains non-hex characters in '{s}'"
            )));
        }

        Ok(Self(hex.to_ascii_lowercase()))
    }

    /// Build a digest from the raw output of a SHA1 hasher.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is not exactly [`SHA1_LEN`] bytes long.
    pub fn from_bytes(bytes: impl AsRef<[u8]>) -> Self {
        let bytes = bytes.as_ref();
        assert_eq!(bytes.len(), SHA1_LEN, "SHA1 output must be 20 bytes");
        Self(hex::encode(bytes))
    }

    /// Get the digest as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Sha1Digest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Sha1Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Sha1Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
