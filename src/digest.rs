//! Digest value type
//!
//! A SHA-256 digest rendered as 64 lowercase hexadecimal characters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Length of a hex-encoded SHA-256 digest
pub const DIGEST_HEX_LEN: usize = 64;

/// A hex-encoded 256-bit digest
///
/// Always exactly 64 characters from `[0-9a-f]`. Values are only built by
/// the hashing engine or through [`DigestHex::parse`], so holding one is
/// proof of a well-formed digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DigestHex(String);

/// Rejected digest text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not a 64-character lowercase hex digest: {0:?}")]
pub struct MalformedDigest(pub String);

impl DigestHex {
    /// Render raw digest bytes as lowercase hex
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        Self(hex::encode(bytes))
    }

    /// Validate text as a digest
    ///
    /// No case folding or trimming happens here; see
    /// [`crate::verify::normalize_expected`] for user input.
    pub fn parse(value: &str) -> Result<Self, MalformedDigest> {
        if is_digest_hex(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(MalformedDigest(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Check the 64-lowercase-hex-chars shape
pub fn is_digest_hex(value: &str) -> bool {
    value.len() == DIGEST_HEX_LEN
        && value
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

impl fmt::Display for DigestHex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DigestHex {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for DigestHex {
    type Err = MalformedDigest;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DigestHex {
    type Error = MalformedDigest;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if is_digest_hex(&value) {
            Ok(Self(value))
        } else {
            Err(MalformedDigest(value))
        }
    }
}

impl From<DigestHex> for String {
    fn from(digest: DigestHex) -> Self {
        digest.0
    }
}
