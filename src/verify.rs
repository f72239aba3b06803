//! Digest comparison and the receiving-side verify flow
//!
//! `compare` is strict: it expects an already-normalized, lowercase
//! digest and reports malformed input as an error, never as a mismatch.
//! Case folding of pasted values happens in [`normalize_expected`].

use serde::{Deserialize, Serialize};

use crate::digest::{is_digest_hex, DigestHex};
use crate::hashing::{compute_digest, ByteSource, HashError, HashOptions, ProgressObserver};

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Match,
    Mismatch,
}

/// Result of one verify attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub outcome: Outcome,
    pub expected: DigestHex,
    pub computed: DigestHex,
}

impl ComparisonResult {
    pub fn is_match(&self) -> bool {
        self.outcome == Outcome::Match
    }
}

/// Verify error types
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("No expected digest provided")]
    MissingExpectedDigest,

    #[error("Malformed expected digest: {0:?} (expected 64 lowercase hex characters)")]
    MalformedExpectedDigest(String),

    #[error(transparent)]
    Hash(#[from] HashError),
}

// ============================================================================
// Comparison
// ============================================================================

/// Compare an expected digest against a computed one
///
/// `expected` must already be 64 lowercase hex characters.
pub fn compare(expected: &str, computed: &DigestHex) -> Result<ComparisonResult, VerifyError> {
    let expected =
        DigestHex::parse(expected).map_err(|e| VerifyError::MalformedExpectedDigest(e.0))?;

    let outcome = if expected.as_str() == computed.as_str() {
        Outcome::Match
    } else {
        Outcome::Mismatch
    };

    Ok(ComparisonResult {
        outcome,
        expected,
        computed: computed.clone(),
    })
}

/// Normalize a user-supplied expected digest: trim and lowercase
///
/// Blank input yields `None`.
pub fn normalize_expected(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

// ============================================================================
// Verify Flow
// ============================================================================

/// Hash a received source and compare it against the expected digest
///
/// The expected value is checked before any bytes are read, so a missing
/// or malformed digest never costs a full hash.
pub async fn verify_source(
    expected: Option<&str>,
    source: &dyn ByteSource,
    options: &HashOptions,
    observer: Option<&mut dyn ProgressObserver>,
) -> Result<ComparisonResult, VerifyError> {
    let expected = expected
        .and_then(normalize_expected)
        .ok_or(VerifyError::MissingExpectedDigest)?;
    if !is_digest_hex(&expected) {
        return Err(VerifyError::MalformedExpectedDigest(expected));
    }

    let computed = compute_digest(source, options, observer).await?;
    let result = compare(&expected, &computed)?;

    tracing::info!(
        outcome = ?result.outcome,
        expected = %result.expected,
        computed = %result.computed,
        "Verification complete"
    );

    Ok(result)
}
