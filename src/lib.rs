//! HashPDF Library
//!
//! Client-side document integrity: a sender hashes a file and shares a
//! verification link; the recipient hashes the file they received and
//! learns whether it is byte-identical to the original.
//!
//! # Modules
//!
//! - `hashing`: chunked SHA-256 with progress reporting
//! - `link`: verification link encoding/decoding and share URLs
//! - `verify`: digest comparison and the receiving-side flow
//! - `config`: environment-based configuration

pub mod config;
pub mod digest;
pub mod error;
pub mod format;
pub mod hashing;
pub mod link;
pub mod verify;

pub use config::Config;
pub use digest::DigestHex;
pub use error::{Error, Result};
pub use hashing::{compute_digest, ByteSource, HashOptions, Progress, ProgressObserver};
pub use link::{decode, decode_url, encode, DecodedFragment, EncodedLink, VerificationRequest};
pub use verify::{compare, verify_source, ComparisonResult, Outcome};
