//! Hashing Engine
//!
//! Produces a SHA-256 digest for an arbitrary-size byte source with:
//! - Sequential, chunked reads for large inputs
//! - Monotonic progress reporting (0-100, always ending at 100)
//! - Cancellation and timeouts checked at slice boundaries
//!
//! Progress bands:
//! 1. Single read (input fits one chunk): 50 before, 80 after, 100 done
//! 2. Chunked read: `floor(loaded / total * 80)` per slice, 90, then 100

pub mod engine;
pub mod progress;
pub mod source;

pub use engine::{
    compute_digest, digest_bytes, CancelFlag, HashError, HashOptions, DEFAULT_CHUNK_SIZE,
};
pub use progress::{ChannelObserver, Phase, Progress, ProgressObserver};
pub use source::{ByteSource, FileSource, MemorySource};
