//! Chunked SHA-256 engine
//!
//! Inputs up to one chunk are read in a single operation. Larger inputs are
//! read slice by slice, strictly in order, and each slice is fed straight
//! into an incremental SHA-256 state. The whole input is never buffered.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use sha2::{Digest, Sha256};
use tokio::time::Instant;

use super::progress::{
    Progress, ProgressObserver, ProgressReporter, COMPLETE, DIGEST_STARTED, READ_COMPLETE,
    SINGLE_READ_STARTED,
};
use super::source::ByteSource;
use crate::digest::DigestHex;

/// Default chunk size: 2MB
pub const DEFAULT_CHUNK_SIZE: usize = 2 * 1024 * 1024;

// ============================================================================
// Options
// ============================================================================

/// Shared cancellation flag, checked between slice reads
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Per-call hashing options
#[derive(Debug, Clone)]
pub struct HashOptions {
    /// Slice size in bytes; must be positive
    pub chunk_size: usize,

    /// Deadline for the whole call, checked after each read
    pub timeout: Option<Duration>,

    pub cancel: Option<CancelFlag>,
}

impl Default for HashOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            timeout: None,
            cancel: None,
        }
    }
}

impl HashOptions {
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Hashing error types
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    #[error("Chunk size must be positive")]
    InvalidChunkSize,

    #[error("Read failed for bytes {start}..{end}: {source}")]
    ReadFailure {
        start: u64,
        end: u64,
        #[source]
        source: io::Error,
    },

    #[error("Hashing cancelled after {loaded} of {total} bytes")]
    Cancelled { loaded: u64, total: u64 },

    #[error("Hashing timed out after {0} ms")]
    TimedOut(u64),
}

// ============================================================================
// Engine
// ============================================================================

struct Guard<'o> {
    cancel: Option<&'o CancelFlag>,
    timeout: Option<Duration>,
    started: Instant,
    total: u64,
}

impl Guard<'_> {
    fn check_cancel(&self, loaded: u64) -> Result<(), HashError> {
        match self.cancel {
            Some(flag) if flag.is_cancelled() => {
                tracing::info!(loaded, total = self.total, "Hashing cancelled");
                Err(HashError::Cancelled {
                    loaded,
                    total: self.total,
                })
            }
            _ => Ok(()),
        }
    }

    fn check_deadline(&self) -> Result<(), HashError> {
        match self.timeout {
            Some(limit) if self.started.elapsed() >= limit => {
                tracing::warn!(timeout_ms = limit.as_millis() as u64, "Hashing timed out");
                Err(HashError::TimedOut(limit.as_millis() as u64))
            }
            _ => Ok(()),
        }
    }
}

async fn read_exact_range(
    source: &dyn ByteSource,
    start: u64,
    end: u64,
) -> Result<Vec<u8>, HashError> {
    let data = source
        .read_range(start, end)
        .await
        .map_err(|source| HashError::ReadFailure { start, end, source })?;

    if data.len() as u64 != end - start {
        return Err(HashError::ReadFailure {
            start,
            end,
            source: io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("expected {} bytes, got {}", end - start, data.len()),
            ),
        });
    }

    Ok(data)
}

/// Compute the SHA-256 digest of a byte source with progress reporting
///
/// Progress is emitted to `observer` (if any), never decreases, and ends at
/// exactly 100 on success. Observer failures are logged and ignored. On any
/// error no digest is returned.
pub async fn compute_digest(
    source: &dyn ByteSource,
    options: &HashOptions,
    observer: Option<&mut dyn ProgressObserver>,
) -> Result<DigestHex, HashError> {
    if options.chunk_size == 0 {
        return Err(HashError::InvalidChunkSize);
    }

    let total = source.len();
    let chunk_size = options.chunk_size as u64;
    let chunk_count = total.div_ceil(chunk_size);
    let guard = Guard {
        cancel: options.cancel.as_ref(),
        timeout: options.timeout,
        started: Instant::now(),
        total,
    };
    let mut reporter = ProgressReporter::new(observer);

    tracing::info!(
        file_size = total,
        chunk_size,
        chunk_count,
        "Computing SHA-256 digest"
    );

    let mut hasher = Sha256::new();

    if total <= chunk_size {
        guard.check_cancel(0)?;
        reporter.emit(Progress::new(SINGLE_READ_STARTED));
        let data = read_exact_range(source, 0, total).await?;
        guard.check_deadline()?;
        reporter.emit(Progress::new(READ_COMPLETE));
        hasher.update(&data);
    } else {
        let mut loaded = 0u64;
        for index in 0..chunk_count {
            guard.check_cancel(loaded)?;

            let start = index * chunk_size;
            let end = (start + chunk_size).min(total);
            let slice = read_exact_range(source, start, end).await?;
            hasher.update(&slice);
            loaded += slice.len() as u64;

            tracing::debug!(
                chunk_index = index,
                chunk_size = slice.len(),
                loaded,
                "Hashed slice"
            );

            guard.check_deadline()?;
            reporter.emit(Progress::reading(loaded, total));
        }
        reporter.emit(Progress::new(DIGEST_STARTED));
    }

    let digest: [u8; 32] = hasher.finalize().into();
    let digest = DigestHex::from_bytes(&digest);
    reporter.emit(Progress::new(COMPLETE));

    tracing::info!(file_size = total, digest = %digest, "Digest computed");

    Ok(digest)
}

/// Digest an in-memory buffer in one step
pub fn digest_bytes(data: &[u8]) -> DigestHex {
    let digest: [u8; 32] = Sha256::digest(data).into();
    DigestHex::from_bytes(&digest)
}

// ============================================================================
// Tests
// ============================================================================
