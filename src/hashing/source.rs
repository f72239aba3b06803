//! Byte sources
//!
//! The engine reads its input through [`ByteSource`]: a sliceable byte
//! sequence of known length. A file handle or an in-memory buffer both fit.

use std::io::{self, SeekFrom};
use std::path::{Path, PathBuf};

use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio::sync::Mutex;

// ============================================================================
// Byte Source Trait
// ============================================================================

/// A randomly sliceable byte sequence with a known total length
#[async_trait::async_trait]
pub trait ByteSource: Send + Sync {
    /// Total length in bytes
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Materialize the byte range `[start, end)`
    ///
    /// Implementations return exactly `end - start` bytes or an error.
    async fn read_range(&self, start: u64, end: u64) -> io::Result<Vec<u8>>;
}

fn check_range(start: u64, end: u64, len: u64) -> io::Result<()> {
    if start > end || end > len {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("range {}..{} outside source of {} bytes", start, end, len),
        ));
    }
    Ok(())
}

// ============================================================================
// In-Memory Source
// ============================================================================

/// Owned in-memory bytes
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    data: Vec<u8>,
}

impl MemorySource {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }
}

#[async_trait::async_trait]
impl ByteSource for MemorySource {
    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    async fn read_range(&self, start: u64, end: u64) -> io::Result<Vec<u8>> {
        check_range(start, end, self.len())?;
        Ok(self.data[start as usize..end as usize].to_vec())
    }
}

// ============================================================================
// File Source
// ============================================================================

/// A file on disk, read with seek + exact reads
///
/// The length is captured when the file is opened. If the file shrinks
/// afterwards, reads past the new end fail with `UnexpectedEof`.
pub struct FileSource {
    path: PathBuf,
    len: u64,
    file: Mutex<tokio::fs::File>,
}

impl FileSource {
    /// Open a file and record its current length
    pub async fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = tokio::fs::File::open(&path).await?;
        let len = file.metadata().await?.len();

        tracing::debug!(path = %path.display(), file_size = len, "Opened file source");

        Ok(Self {
            path,
            len,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Final path component, used as the filename in verification links
    pub fn file_name(&self) -> Option<String> {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
    }
}

#[async_trait::async_trait]
impl ByteSource for FileSource {
    fn len(&self) -> u64 {
        self.len
    }

    async fn read_range(&self, start: u64, end: u64) -> io::Result<Vec<u8>> {
        check_range(start, end, self.len)?;

        let mut buf = vec![0u8; (end - start) as usize];
        let mut file = self.file.lock().await;
        file.seek(SeekFrom::Start(start)).await?;
        file.read_exact(&mut buf).await?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_memory_source_ranges() {
        let source = MemorySource::new(b"Hello, World!".to_vec());
        assert_eq!(source.len(), 13);
        assert_eq!(source.read_range(0, 5).await.unwrap(), b"Hello");
        assert_eq!(source.read_range(7, 13).await.unwrap(), b"World!");
        assert!(source.read_range(5, 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_memory_source_rejects_out_of_bounds() {
        let source = MemorySource::new(vec![1, 2, 3]);
        let err = source.read_range(2, 4).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(source.read_range(3, 2).await.is_err());
    }

    #[tokio::test]
    async fn test_file_source_reads_slices() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("report.pdf");
        tokio::fs::write(&path, b"0123456789").await.unwrap();

        let source = FileSource::open(&path).await.unwrap();
        assert_eq!(source.len(), 10);
        assert_eq!(source.file_name().as_deref(), Some("report.pdf"));
        assert_eq!(source.read_range(6, 10).await.unwrap(), b"6789");
        assert_eq!(source.read_range(0, 3).await.unwrap(), b"012");
    }

    #[tokio::test]
    async fn test_file_source_truncated_after_open() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("shrinking.bin");
        tokio::fs::write(&path, vec![7u8; 64]).await.unwrap();

        let source = FileSource::open(&path).await.unwrap();
        tokio::fs::write(&path, vec![7u8; 8]).await.unwrap();

        let err = source.read_range(0, 64).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
