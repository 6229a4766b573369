//! Streaming BLAKE3 content hashing.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use blake3::Hasher;

use dupsweep_core::{ContentHash, ContentKey, HashError};

/// Default read buffer for streaming hashes.
pub const DEFAULT_HASH_BUFFER: usize = 64 * 1024;

/// Computes whole-file content keys by streaming through BLAKE3.
///
/// Files are read in fixed-size chunks so memory use does not grow with
/// file size.
#[derive(Debug, Clone, Copy)]
pub struct ContentHasher {
    buffer_size: usize,
}

impl ContentHasher {
    /// Create a hasher with the default buffer size.
    pub fn new() -> Self {
        Self {
            buffer_size: DEFAULT_HASH_BUFFER,
        }
    }

    /// Create a hasher that reads `buffer_size` bytes at a time.
    pub fn with_buffer_size(buffer_size: usize) -> Self {
        Self {
            buffer_size: buffer_size.max(1),
        }
    }

    /// Read buffer size in bytes.
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Hash a file, returning its digest paired with the number of bytes read.
    ///
    /// Zero-length files fail with [`HashError::Empty`].
    pub fn hash_file(&self, path: &Path) -> Result<ContentKey, HashError> {
        let io_err = |source| HashError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut file = File::open(path).map_err(io_err)?;
        let mut hasher = Hasher::new();
        let mut buffer = vec![0u8; self.buffer_size];
        let mut size: u64 = 0;

        loop {
            let bytes_read = match file.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(io_err(e)),
            };
            hasher.update(&buffer[..bytes_read]);
            size += bytes_read as u64;
        }

        if size == 0 {
            return Err(HashError::Empty {
                path: path.to_path_buf(),
            });
        }

        Ok(ContentKey::new(
            ContentHash::new(*hasher.finalize().as_bytes()),
            size,
        ))
    }
}

impl Default for ContentHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_equal_content_equal_key() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a"), "hello").unwrap();
        fs::write(temp.path().join("b"), "hello").unwrap();
        fs::write(temp.path().join("c"), "world").unwrap();

        let hasher = ContentHasher::new();
        let a = hasher.hash_file(&temp.path().join("a")).unwrap();
        let b = hasher.hash_file(&temp.path().join("b")).unwrap();
        let c = hasher.hash_file(&temp.path().join("c")).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.size, 5);
    }

    #[test]
    fn test_matches_one_shot_blake3() {
        let temp = TempDir::new().unwrap();
        let data: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        let path = temp.path().join("big.bin");
        fs::write(&path, &data).unwrap();

        // A tiny buffer forces many chunks through the streaming path.
        let key = ContentHasher::with_buffer_size(1000).hash_file(&path).unwrap();

        assert_eq!(key.hash.0, *blake3::hash(&data).as_bytes());
        assert_eq!(key.size, data.len() as u64);
    }

    #[test]
    fn test_empty_file_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty");
        fs::write(&path, "").unwrap();

        let err = ContentHasher::new().hash_file(&path).unwrap_err();
        assert!(matches!(err, HashError::Empty { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp = TempDir::new().unwrap();
        let err = ContentHasher::new()
            .hash_file(&temp.path().join("missing"))
            .unwrap_err();
        assert!(matches!(err, HashError::Io { .. }));
        assert!(err.path().ends_with("missing"));
    }
}
