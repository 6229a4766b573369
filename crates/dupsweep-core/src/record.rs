//! Records produced by scans and deletions.

use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, SecondsFormat, Utc};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Field separator used when exporting the audit trail.
///
/// Tabs, newlines and carriage returns inside a field are written as the
/// two-character escapes `\t`, `\n` and `\r`, so every record stays on one
/// line with exactly three fields.
pub const AUDIT_FIELD_SEPARATOR: char = '\t';

/// BLAKE3 content hash for duplicate detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentHash(pub [u8; 32]);

impl ContentHash {
    /// Create a new ContentHash from raw bytes.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the hash as a hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Identity of a file's content: two files are duplicates iff their keys match.
///
/// The size is part of the key so that a digest collision between files of
/// different lengths can never merge them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentKey {
    /// Content digest.
    pub hash: ContentHash,
    /// File size in bytes.
    pub size: u64,
}

impl ContentKey {
    /// Create a new content key.
    pub fn new(hash: ContentHash, size: u64) -> Self {
        Self { hash, size }
    }
}

/// A regular file found by a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Full path to the file.
    pub path: PathBuf,
    /// Size in bytes at scan time.
    pub size: u64,
}

impl FileRecord {
    /// Create a new file record.
    pub fn new(path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }
}

/// A file in a size ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LargeFileEntry {
    /// Full path to the file.
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
}

impl LargeFileEntry {
    /// Create a new ranking entry.
    pub fn new(path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }

    /// Ranking order: largest first, path ascending on equal sizes.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .size
            .cmp(&self.size)
            .then_with(|| self.path.cmp(&other.path))
    }
}

impl From<FileRecord> for LargeFileEntry {
    fn from(record: FileRecord) -> Self {
        Self {
            path: record.path,
            size: record.size,
        }
    }
}

/// One successful removal (or rename) in the audit trail.
///
/// Records are never mutated once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionRecord {
    /// When the removal completed.
    pub timestamp: DateTime<Utc>,
    /// Path that was removed.
    pub path: PathBuf,
    /// Which feature issued the removal (e.g. `duplicates`, `large-files`).
    pub method: CompactString,
}

impl DeletionRecord {
    /// Create a record stamped with the current time.
    pub fn now(path: impl Into<PathBuf>, method: impl Into<CompactString>) -> Self {
        Self {
            timestamp: Utc::now(),
            path: path.into(),
            method: method.into(),
        }
    }

    /// Render the record as one export line, without the trailing newline.
    pub fn to_line(&self) -> String {
        format!(
            "{ts}{sep}{path}{sep}{method}",
            ts = self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            sep = AUDIT_FIELD_SEPARATOR,
            path = escape_field(&self.path.to_string_lossy()),
            method = escape_field(&self.method),
        )
    }
}

fn escape_field(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    for c in field.chars() {
        match c {
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_content_hash_hex() {
        let hash = ContentHash::new([0xab; 32]);
        assert_eq!(hash.to_hex().len(), 64);
        assert!(hash.to_hex().starts_with("abab"));
        assert_eq!(hash.to_string(), hash.to_hex());
    }

    #[test]
    fn test_content_key_includes_size() {
        let hash = ContentHash::new([1; 32]);
        assert_ne!(ContentKey::new(hash, 10), ContentKey::new(hash, 11));
        assert_eq!(ContentKey::new(hash, 10), ContentKey::new(hash, 10));
    }

    #[test]
    fn test_rank_cmp_ties_fall_back_to_path() {
        let mut entries = vec![
            LargeFileEntry::new("/b", 10),
            LargeFileEntry::new("/a", 10),
            LargeFileEntry::new("/c", 500),
        ];
        entries.sort_by(LargeFileEntry::rank_cmp);
        let paths: Vec<_> = entries.iter().map(|e| e.path.to_str().unwrap()).collect();
        assert_eq!(paths, vec!["/c", "/a", "/b"]);
    }

    #[test]
    fn test_deletion_record_line() {
        let record = DeletionRecord {
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap(),
            path: PathBuf::from("/data/a.txt"),
            method: "duplicates".into(),
        };
        assert_eq!(record.to_line(), "2024-03-01T12:30:00Z\t/data/a.txt\tduplicates");
    }

    #[test]
    fn test_deletion_record_line_escapes_separators() {
        let record = DeletionRecord {
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap(),
            path: PathBuf::from("/data/odd\tname\nwith breaks"),
            method: "manual".into(),
        };
        let line = record.to_line();

        assert!(!line.contains('\n'));
        let fields: Vec<_> = line.split(AUDIT_FIELD_SEPARATOR).collect();
        assert_eq!(fields, vec!["2024-03-01T12:30:00Z", "/data/odd\\tname\\nwith breaks", "manual"]);
    }
}
