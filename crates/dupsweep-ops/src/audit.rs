//! Append-only audit trail of removed files.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use compact_str::CompactString;
use tracing::info;

use dupsweep_core::DeletionRecord;

/// Ordered record of every successful removal.
///
/// Records are appended under a lock and stamped while it is held, so the
/// log is totally ordered by completion time even when several batches run
/// at once. Entries are never edited; the log can only be cleared as a whole.
#[derive(Debug, Default)]
pub struct DeletionAuditLog {
    records: Mutex<Vec<DeletionRecord>>,
}

impl DeletionAuditLog {
    /// Create an empty audit log.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<DeletionRecord>> {
        // Recover from poisoning; a push never leaves a partial record.
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stamp and append a record for `path`, returning a copy of it.
    pub fn record(&self, path: impl Into<PathBuf>, method: impl Into<CompactString>) -> DeletionRecord {
        let mut records = self.lock();
        let record = DeletionRecord::now(path, method);
        records.push(record.clone());
        record
    }

    /// Append a pre-built record.
    pub fn append(&self, record: DeletionRecord) {
        self.lock().push(record);
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Wipe every record. This cannot be undone.
    pub fn clear(&self) {
        let mut records = self.lock();
        info!(records = records.len(), "clearing audit log");
        records.clear();
    }

    /// Copy of all records, oldest first.
    pub fn snapshot(&self) -> Vec<DeletionRecord> {
        self.lock().clone()
    }

    /// Render the log as text: one `timestamp\tpath\tmethod` line per record.
    pub fn export(&self) -> String {
        self.lock()
            .iter()
            .map(|record| record.to_line() + "\n")
            .collect()
    }

    /// Write the exported text to any writer.
    pub fn export_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        let records = self.snapshot();
        for record in &records {
            writeln!(writer, "{}", record.to_line())?;
        }
        writer.flush()
    }

    /// Write the exported text to a file chosen by the caller.
    pub fn export_to_path(&self, path: &Path) -> io::Result<()> {
        let file = File::create(path)?;
        self.export_to(BufWriter::new(file))?;
        info!(path = %path.display(), "exported audit log");
        Ok(())
    }
}
