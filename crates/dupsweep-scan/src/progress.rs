//! Scan progress reporting.

use std::path::PathBuf;
use std::time::Duration;

/// Progress information during a scan.
#[derive(Debug, Clone)]
pub struct ScanProgress {
    /// Number of matching files found so far.
    pub files_found: u64,
    /// Total bytes of matching files found so far.
    pub bytes_found: u64,
    /// Entry most recently visited.
    pub current_path: PathBuf,
    /// Time elapsed since the scan started.
    pub elapsed: Duration,
    /// Whether this is the final update of the scan.
    pub finished: bool,
}

impl ScanProgress {
    /// Create initial progress state.
    pub fn new() -> Self {
        Self {
            files_found: 0,
            bytes_found: 0,
            current_path: PathBuf::new(),
            elapsed: Duration::ZERO,
            finished: false,
        }
    }

    /// Calculate scan rate in files per second.
    pub fn files_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.files_found as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }
}

impl Default for ScanProgress {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_per_second() {
        let mut progress = ScanProgress::new();
        assert_eq!(progress.files_per_second(), 0.0);

        progress.files_found = 100;
        progress.elapsed = Duration::from_secs(4);
        assert_eq!(progress.files_per_second(), 25.0);
    }
}
