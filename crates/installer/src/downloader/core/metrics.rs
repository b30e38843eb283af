//! Counters for a download pass

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for downloads
#[derive(Debug, Default)]
pub struct DownloadMetrics {
    pub downloaded_files: AtomicU64,
    pub downloaded_bytes: AtomicU64,
    pub skipped_files: AtomicU64,
    pub skipped_bytes: AtomicU64,
    pub failed_files: AtomicU64,
}

impl DownloadMetrics {
    /// Record that a file was written completely
    pub fn record_download_completed(&self, size: u64) {
        self.downloaded_files.fetch_add(1, Ordering::Relaxed);
        self.downloaded_bytes.fetch_add(size, Ordering::Relaxed);
    }

    /// Record a file that was already installed
    pub fn record_skipped(&self, recorded_size: u64) {
        self.skipped_files.fetch_add(1, Ordering::Relaxed);
        self.skipped_bytes.fetch_add(recorded_size, Ordering::Relaxed);
    }

    /// Record a file that was abandoned
    pub fn record_download_failed(&self) {
        self.failed_files.fetch_add(1, Ordering::Relaxed);
    }

    pub fn skipped(&self) -> u64 {
        self.skipped_files.load(Ordering::Relaxed)
    }

    /// Get a snapshot of current metrics
    pub fn snapshot(&self) -> DownloadMetricsSnapshot {
        DownloadMetricsSnapshot {
            downloaded_files: self.downloaded_files.load(Ordering::Relaxed),
            downloaded_bytes: self.downloaded_bytes.load(Ordering::Relaxed),
            skipped_files: self.skipped_files.load(Ordering::Relaxed),
            skipped_bytes: self.skipped_bytes.load(Ordering::Relaxed),
            failed_files: self.failed_files.load(Ordering::Relaxed),
        }
    }
}

/// Immutable snapshot of download metrics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadMetricsSnapshot {
    pub downloaded_files: u64,
    pub downloaded_bytes: u64,
    pub skipped_files: u64,
    pub skipped_bytes: u64,
    pub failed_files: u64,
}

impl DownloadMetricsSnapshot {
    /// Files that were handled one way or another
    pub fn processed_files(&self) -> u64 {
        self.downloaded_files + self.skipped_files + self.failed_files
    }

    /// Bytes the progress bar advanced by: written plus skipped
    pub fn progressed_bytes(&self) -> u64 {
        self.downloaded_bytes + self.skipped_bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_snapshot() {
        let metrics = DownloadMetrics::default();
        metrics.record_download_completed(100);
        metrics.record_skipped(200);
        metrics.record_skipped(0);
        metrics.record_download_failed();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.downloaded_files, 1);
        assert_eq!(snapshot.skipped_files, 2);
        assert_eq!(snapshot.failed_files, 1);
        assert_eq!(snapshot.processed_files(), 4);
        assert_eq!(snapshot.progressed_bytes(), 300);
        assert_eq!(metrics.skipped(), 2);
    }
}
