//! Progress tracking and reporting for install operations

use std::sync::Arc;

use crate::media::MediaKind;

/// Progress callback for install operations
pub type ProgressCallback = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Snapshot of the batch as seen by a progress bar
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchProgress {
    /// Decoded filename of the item being processed
    pub current_file: String,
    /// Bytes counted so far, including the recorded size of skipped files
    pub downloaded: u64,
    /// Prepared size of the whole batch
    pub total: u64,
    /// Files skipped because they were already installed
    pub skipped: usize,
}

/// Events emitted while preparing and downloading
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// A non-empty media list is about to be listed
    ListingStarted {
        kind: MediaKind,
    },
    /// An item was prepared for download
    MediaListed {
        kind: MediaKind,
        slug: String,
        file_name: String,
        size: u64,
    },
    /// An item could not be probed; it stays scheduled with size 0
    Warning {
        name: String,
        message: String,
    },
    BatchStarted {
        total_size: u64,
        file_count: usize,
    },
    FileStarted {
        file_name: String,
        progress: BatchProgress,
    },
    ChunkWritten {
        bytes: u64,
        progress: BatchProgress,
    },
    /// The file already exists on disk; its recorded size counts as done
    FileSkipped {
        file_name: String,
        size: u64,
        progress: BatchProgress,
    },
    FileComplete {
        file_name: String,
        size: u64,
        progress: BatchProgress,
    },
    /// The file was abandoned. Preparation already warned about it.
    FileFailed {
        file_name: String,
        error: String,
        progress: BatchProgress,
    },
    BatchFinished {
        skipped: usize,
        failed: usize,
        applicable: usize,
    },
}

/// Trait for progress reporting with more granular control
pub trait ProgressReporter: Send + Sync {
    fn on_listing_started(&self, _kind: MediaKind) {}
    fn on_media_listed(&self, _kind: MediaKind, _slug: &str, _file_name: &str, _size: u64) {}
    fn on_warning(&self, _name: &str, _message: &str) {}
    fn on_batch_started(&self, _total_size: u64, _file_count: usize) {}
    fn on_file_started(&self, _file_name: &str, _progress: &BatchProgress) {}
    fn on_chunk_written(&self, _bytes: u64, _progress: &BatchProgress) {}
    fn on_file_skipped(&self, _file_name: &str, _size: u64, _progress: &BatchProgress) {}
    fn on_file_complete(&self, _file_name: &str, _size: u64, _progress: &BatchProgress) {}
    fn on_file_failed(&self, _file_name: &str, _error: &str, _progress: &BatchProgress) {}
    fn on_batch_finished(&self, _skipped: usize, _failed: usize, _applicable: usize) {}
}

/// Extension trait to convert ProgressReporter to ProgressCallback
pub trait IntoProgressCallback {
    fn into_callback(self) -> ProgressCallback;
}

impl<T: ProgressReporter + 'static> IntoProgressCallback for T {
    fn into_callback(self) -> ProgressCallback {
        Arc::new(move |event| match event {
            ProgressEvent::ListingStarted { kind } => {
                self.on_listing_started(kind);
            }
            ProgressEvent::MediaListed { kind, slug, file_name, size } => {
                self.on_media_listed(kind, &slug, &file_name, size);
            }
            ProgressEvent::Warning { name, message } => {
                self.on_warning(&name, &message);
            }
            ProgressEvent::BatchStarted { total_size, file_count } => {
                self.on_batch_started(total_size, file_count);
            }
            ProgressEvent::FileStarted { file_name, progress } => {
                self.on_file_started(&file_name, &progress);
            }
            ProgressEvent::ChunkWritten { bytes, progress } => {
                self.on_chunk_written(bytes, &progress);
            }
            ProgressEvent::FileSkipped { file_name, size, progress } => {
                self.on_file_skipped(&file_name, size, &progress);
            }
            ProgressEvent::FileComplete { file_name, size, progress } => {
                self.on_file_complete(&file_name, size, &progress);
            }
            ProgressEvent::FileFailed { file_name, error, progress } => {
                self.on_file_failed(&file_name, &error, &progress);
            }
            ProgressEvent::BatchFinished { skipped, failed, applicable } => {
                self.on_batch_finished(skipped, failed, applicable);
            }
        })
    }
}

/// Console reporter printing the listing, warnings and final summary
///
/// Byte-level progress is left to a progress bar; with `verbose` set each
/// file start and finish is printed as well.
#[derive(Debug, Default)]
pub struct ConsoleProgressReporter {
    pub verbose: bool,
}

impl ConsoleProgressReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl ProgressReporter for ConsoleProgressReporter {
    fn on_listing_started(&self, kind: MediaKind) {
        println!("\n{}: ", kind.title());
    }

    fn on_media_listed(&self, _kind: MediaKind, slug: &str, file_name: &str, _size: u64) {
        println!("  {} ({})", slug, file_name);
    }

    fn on_warning(&self, _name: &str, message: &str) {
        println!("! WARNING: {}", message);
    }

    fn on_file_started(&self, file_name: &str, _progress: &BatchProgress) {
        if self.verbose {
            println!("Downloading {}...", file_name);
        }
    }

    fn on_file_skipped(&self, file_name: &str, _size: u64, _progress: &BatchProgress) {
        if self.verbose {
            println!("{} is already installed, skipping...", file_name);
        }
    }

    fn on_file_complete(&self, file_name: &str, size: u64, _progress: &BatchProgress) {
        if self.verbose {
            println!("Downloaded {} ({})", file_name, format_size(size));
        }
    }

    fn on_batch_finished(&self, skipped: usize, failed: usize, applicable: usize) {
        if let Some(line) = skipped_summary(skipped, applicable) {
            println!("{}", line);
        }
        if let Some(line) = failed_summary(failed) {
            println!("{}", line);
        }
    }
}

/// Null progress reporter that does nothing
#[derive(Debug, Default)]
pub struct NullProgressReporter;

impl ProgressReporter for NullProgressReporter {}

/// Composite progress reporter that forwards events to multiple reporters
pub struct CompositeProgressReporter {
    reporters: Vec<Box<dyn ProgressReporter>>,
}

impl std::fmt::Debug for CompositeProgressReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeProgressReporter")
            .field("reporters_count", &self.reporters.len())
            .finish()
    }
}

impl CompositeProgressReporter {
    pub fn new() -> Self {
        Self {
            reporters: Vec::new(),
        }
    }

    pub fn add_reporter<R: ProgressReporter + 'static>(mut self, reporter: R) -> Self {
        self.reporters.push(Box::new(reporter));
        self
    }
}

impl Default for CompositeProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for CompositeProgressReporter {
    fn on_listing_started(&self, kind: MediaKind) {
        for reporter in &self.reporters {
            reporter.on_listing_started(kind);
        }
    }

    fn on_media_listed(&self, kind: MediaKind, slug: &str, file_name: &str, size: u64) {
        for reporter in &self.reporters {
            reporter.on_media_listed(kind, slug, file_name, size);
        }
    }

    fn on_warning(&self, name: &str, message: &str) {
        for reporter in &self.reporters {
            reporter.on_warning(name, message);
        }
    }

    fn on_batch_started(&self, total_size: u64, file_count: usize) {
        for reporter in &self.reporters {
            reporter.on_batch_started(total_size, file_count);
        }
    }

    fn on_file_started(&self, file_name: &str, progress: &BatchProgress) {
        for reporter in &self.reporters {
            reporter.on_file_started(file_name, progress);
        }
    }

    fn on_chunk_written(&self, bytes: u64, progress: &BatchProgress) {
        for reporter in &self.reporters {
            reporter.on_chunk_written(bytes, progress);
        }
    }

    fn on_file_skipped(&self, file_name: &str, size: u64, progress: &BatchProgress) {
        for reporter in &self.reporters {
            reporter.on_file_skipped(file_name, size, progress);
        }
    }

    fn on_file_complete(&self, file_name: &str, size: u64, progress: &BatchProgress) {
        for reporter in &self.reporters {
            reporter.on_file_complete(file_name, size, progress);
        }
    }

    fn on_file_failed(&self, file_name: &str, error: &str, progress: &BatchProgress) {
        for reporter in &self.reporters {
            reporter.on_file_failed(file_name, error, progress);
        }
    }

    fn on_batch_finished(&self, skipped: usize, failed: usize, applicable: usize) {
        for reporter in &self.reporters {
            reporter.on_batch_finished(skipped, failed, applicable);
        }
    }
}

/// `Skipped X/Y files that were already installed`, only when X > 0
pub fn skipped_summary(skipped: usize, applicable: usize) -> Option<String> {
    (skipped > 0).then(|| format!("Skipped {}/{} files that were already installed", skipped, applicable))
}

/// `Failed to download N files`, only when N > 0
pub fn failed_summary(failed: usize) -> Option<String> {
    (failed > 0).then(|| format!("Failed to download {} files", failed))
}

/// Human-readable size in binary units, e.g. `1.5 MiB`
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["KiB", "MiB", "GiB", "TiB", "PiB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{:.1} {}", value, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl ProgressReporter for Recorder {
        fn on_listing_started(&self, kind: MediaKind) {
            self.calls.lock().unwrap().push(format!("listing:{}", kind));
        }

        fn on_file_skipped(&self, file_name: &str, size: u64, progress: &BatchProgress) {
            self.calls
                .lock()
                .unwrap()
                .push(format!("skip:{}:{}:{}", file_name, size, progress.skipped));
        }
    }

    #[test]
    fn test_reporter_into_callback() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let callback = Recorder { calls: calls.clone() }.into_callback();

        callback(ProgressEvent::ListingStarted { kind: MediaKind::ShaderPack });
        callback(ProgressEvent::FileSkipped {
            file_name: "bsl.zip".to_string(),
            size: 42,
            progress: BatchProgress {
                current_file: "bsl.zip".to_string(),
                downloaded: 42,
                total: 42,
                skipped: 1,
            },
        });
        callback(ProgressEvent::BatchFinished { skipped: 1, failed: 0, applicable: 1 });

        let calls = calls.lock().unwrap();
        assert_eq!(*calls, vec!["listing:shaderpacks".to_string(), "skip:bsl.zip:42:1".to_string()]);
    }

    #[test]
    fn test_composite_forwards_to_all() {
        let first = Arc::new(Mutex::new(Vec::new()));
        let second = Arc::new(Mutex::new(Vec::new()));

        let composite = CompositeProgressReporter::new()
            .add_reporter(Recorder { calls: first.clone() })
            .add_reporter(NullProgressReporter)
            .add_reporter(Recorder { calls: second.clone() });

        composite.on_listing_started(MediaKind::Mod);

        assert_eq!(first.lock().unwrap().len(), 1);
        assert_eq!(second.lock().unwrap().len(), 1);
        assert!(format!("{:?}", composite).contains("reporters_count: 3"));
    }

    #[test]
    fn test_summary_lines() {
        assert_eq!(skipped_summary(0, 4), None);
        assert_eq!(
            skipped_summary(2, 4).as_deref(),
            Some("Skipped 2/4 files that were already installed")
        );
        assert_eq!(failed_summary(0), None);
        assert_eq!(failed_summary(3).as_deref(), Some("Failed to download 3 files"));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1024), "1.0 KiB");
        assert_eq!(format_size(1536 * 1024), "1.5 MiB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.0 GiB");
    }
}
