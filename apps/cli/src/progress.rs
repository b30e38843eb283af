//! Terminal progress bar for the download phase

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use modpack_installer::{format_size, BatchProgress, ProgressReporter};

/// Byte progress bar over the whole batch
///
/// Skipped files advance the bar by their recorded size, so a fully
/// installed pack jumps straight to 100%.
pub struct BarReporter {
    bar: ProgressBar,
    verbose: bool,
}

impl BarReporter {
    pub fn new(verbose: bool) -> Result<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{percent:>3}%|{wide_bar}| {bytes}/{total_bytes} {msg}")?
                .progress_chars("██░"),
        );
        Ok(Self { bar, verbose })
    }
}

impl ProgressReporter for BarReporter {
    fn on_batch_started(&self, total_size: u64, _file_count: usize) {
        self.bar.set_length(total_size);
        self.bar.set_position(0);
    }

    fn on_file_started(&self, file_name: &str, _progress: &BatchProgress) {
        self.bar.set_message(file_name.to_string());
        if self.verbose {
            self.bar.println(format!("Downloading {}...", file_name));
        }
    }

    fn on_chunk_written(&self, _bytes: u64, progress: &BatchProgress) {
        self.bar.set_position(progress.downloaded);
    }

    fn on_file_skipped(&self, file_name: &str, _size: u64, progress: &BatchProgress) {
        self.bar.set_position(progress.downloaded);
        if self.verbose {
            self.bar.println(format!("{} is already installed, skipping...", file_name));
        }
    }

    fn on_file_complete(&self, file_name: &str, size: u64, progress: &BatchProgress) {
        self.bar.set_position(progress.downloaded);
        if self.verbose {
            self.bar.println(format!("Downloaded {} ({})", file_name, format_size(size)));
        }
    }

    fn on_file_failed(&self, file_name: &str, error: &str, progress: &BatchProgress) {
        self.bar.set_position(progress.downloaded);
        if self.verbose {
            self.bar.println(format!("Could not download {}: {}", file_name, error));
        }
    }

    fn on_batch_finished(&self, _skipped: usize, _failed: usize, _applicable: usize) {
        // Unknown and unavailable sizes leave gaps; the finished bar shows full
        self.bar.set_position(self.bar.length().unwrap_or(0));
        self.bar.finish_with_message("");
    }
}
