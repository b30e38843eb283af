//! Download phase
//!
//! Walks the prepared items in order and brings each one to a final
//! [`FileOutcome`]. Per-item network failures never abort the batch; file
//! system failures do.

use futures::StreamExt;
use reqwest::Response;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::downloader::config::InstallConfig;
use crate::downloader::core::files::{atomic_rename, create_temp_path, discard_temp, ensure_dir, is_installed};
use crate::downloader::core::progress::skipped_summary;
use crate::downloader::core::{
    BatchProgress, DownloadMetrics, DownloadMetricsSnapshot, FileOperation, FileOutcome,
    HttpClient, InstallError, PreparedItem, ProgressCallback, ProgressEvent, Result,
};
use crate::downloader::prepare::Preparation;

/// Result of a download pass
#[derive(Debug, Clone)]
pub struct InstallSummary {
    /// Decoded filename and outcome of every side-applicable file, in order
    pub outcomes: Vec<(String, FileOutcome)>,
    pub metrics: DownloadMetricsSnapshot,
    /// Number of side-applicable files
    pub applicable: usize,
    pub duration: Duration,
}

impl InstallSummary {
    /// Files skipped because they were already installed
    pub fn skipped(&self) -> usize {
        self.metrics.skipped_files as usize
    }

    /// Files abandoned after a network failure
    pub fn failed(&self) -> usize {
        self.metrics.failed_files as usize
    }

    /// `Skipped X/Y files that were already installed`, when anything was skipped
    pub fn skipped_line(&self) -> Option<String> {
        skipped_summary(self.skipped(), self.applicable)
    }
}

enum StreamError {
    /// The connection broke mid-body; the file is abandoned
    Transport(reqwest::Error),
    /// Writing to disk failed; the install stops
    Io(InstallError),
}

/// Download every prepared item that is not installed yet
pub async fn download_all(
    client: &HttpClient,
    config: &InstallConfig,
    preparation: &Preparation,
    progress_callback: Option<&ProgressCallback>,
) -> Result<InstallSummary> {
    let start_time = Instant::now();
    let side = config.side();

    for kind in &preparation.kinds {
        ensure_dir(&config.install_path().join(kind.dir_name())).await?;
    }

    let applicable = preparation.items.iter().filter(|item| item.applies_to(side)).count();

    if let Some(callback) = progress_callback {
        callback(ProgressEvent::BatchStarted {
            total_size: preparation.total_size,
            file_count: applicable,
        });
    }

    let metrics = DownloadMetrics::default();
    let mut progress = BatchProgress {
        total: preparation.total_size,
        ..BatchProgress::default()
    };
    let mut outcomes = Vec::with_capacity(applicable);

    for item in &preparation.items {
        // Its bytes were never counted, so the bar is left alone
        if !item.applies_to(side) {
            continue;
        }

        let outcome = download_item(client, config, item, &mut progress, progress_callback).await?;
        match &outcome {
            FileOutcome::Downloaded { size } => metrics.record_download_completed(*size),
            FileOutcome::AlreadyInstalled { size } => metrics.record_skipped(*size),
            FileOutcome::Failed { .. } => metrics.record_download_failed(),
        }
        outcomes.push((item.file_name(), outcome));
    }

    let metrics = metrics.snapshot();
    info!(
        "Download pass finished: {} downloaded, {} skipped, {} failed of {}",
        metrics.downloaded_files, metrics.skipped_files, metrics.failed_files, applicable
    );

    if let Some(callback) = progress_callback {
        callback(ProgressEvent::BatchFinished {
            skipped: metrics.skipped_files as usize,
            failed: metrics.failed_files as usize,
            applicable,
        });
    }

    Ok(InstallSummary {
        outcomes,
        metrics,
        applicable,
        duration: start_time.elapsed(),
    })
}

/// Bring one item to its final state
pub async fn download_item(
    client: &HttpClient,
    config: &InstallConfig,
    item: &PreparedItem,
    progress: &mut BatchProgress,
    progress_callback: Option<&ProgressCallback>,
) -> Result<FileOutcome> {
    let file_name = item.file_name();
    progress.current_file = file_name.clone();

    if is_installed(&item.local_path).await {
        progress.skipped += 1;
        progress.downloaded += item.size;
        debug!("{} is already installed, skipping", item.local_path.display());

        if let Some(callback) = progress_callback {
            callback(ProgressEvent::FileSkipped {
                file_name,
                size: item.size,
                progress: progress.clone(),
            });
        }
        return Ok(FileOutcome::AlreadyInstalled { size: item.size });
    }

    if let Some(callback) = progress_callback {
        callback(ProgressEvent::FileStarted {
            file_name: file_name.clone(),
            progress: progress.clone(),
        });
    }

    // Failures here were already warned about during preparation
    let response = match client.get(&item.url).await {
        Ok(response) => response,
        Err(error) => {
            debug!("Abandoning {}: {}", file_name, error);
            return Ok(report_failure(file_name, error.to_string(), progress, progress_callback));
        }
    };

    match stream_to_file(response, &item.local_path, config.chunk_size, progress, progress_callback).await {
        Ok(size) => {
            debug!("Downloaded {} ({} bytes)", item.local_path.display(), size);
            if let Some(callback) = progress_callback {
                callback(ProgressEvent::FileComplete {
                    file_name,
                    size,
                    progress: progress.clone(),
                });
            }
            Ok(FileOutcome::Downloaded { size })
        }
        Err(StreamError::Transport(error)) => {
            debug!("Connection lost while downloading {}: {}", file_name, error);
            Ok(report_failure(file_name, error.to_string(), progress, progress_callback))
        }
        Err(StreamError::Io(error)) => Err(error),
    }
}

fn report_failure(
    file_name: String,
    reason: String,
    progress: &BatchProgress,
    progress_callback: Option<&ProgressCallback>,
) -> FileOutcome {
    if let Some(callback) = progress_callback {
        callback(ProgressEvent::FileFailed {
            file_name,
            error: reason.clone(),
            progress: progress.clone(),
        });
    }
    FileOutcome::Failed { reason }
}

/// Stream a response body to `dest_path` in `chunk_size` writes
///
/// The body goes to a temporary file first, so an abandoned download never
/// leaves a file that a later run would take for an installed one. The
/// temporary file is removed on every failure path.
async fn stream_to_file(
    response: Response,
    dest_path: &Path,
    chunk_size: usize,
    progress: &mut BatchProgress,
    progress_callback: Option<&ProgressCallback>,
) -> std::result::Result<u64, StreamError> {
    let temp_path = create_temp_path(dest_path);

    let result = match write_temp(response, &temp_path, chunk_size, progress, progress_callback).await {
        Ok(written) => atomic_rename(&temp_path, dest_path)
            .await
            .map(|()| written)
            .map_err(StreamError::Io),
        Err(error) => Err(error),
    };

    if result.is_err() {
        discard_temp(&temp_path).await;
    }
    result
}

/// Write the whole body to `temp_path`; the file is closed on return
async fn write_temp(
    response: Response,
    temp_path: &Path,
    chunk_size: usize,
    progress: &mut BatchProgress,
    progress_callback: Option<&ProgressCallback>,
) -> std::result::Result<u64, StreamError> {
    let io_error = |operation: FileOperation, source: std::io::Error| {
        StreamError::Io(InstallError::FileSystem {
            path: temp_path.to_path_buf(),
            operation,
            source,
        })
    };

    let mut file = fs::File::create(temp_path)
        .await
        .map_err(|e| io_error(FileOperation::Create, e))?;

    let mut stream = response.bytes_stream();
    let mut written = 0u64;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(StreamError::Transport)?;

        for piece in chunk.chunks(chunk_size) {
            file.write_all(piece)
                .await
                .map_err(|e| io_error(FileOperation::Write, e))?;

            let bytes = piece.len() as u64;
            written += bytes;
            progress.downloaded += bytes;

            if let Some(callback) = progress_callback {
                callback(ProgressEvent::ChunkWritten {
                    bytes,
                    progress: progress.clone(),
                });
            }
        }
    }

    file.flush()
        .await
        .map_err(|e| io_error(FileOperation::Write, e))?;

    Ok(written)
}
