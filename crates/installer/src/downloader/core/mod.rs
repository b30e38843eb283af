//! Core types used throughout the installer
//!
//! This module contains the fundamental types that all other modules depend on.

pub mod error;
pub mod files;
pub mod http;
pub mod metrics;
pub mod progress;

pub use error::{FileOperation, InstallError, Result, ValidationError};
pub use http::{FetchError, HttpClient};
pub use metrics::{DownloadMetrics, DownloadMetricsSnapshot};
pub use progress::{
    BatchProgress, CompositeProgressReporter, ConsoleProgressReporter, IntoProgressCallback,
    NullProgressReporter, ProgressCallback, ProgressEvent, ProgressReporter,
};

use std::path::PathBuf;

use crate::media::{MediaDescriptor, MediaKind, Side};

/// A media item paired with everything preparation derived for it
///
/// The descriptor itself is left untouched; the download phase only reads
/// the derived fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedItem {
    pub descriptor: MediaDescriptor,
    pub kind: MediaKind,
    pub url: String,
    pub local_path: PathBuf,
    /// Probed size in bytes; 0 when the probe failed or reported nothing
    pub size: u64,
}

impl PreparedItem {
    /// Decoded filename, as shown to the user
    pub fn file_name(&self) -> String {
        self.descriptor.file_name()
    }

    pub fn applies_to(&self, side: Side) -> bool {
        self.descriptor.applies_to(side)
    }
}

/// Final state of one file in the download pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// The file was streamed to disk
    Downloaded { size: u64 },
    /// The file already existed; nothing was fetched
    AlreadyInstalled { size: u64 },
    /// The file was abandoned
    Failed { reason: String },
}
