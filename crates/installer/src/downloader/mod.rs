//! Downloader module
//!
//! This module contains the preparation and download phases together with
//! the core types, configuration and HTTP plumbing they share.

pub mod batch;
pub mod config;
pub mod core;
pub mod lib;
pub mod prepare;
pub mod probe;

// Re-export main types for convenience
pub use batch::InstallSummary;
pub use config::{InstallConfig, InstallContext, BROWSER_USER_AGENT};
pub use self::core::{
    BatchProgress, CompositeProgressReporter, ConsoleProgressReporter, DownloadMetrics,
    DownloadMetricsSnapshot, FileOperation, FileOutcome, InstallError, IntoProgressCallback,
    NullProgressReporter, PreparedItem, ProgressCallback, ProgressEvent, ProgressReporter, Result,
    ValidationError,
};
pub use lib::Installer;
pub use prepare::Preparation;
pub use probe::{probe_size, ProbeOutcome, SkipReason};
