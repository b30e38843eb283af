//! Modpack Installer Library
//!
//! This library installs the mods, resource packs and shader packs that a
//! modpack manifest lists into a Minecraft directory, for either the client
//! or the server side. Installs are incremental: files already present are
//! skipped, so re-running an install only fetches what is missing.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use modpack_installer::{
//!     load_manifest, InstallConfig, Installer, ProgressEvent, Side,
//! };
//! use std::sync::Arc;
//!
//! # async fn example() -> modpack_installer::Result<()> {
//! // Load and validate the manifest
//! let manifest = load_manifest("modpack.json").await?;
//!
//! // Install client-side media into the current directory
//! let installer = Installer::new(InstallConfig::new(".", Side::Client))?;
//!
//! // Set up progress callback (optional)
//! let progress_callback = Arc::new(|event: ProgressEvent| {
//!     match event {
//!         ProgressEvent::Warning { message, .. } => {
//!             eprintln!("! WARNING: {}", message);
//!         }
//!         ProgressEvent::ChunkWritten { progress, .. } => {
//!             println!("{}/{} bytes", progress.downloaded, progress.total);
//!         }
//!         _ => {}
//!     }
//! });
//!
//! // Resolve and size everything, then download what is missing
//! let preparation = installer.prepare(&manifest, Some(progress_callback.clone())).await?;
//! println!("{} files, {} bytes", preparation.applicable(), preparation.total_size);
//!
//! let summary = installer.download(&preparation, Some(progress_callback)).await?;
//! if let Some(line) = summary.skipped_line() {
//!     println!("{}", line);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Manifest validation**: every problem is reported before any network activity
//! - **Providers**: CurseForge, Modrinth, Planet Minecraft and direct URLs
//! - **Side filtering**: client-only and server-only media are left out of the other side's install
//! - **Size probing**: total download size is known before anything is fetched
//! - **User agent fallback**: one retry with a browser user agent on HTTP errors
//! - **Progress tracking**: events for listing, warnings and every written chunk

pub mod downloader;
pub mod manifest;
pub mod media;

// Re-export commonly used types for convenience
pub use downloader::{
    BatchProgress, CompositeProgressReporter, ConsoleProgressReporter, FileOperation, FileOutcome,
    InstallConfig, InstallError, InstallSummary, Installer, IntoProgressCallback,
    NullProgressReporter, Preparation, PreparedItem, ProbeOutcome, ProgressCallback,
    ProgressEvent, ProgressReporter, Result, SkipReason, ValidationError,
};
pub use downloader::core::progress::format_size;
pub use manifest::{load_manifest, parse_manifest, validate_manifest, Manifest, MinecraftInfo};
pub use media::{resolve, MediaDescriptor, MediaKind, ProviderKind, Side};
