//! Main entry point for the modpack installer
//!
//! The call chain flows as follows:
//!
//! User Code
//! ↓
//! Installer (this file)
//! ↓
//! prepare:: (resolve, probe, size) → Preparation
//! ↓
//! batch:: (skip installed, stream the rest) → InstallSummary
//! ↓
//! Core types (core/*)

use std::path::Path;
use tracing::info;

use crate::downloader::{
    batch::{self, InstallSummary},
    config::InstallConfig,
    core::{HttpClient, ProgressCallback, Result},
    prepare::{self, Preparation},
};
use crate::manifest::{load_manifest, Manifest};

/// Installs the media of a manifest into one directory, for one side
pub struct Installer {
    config: InstallConfig,
    client: HttpClient,
}

impl Installer {
    /// Create an installer, checking the configuration and building its HTTP client
    pub fn new(config: InstallConfig) -> Result<Self> {
        config.check()?;
        let client = HttpClient::from_config(&config)?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &InstallConfig {
        &self.config
    }

    /// Resolve and size every item applying to the configured side
    ///
    /// Prints nothing itself; the listing and any warnings go through
    /// `progress_callback`.
    pub async fn prepare(
        &self,
        manifest: &Manifest,
        progress_callback: Option<ProgressCallback>,
    ) -> Result<Preparation> {
        prepare::prepare(&self.client, &self.config, manifest, progress_callback.as_ref()).await
    }

    /// Download everything `preparation` lists that is not installed yet
    pub async fn download(
        &self,
        preparation: &Preparation,
        progress_callback: Option<ProgressCallback>,
    ) -> Result<InstallSummary> {
        batch::download_all(&self.client, &self.config, preparation, progress_callback.as_ref()).await
    }

    /// Prepare and download in one go, without a confirmation step
    pub async fn install(
        &self,
        manifest: &Manifest,
        progress_callback: Option<ProgressCallback>,
    ) -> Result<InstallSummary> {
        let preparation = self.prepare(manifest, progress_callback.clone()).await?;
        self.download(&preparation, progress_callback).await
    }

    /// Load a manifest file and install it
    pub async fn install_file<P: AsRef<Path>>(
        &self,
        manifest_path: P,
        progress_callback: Option<ProgressCallback>,
    ) -> Result<InstallSummary> {
        let manifest = load_manifest(manifest_path).await?;
        info!(
            "Installing modpack for Minecraft {} ({} {})",
            manifest.minecraft.version, manifest.minecraft.loader, manifest.minecraft.loader_version
        );
        self.install(&manifest, progress_callback).await
    }
}
