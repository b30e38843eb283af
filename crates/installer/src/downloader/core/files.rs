//! File operation utilities

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::downloader::core::{FileOperation, InstallError, Result};

/// Whether a file is already present at `path`
///
/// Presence is all that counts; the content is never inspected.
pub async fn is_installed(path: &Path) -> bool {
    fs::metadata(path)
        .await
        .map(|metadata| metadata.is_file())
        .unwrap_or(false)
}

/// Create `dir` if it does not exist yet
pub async fn ensure_dir(dir: &Path) -> Result<()> {
    if fs::metadata(dir).await.map(|m| m.is_dir()).unwrap_or(false) {
        return Ok(());
    }

    debug!("Creating directory {}", dir.display());
    fs::create_dir_all(dir)
        .await
        .map_err(|e| InstallError::FileSystem {
            path: dir.to_path_buf(),
            operation: FileOperation::CreateDir,
            source: e,
        })
}

/// Path a download is streamed to before it is renamed into place
///
/// The suffix is appended rather than substituted so `a.jar` and `a.zip`
/// never share a temporary file.
pub fn create_temp_path(dest_path: &Path) -> PathBuf {
    let mut name = dest_path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest_path.with_file_name(name)
}

/// Atomically rename a temporary file to its final destination
pub async fn atomic_rename(temp_path: &Path, dest_path: &Path) -> Result<()> {
    fs::rename(temp_path, dest_path)
        .await
        .map_err(|e| InstallError::FileSystem {
            path: dest_path.to_path_buf(),
            operation: FileOperation::Create,
            source: e,
        })?;
    debug!("Atomically renamed {} to {}", temp_path.display(), dest_path.display());
    Ok(())
}

/// Remove a leftover temporary file, ignoring a missing one
pub async fn discard_temp(temp_path: &Path) {
    if let Err(e) = fs::remove_file(temp_path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            debug!("Could not remove {}: {}", temp_path.display(), e);
        }
    }
}
