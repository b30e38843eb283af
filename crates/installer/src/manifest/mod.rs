//! Modpack manifest model and loading
//!
//! A manifest is a JSON document declaring the Minecraft version, the mod
//! loader and the media lists to install:
//!
//! ```json
//! {
//!     "minecraft": { "version": "1.20.1", "modloader": "fabric-0.14.22" },
//!     "mods": [
//!         { "type": "mr", "slug": "AANobbMI/versions/OihdIimA", "name": "sodium.jar" }
//!     ],
//!     "resourcepacks": [],
//!     "shaderpacks": []
//! }
//! ```

pub mod validation;

pub use validation::validate_manifest;

use std::path::Path;
use tokio::fs;
use tracing::debug;

use crate::downloader::core::{FileOperation, InstallError, Result};
use crate::media::{MediaDescriptor, MediaKind, Side};

/// The `minecraft` section of a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinecraftInfo {
    pub version: String,
    /// Raw `loader-version` string
    pub modloader: String,
    pub loader: String,
    pub loader_version: String,
}

/// A validated manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub minecraft: MinecraftInfo,
    pub mods: Vec<MediaDescriptor>,
    pub resourcepacks: Vec<MediaDescriptor>,
    pub shaderpacks: Vec<MediaDescriptor>,
}

impl Manifest {
    /// The media list of one kind
    pub fn media(&self, kind: MediaKind) -> &[MediaDescriptor] {
        match kind {
            MediaKind::Mod => &self.mods,
            MediaKind::ResourcePack => &self.resourcepacks,
            MediaKind::ShaderPack => &self.shaderpacks,
        }
    }

    /// All media lists in install order, paired with their kind
    pub fn media_lists(&self) -> impl Iterator<Item = (MediaKind, &[MediaDescriptor])> + '_ {
        MediaKind::ALL.into_iter().map(move |kind| (kind, self.media(kind)))
    }

    /// Number of items that apply to `side`, across all lists
    pub fn count_for_side(&self, side: Side) -> usize {
        self.media_lists()
            .flat_map(|(_, list)| list.iter())
            .filter(|media| media.applies_to(side))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.media_lists().all(|(_, list)| list.is_empty())
    }
}

/// Parse and validate a manifest from a JSON string
///
/// `origin` is only used to give parse errors some context.
pub fn parse_manifest(json: &str, origin: &Path) -> Result<Manifest> {
    let raw: serde_json::Value =
        serde_json::from_str(json).map_err(|e| InstallError::ManifestParse {
            path: origin.to_path_buf(),
            source: e,
        })?;

    Ok(validate_manifest(&raw)?)
}

/// Load, parse and validate a manifest file
pub async fn load_manifest<P: AsRef<Path>>(path: P) -> Result<Manifest> {
    let path = path.as_ref();
    debug!("Loading manifest from {}", path.display());

    let content = fs::read_to_string(path)
        .await
        .map_err(|e| InstallError::FileSystem {
            path: path.to_path_buf(),
            operation: FileOperation::Read,
            source: e,
        })?;

    parse_manifest(&content, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const MANIFEST: &str = r#"{
        "minecraft": { "version": "1.20.1", "modloader": "fabric-0.14.22" },
        "mods": [
            { "type": "mr", "slug": "AANobbMI/versions/OihdIimA", "name": "sodium.jar" },
            { "type": "cf", "slug": "4585/932", "name": "jei.jar", "sides": ["client"] }
        ],
        "shaderpacks": [
            { "type": "url", "slug": "https://example.com/bsl.zip", "name": "bsl.zip" }
        ]
    }"#;

    #[tokio::test]
    async fn test_load_manifest_from_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("manifest.json");
        tokio::fs::write(&path, MANIFEST).await.unwrap();

        let manifest = load_manifest(&path).await.unwrap();

        assert_eq!(manifest.minecraft.modloader, "fabric-0.14.22");
        assert_eq!(manifest.media(MediaKind::Mod).len(), 2);
        assert_eq!(manifest.media(MediaKind::ResourcePack).len(), 0);
        assert_eq!(manifest.media(MediaKind::ShaderPack).len(), 1);
        assert_eq!(manifest.count_for_side(Side::Client), 3);
        assert_eq!(manifest.count_for_side(Side::Server), 2);
        assert!(!manifest.is_empty());
    }

    #[tokio::test]
    async fn test_load_missing_manifest_file() {
        let temp_dir = tempdir().unwrap();
        let error = load_manifest(temp_dir.path().join("missing.json")).await.unwrap_err();

        match error {
            InstallError::FileSystem { operation, .. } => assert_eq!(operation, FileOperation::Read),
            other => panic!("Expected FileSystem error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_invalid_json() {
        let error = parse_manifest("{ not json", Path::new("broken.json")).unwrap_err();
        assert_eq!(error.category(), "manifest_parse");
    }

    #[test]
    fn test_parse_surfaces_validation_error() {
        let error = parse_manifest(r#"{ "minecraft": { "version": "1.20.1" } }"#, Path::new("m.json"))
            .unwrap_err();

        match error {
            InstallError::Validation(e) => assert_eq!(e.field(), "minecraft.modloader"),
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_media_lists_order() {
        let manifest = parse_manifest(MANIFEST, Path::new("m.json")).unwrap();
        let kinds: Vec<MediaKind> = manifest.media_lists().map(|(kind, _)| kind).collect();
        assert_eq!(kinds, MediaKind::ALL.to_vec());
    }
}
