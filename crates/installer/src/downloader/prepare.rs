//! Preparation phase
//!
//! Resolves, locates and sizes every item that applies to the active side,
//! producing the [`Preparation`] the download phase consumes.

use tracing::{debug, info};

use crate::downloader::config::InstallConfig;
use crate::downloader::core::{HttpClient, PreparedItem, ProgressCallback, ProgressEvent, Result};
use crate::downloader::probe::probe_size;
use crate::manifest::Manifest;
use crate::media::{resolve, MediaKind, Side};

/// Everything the download phase needs
#[derive(Debug, Clone, Default)]
pub struct Preparation {
    /// Side-applicable items in install order: mods, resourcepacks, shaderpacks
    pub items: Vec<PreparedItem>,
    /// Sum of all probed sizes
    pub total_size: u64,
    /// Kinds whose manifest list is non-empty; their directories get created
    pub kinds: Vec<MediaKind>,
    /// Items whose probe failed (counted with size 0)
    pub unavailable: usize,
}

impl Preparation {
    /// Number of files that apply to the active side
    pub fn applicable(&self) -> usize {
        self.items.len()
    }

    /// Prepared items of one kind
    pub fn items_of(&self, kind: MediaKind) -> impl Iterator<Item = &PreparedItem> + '_ {
        self.items.iter().filter(move |item| item.kind == kind)
    }

    pub fn count_of(&self, kind: MediaKind) -> usize {
        self.items_of(kind).count()
    }
}

/// Prepare every media list of `manifest` for the configured side
pub async fn prepare(
    client: &HttpClient,
    config: &InstallConfig,
    manifest: &Manifest,
    progress_callback: Option<&ProgressCallback>,
) -> Result<Preparation> {
    let mut preparation = Preparation::default();

    for (kind, list) in manifest.media_lists() {
        if list.is_empty() {
            continue;
        }
        preparation.kinds.push(kind);

        let (items, unavailable) =
            prepare_media(client, config, kind, list, progress_callback).await?;

        preparation.total_size += items.iter().map(|item| item.size).sum::<u64>();
        preparation.unavailable += unavailable;
        preparation.items.extend(items);
    }

    info!(
        "Prepared {} files ({} bytes, {} unavailable) for the {} side",
        preparation.applicable(),
        preparation.total_size,
        preparation.unavailable,
        config.side()
    );

    Ok(preparation)
}

/// Prepare one media list, returning its items and how many were unavailable
async fn prepare_media(
    client: &HttpClient,
    config: &InstallConfig,
    kind: MediaKind,
    list: &[crate::media::MediaDescriptor],
    progress_callback: Option<&ProgressCallback>,
) -> Result<(Vec<PreparedItem>, usize)> {
    let side: Side = config.side();

    if let Some(callback) = progress_callback {
        callback(ProgressEvent::ListingStarted { kind });
    }

    let mut items = Vec::new();
    let mut unavailable = 0;

    for media in list.iter().filter(|media| media.applies_to(side)) {
        let url = resolve(media);
        let file_name = media.file_name();
        let local_path = config.install_path().join(kind.dir_name()).join(&file_name);

        let outcome = probe_size(client, media, &url, progress_callback).await?;
        if !outcome.is_available() {
            unavailable += 1;
        }

        debug!("{} -> {} ({} bytes)", url, local_path.display(), outcome.size());

        if let Some(callback) = progress_callback {
            callback(ProgressEvent::MediaListed {
                kind,
                slug: media.slug.clone(),
                file_name,
                size: outcome.size(),
            });
        }

        items.push(PreparedItem {
            descriptor: media.clone(),
            kind,
            url,
            local_path,
            size: outcome.size(),
        });
    }

    Ok((items, unavailable))
}
