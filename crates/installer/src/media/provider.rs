//! Providers a media item can be fetched from and their URL patterns

use std::fmt;
use std::str::FromStr;

use super::MediaDescriptor;

const CURSEFORGE_CDN: &str = "https://mediafilez.forgecdn.net/files";
const MODRINTH_CDN: &str = "https://cdn.modrinth.com/data";
const PLANET_MINECRAFT_CDN: &str = "https://static.planetminecraft.com/files/resource_media";

/// Where a media item is hosted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// `cf`: slug is the CurseForge file path, e.g. `4585/932`
    CurseForge,
    /// `mr`: slug is `<project>/versions/<version>`
    Modrinth,
    /// `pm`: slug is the Planet Minecraft media folder
    PlanetMinecraft,
    /// `url`: slug is the download URL itself
    Direct,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::CurseForge,
        ProviderKind::Modrinth,
        ProviderKind::PlanetMinecraft,
        ProviderKind::Direct,
    ];

    /// Manifest tag for this provider
    pub fn tag(&self) -> &'static str {
        match self {
            ProviderKind::CurseForge => "cf",
            ProviderKind::Modrinth => "mr",
            ProviderKind::PlanetMinecraft => "pm",
            ProviderKind::Direct => "url",
        }
    }

    /// Comma-separated list of all manifest tags
    pub fn allowed_tags() -> String {
        Self::ALL.iter().map(|p| p.tag()).collect::<Vec<_>>().join(", ")
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.tag() == s)
            .ok_or_else(|| format!("unknown provider type '{}'", s))
    }
}

/// Resolve the download URL of a media item
///
/// Pure and infallible: a malformed slug just yields a URL that fails later
/// at probe or download time.
pub fn resolve(media: &MediaDescriptor) -> String {
    match media.provider {
        ProviderKind::CurseForge => curseforge_url(&media.slug, &media.name),
        ProviderKind::Modrinth => modrinth_url(&media.slug, &media.name),
        ProviderKind::PlanetMinecraft => planet_minecraft_url(&media.slug, &media.name),
        ProviderKind::Direct => media.slug.clone(),
    }
}

fn curseforge_url(slug: &str, name: &str) -> String {
    format!("{}/{}/{}", CURSEFORGE_CDN, slug.trim_matches('/'), name)
}

fn modrinth_url(slug: &str, name: &str) -> String {
    format!("{}/{}/{}", MODRINTH_CDN, slug.trim_matches('/'), name)
}

fn planet_minecraft_url(slug: &str, name: &str) -> String {
    format!("{}/{}/{}", PLANET_MINECRAFT_CDN, slug.trim_matches('/'), name)
}
