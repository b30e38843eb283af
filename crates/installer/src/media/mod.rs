//! Media items declared in a manifest
//!
//! A media item is one mod, resource pack or shader pack. After validation
//! each item is a [`MediaDescriptor`] that is never mutated again; anything
//! derived from it during preparation lives in a separate
//! [`PreparedItem`](crate::downloader::PreparedItem).

pub mod provider;

pub use provider::{resolve, ProviderKind};

use percent_encoding::percent_decode_str;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Installation target
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Side {
    Client,
    Server,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Client, Side::Server];

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Client => "client",
            Side::Server => "server",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Side::Client),
            "server" => Ok(Side::Server),
            other => Err(format!("unknown side '{}' (expected client or server)", other)),
        }
    }
}

/// The three media lists a manifest can carry, in install order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Mod,
    ResourcePack,
    ShaderPack,
}

impl MediaKind {
    pub const ALL: [MediaKind; 3] = [MediaKind::Mod, MediaKind::ResourcePack, MediaKind::ShaderPack];

    /// Key of the list in the manifest, also the name of the install subdirectory
    pub fn dir_name(&self) -> &'static str {
        match self {
            MediaKind::Mod => "mods",
            MediaKind::ResourcePack => "resourcepacks",
            MediaKind::ShaderPack => "shaderpacks",
        }
    }

    /// Singular name used in validation messages
    pub fn singular(&self) -> &'static str {
        match self {
            MediaKind::Mod => "mod",
            MediaKind::ResourcePack => "resourcepack",
            MediaKind::ShaderPack => "shaderpack",
        }
    }

    /// Header shown above the listing of this kind
    pub fn title(&self) -> &'static str {
        match self {
            MediaKind::Mod => "Mods",
            MediaKind::ResourcePack => "Resourcepacks",
            MediaKind::ShaderPack => "Shaderpacks",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// One validated entry of a media list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaDescriptor {
    pub provider: ProviderKind,
    pub slug: String,
    /// Target filename, URL-encoded as written in the manifest
    pub name: String,
    pub sides: BTreeSet<Side>,
}

impl MediaDescriptor {
    /// Create a descriptor installed on both sides
    pub fn new<S: Into<String>, N: Into<String>>(provider: ProviderKind, slug: S, name: N) -> Self {
        Self {
            provider,
            slug: slug.into(),
            name: name.into(),
            sides: Side::ALL.into_iter().collect(),
        }
    }

    /// Restrict the descriptor to the given sides
    pub fn with_sides<I: IntoIterator<Item = Side>>(mut self, sides: I) -> Self {
        self.sides = sides.into_iter().collect();
        self
    }

    pub fn applies_to(&self, side: Side) -> bool {
        self.sides.contains(&side)
    }

    /// Filename with percent-escapes decoded, as written to disk
    pub fn file_name(&self) -> String {
        decode_name(&self.name)
    }
}

/// Percent-decode a manifest filename, falling back to lossy UTF-8
pub fn decode_name(name: &str) -> String {
    percent_decode_str(name).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_defaults_to_both_sides() {
        let media = MediaDescriptor::new(ProviderKind::Modrinth, "sodium", "sodium.jar");
        assert!(media.applies_to(Side::Client));
        assert!(media.applies_to(Side::Server));

        let client_only = media.with_sides([Side::Client]);
        assert!(client_only.applies_to(Side::Client));
        assert!(!client_only.applies_to(Side::Server));
    }

    #[test]
    fn test_file_name_is_percent_decoded() {
        let media = MediaDescriptor::new(
            ProviderKind::CurseForge,
            "4585/932",
            "Better%20Foliage%20%5B1.20%5D.jar",
        );
        assert_eq!(media.file_name(), "Better Foliage [1.20].jar");
    }

    #[test]
    fn test_side_parsing() {
        assert_eq!("client".parse::<Side>(), Ok(Side::Client));
        assert_eq!("server".parse::<Side>(), Ok(Side::Server));
        assert!("both".parse::<Side>().is_err());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(MediaKind::ResourcePack.dir_name(), "resourcepacks");
        assert_eq!(MediaKind::ShaderPack.title(), "Shaderpacks");
        assert_eq!(MediaKind::Mod.singular(), "mod");
    }
}
