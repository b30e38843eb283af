//! Manifest validation
//!
//! Works on the raw JSON value rather than on a serde-derived struct so that
//! every failure can name the exact list, entry and key at fault.

use serde_json::{Map, Value};
use std::collections::BTreeSet;
use tracing::debug;

use super::{Manifest, MinecraftInfo};
use crate::downloader::core::ValidationError;
use crate::media::{MediaDescriptor, MediaKind, ProviderKind, Side};

const REQUIRED_MEDIA_KEYS: [&str; 3] = ["type", "slug", "name"];

/// Validate a raw manifest and convert it into a typed [`Manifest`]
///
/// Descriptors without `sides` are given both sides; this is the only value
/// the validator fills in.
pub fn validate_manifest(raw: &Value) -> Result<Manifest, ValidationError> {
    let root = raw.as_object().ok_or_else(|| ValidationError::InvalidType {
        field: "<root>".to_string(),
        location: "manifest".to_string(),
        expected: "a JSON object".to_string(),
    })?;

    let minecraft = validate_minecraft(root)?;

    let mods = validate_media_list(root, MediaKind::Mod)?;
    let resourcepacks = validate_media_list(root, MediaKind::ResourcePack)?;
    let shaderpacks = validate_media_list(root, MediaKind::ShaderPack)?;

    debug!(
        "Manifest valid: {} mods, {} resourcepacks, {} shaderpacks",
        mods.len(),
        resourcepacks.len(),
        shaderpacks.len()
    );

    Ok(Manifest {
        minecraft,
        mods,
        resourcepacks,
        shaderpacks,
    })
}

fn validate_minecraft(root: &Map<String, Value>) -> Result<MinecraftInfo, ValidationError> {
    let section = match root.get("minecraft") {
        Some(Value::Object(section)) => section,
        Some(Value::Null) | None => {
            return Err(ValidationError::MissingField {
                field: "minecraft".to_string(),
                location: "manifest".to_string(),
                hint: "The modpack must include a 'minecraft' section".to_string(),
            });
        }
        Some(_) => {
            return Err(ValidationError::InvalidType {
                field: "minecraft".to_string(),
                location: "manifest".to_string(),
                expected: "an object".to_string(),
            });
        }
    };

    let version = required_string(
        section,
        "version",
        "minecraft.version",
        "The 'minecraft' section must include the minecraft version",
    )?;

    let modloader_hint = "The 'minecraft' section must include the modloader and version \
                          in this format: 'modloader-x.x.x'";
    let modloader = required_string(section, "modloader", "minecraft.modloader", modloader_hint)?;

    let (loader, loader_version) =
        modloader
            .split_once('-')
            .ok_or_else(|| ValidationError::MissingField {
                field: "minecraft.modloader".to_string(),
                location: "'minecraft' section".to_string(),
                hint: modloader_hint.to_string(),
            })?;

    Ok(MinecraftInfo {
        version: version.to_string(),
        loader: loader.to_string(),
        loader_version: loader_version.to_string(),
        modloader: modloader.to_string(),
    })
}

fn required_string<'a>(
    section: &'a Map<String, Value>,
    key: &str,
    field: &str,
    hint: &str,
) -> Result<&'a str, ValidationError> {
    match section.get(key) {
        Some(Value::String(value)) => Ok(value),
        Some(Value::Null) | None => Err(ValidationError::MissingField {
            field: field.to_string(),
            location: "'minecraft' section".to_string(),
            hint: hint.to_string(),
        }),
        Some(_) => Err(ValidationError::InvalidType {
            field: field.to_string(),
            location: "'minecraft' section".to_string(),
            expected: "a string".to_string(),
        }),
    }
}

/// Validate one media list; absent and `null` lists are empty
pub fn validate_media_list(
    root: &Map<String, Value>,
    kind: MediaKind,
) -> Result<Vec<MediaDescriptor>, ValidationError> {
    let entries = match root.get(kind.dir_name()) {
        Some(Value::Array(entries)) => entries,
        Some(Value::Null) | None => return Ok(Vec::new()),
        Some(_) => {
            return Err(ValidationError::InvalidType {
                field: kind.dir_name().to_string(),
                location: "manifest".to_string(),
                expected: "an array".to_string(),
            });
        }
    };

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| validate_media(entry, kind, index))
        .collect()
}

fn validate_media(
    entry: &Value,
    kind: MediaKind,
    index: usize,
) -> Result<MediaDescriptor, ValidationError> {
    let location = format!("{} #{}: {}", kind.singular(), index, entry);

    let media = entry.as_object().ok_or_else(|| ValidationError::InvalidType {
        field: format!("{}[{}]", kind.dir_name(), index),
        location: location.clone(),
        expected: "an object".to_string(),
    })?;

    for key in REQUIRED_MEDIA_KEYS {
        match media.get(key) {
            Some(Value::String(_)) => {}
            Some(Value::Null) | None => {
                return Err(ValidationError::MissingField {
                    field: key.to_string(),
                    location,
                    hint: format!(
                        "The '{}' key should be specified in every {}",
                        key,
                        kind.singular()
                    ),
                });
            }
            Some(_) => {
                return Err(ValidationError::InvalidType {
                    field: key.to_string(),
                    location,
                    expected: "a string".to_string(),
                });
            }
        }
    }

    let provider_tag = string_field(media, "type");
    let provider = provider_tag
        .parse::<ProviderKind>()
        .map_err(|_| ValidationError::InvalidEnum {
            field: "type".to_string(),
            value: provider_tag.to_string(),
            location: location.clone(),
            allowed: ProviderKind::allowed_tags(),
        })?;

    let sides = validate_sides(media.get("sides"), &location)?;

    Ok(MediaDescriptor {
        provider,
        slug: string_field(media, "slug").to_string(),
        name: string_field(media, "name").to_string(),
        sides,
    })
}

fn string_field<'a>(media: &'a Map<String, Value>, key: &str) -> &'a str {
    media.get(key).and_then(Value::as_str).unwrap_or_default()
}

fn validate_sides(value: Option<&Value>, location: &str) -> Result<BTreeSet<Side>, ValidationError> {
    let values = match value {
        Some(Value::Null) | None => return Ok(Side::ALL.into_iter().collect()),
        Some(Value::Array(values)) => values,
        Some(_) => {
            return Err(ValidationError::InvalidType {
                field: "sides".to_string(),
                location: location.to_string(),
                expected: "an array of sides".to_string(),
            });
        }
    };

    values
        .iter()
        .map(|side| {
            let tag = side.as_str().ok_or_else(|| ValidationError::InvalidType {
                field: "sides".to_string(),
                location: location.to_string(),
                expected: "an array of strings".to_string(),
            })?;
            tag.parse::<Side>().map_err(|_| ValidationError::InvalidEnum {
                field: "sides".to_string(),
                value: tag.to_string(),
                location: location.to_string(),
                allowed: "client, server".to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base_manifest() -> Value {
        json!({
            "minecraft": { "version": "1.20.1", "modloader": "fabric-0.14.22" },
            "mods": [
                { "type": "mr", "slug": "AANobbMI/versions/OihdIimA", "name": "sodium.jar" }
            ]
        })
    }

    #[test]
    fn test_valid_manifest() {
        let manifest = validate_manifest(&base_manifest()).unwrap();

        assert_eq!(manifest.minecraft.version, "1.20.1");
        assert_eq!(manifest.minecraft.loader, "fabric");
        assert_eq!(manifest.minecraft.loader_version, "0.14.22");
        assert_eq!(manifest.mods.len(), 1);
        assert!(manifest.resourcepacks.is_empty());
        assert!(manifest.shaderpacks.is_empty());
    }

    #[test]
    fn test_modloader_splits_on_first_hyphen() {
        let mut raw = base_manifest();
        raw["minecraft"]["modloader"] = json!("forge-1.20.1-47.1.0");

        let manifest = validate_manifest(&raw).unwrap();
        assert_eq!(manifest.minecraft.loader, "forge");
        assert_eq!(manifest.minecraft.loader_version, "1.20.1-47.1.0");
    }

    #[test]
    fn test_missing_minecraft_section() {
        let raw = json!({ "mods": [] });
        let error = validate_manifest(&raw).unwrap_err();
        assert!(error.is_missing_field());
        assert_eq!(error.field(), "minecraft");
    }

    #[test]
    fn test_missing_version() {
        let mut raw = base_manifest();
        raw["minecraft"].as_object_mut().unwrap().remove("version");

        let error = validate_manifest(&raw).unwrap_err();
        assert!(error.is_missing_field());
        assert_eq!(error.field(), "minecraft.version");
    }

    #[test]
    fn test_modloader_without_hyphen() {
        let mut raw = base_manifest();
        raw["minecraft"]["modloader"] = json!("fabric");

        let error = validate_manifest(&raw).unwrap_err();
        assert!(error.is_missing_field());
        assert_eq!(error.field(), "minecraft.modloader");
    }

    #[test]
    fn test_missing_modloader() {
        let mut raw = base_manifest();
        raw["minecraft"].as_object_mut().unwrap().remove("modloader");

        let error = validate_manifest(&raw).unwrap_err();
        assert!(error.is_missing_field());
        assert_eq!(error.field(), "minecraft.modloader");
    }

    #[test]
    fn test_missing_media_keys() {
        for key in REQUIRED_MEDIA_KEYS {
            let mut raw = base_manifest();
            raw["resourcepacks"] = json!([
                { "type": "pm", "slug": "texture/1234", "name": "pack.zip" },
                { "type": "pm", "slug": "texture/5678", "name": "other.zip" }
            ]);
            raw["resourcepacks"][1].as_object_mut().unwrap().remove(key);

            let error = validate_manifest(&raw).unwrap_err();
            assert!(error.is_missing_field(), "{} should be required", key);
            assert_eq!(error.field(), key);
            assert!(error.to_string().contains("resourcepack #1"));
        }
    }

    #[test]
    fn test_invalid_provider_type() {
        let mut raw = base_manifest();
        raw["mods"][0]["type"] = json!("github");

        let error = validate_manifest(&raw).unwrap_err();
        assert!(error.is_invalid_enum());
        assert_eq!(error.field(), "type");
        assert!(error.to_string().contains("'github'"));
    }

    #[test]
    fn test_sides_default_to_both() {
        let manifest = validate_manifest(&base_manifest()).unwrap();
        let expected: BTreeSet<Side> = [Side::Client, Side::Server].into_iter().collect();
        assert_eq!(manifest.mods[0].sides, expected);
    }

    #[test]
    fn test_explicit_sides_are_kept() {
        let mut raw = base_manifest();
        raw["mods"][0]["sides"] = json!(["client"]);

        let manifest = validate_manifest(&raw).unwrap();
        assert!(manifest.mods[0].applies_to(Side::Client));
        assert!(!manifest.mods[0].applies_to(Side::Server));
    }

    #[test]
    fn test_unknown_side_is_rejected() {
        let mut raw = base_manifest();
        raw["mods"][0]["sides"] = json!(["client", "proxy"]);

        let error = validate_manifest(&raw).unwrap_err();
        assert!(error.is_invalid_enum());
        assert_eq!(error.field(), "sides");
    }

    #[test]
    fn test_non_array_media_list() {
        let mut raw = base_manifest();
        raw["shaderpacks"] = json!({ "type": "url" });

        let error = validate_manifest(&raw).unwrap_err();
        assert_eq!(
            error,
            ValidationError::InvalidType {
                field: "shaderpacks".to_string(),
                location: "manifest".to_string(),
                expected: "an array".to_string(),
            }
        );
    }

    #[test]
    fn test_null_media_list_is_empty() {
        let mut raw = base_manifest();
        raw["shaderpacks"] = Value::Null;

        let manifest = validate_manifest(&raw).unwrap();
        assert!(manifest.shaderpacks.is_empty());
    }
}
