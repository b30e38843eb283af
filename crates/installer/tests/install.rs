//! End-to-end installs through the public API

use modpack_installer::{
    load_manifest, FileOutcome, InstallConfig, InstallError, Installer, IntoProgressCallback,
    MediaKind, ProgressReporter, Side,
};
use serde_json::json;
use std::sync::{Arc, Mutex};
use tempfile::tempdir;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

async fn serve(server: &MockServer, file_path: &str, content: &[u8]) {
    Mock::given(method("HEAD"))
        .and(path(file_path))
        .respond_with(
            ResponseTemplate::new(200).insert_header("content-length", content.len().to_string()),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(file_path))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content.to_vec()))
        .mount(server)
        .await;
}

#[derive(Clone, Default)]
struct Listing {
    lines: Arc<Mutex<Vec<String>>>,
}

impl ProgressReporter for Listing {
    fn on_listing_started(&self, kind: MediaKind) {
        self.lines.lock().unwrap().push(format!("{}:", kind.title()));
    }

    fn on_media_listed(&self, _kind: MediaKind, slug: &str, file_name: &str, _size: u64) {
        self.lines.lock().unwrap().push(format!("{} ({})", slug, file_name));
    }

    fn on_warning(&self, _name: &str, message: &str) {
        self.lines.lock().unwrap().push(format!("WARNING: {}", message));
    }
}

#[tokio::test]
async fn test_install_manifest_file_for_server() {
    let server = MockServer::start().await;
    serve(&server, "/lithium.jar", &[1u8; 1500]).await;
    serve(&server, "/dark.zip", &[2u8; 20]).await;
    Mock::given(method("HEAD"))
        .and(path("/iris.jar"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let temp_dir = tempdir().unwrap();
    let manifest_path = temp_dir.path().join("modpack.json");
    let manifest = json!({
        "minecraft": { "version": "1.20.1", "modloader": "fabric-0.14.22" },
        "mods": [
            { "type": "url", "slug": format!("{}/lithium.jar", server.uri()), "name": "lithium.jar" },
            { "type": "url", "slug": format!("{}/iris.jar", server.uri()), "name": "iris.jar", "sides": ["client"] }
        ],
        "resourcepacks": [
            { "type": "url", "slug": format!("{}/dark.zip", server.uri()), "name": "dark.zip", "sides": ["server", "client"] }
        ]
    });
    std::fs::write(&manifest_path, manifest.to_string()).unwrap();

    let manifest = load_manifest(&manifest_path).await.unwrap();
    assert_eq!(manifest.minecraft.loader, "fabric");
    assert_eq!(manifest.minecraft.loader_version, "0.14.22");

    let install_path = temp_dir.path().join("server");
    let installer = Installer::new(InstallConfig::new(&install_path, Side::Server)).unwrap();
    let listing = Listing::default();

    let preparation = installer
        .prepare(&manifest, Some(listing.clone().into_callback()))
        .await
        .unwrap();

    assert_eq!(preparation.total_size, 1520);
    assert_eq!(preparation.count_of(MediaKind::Mod), 1);
    assert_eq!(preparation.count_of(MediaKind::ResourcePack), 1);
    assert_eq!(
        *listing.lines.lock().unwrap(),
        vec![
            "Mods:".to_string(),
            format!("{}/lithium.jar (lithium.jar)", server.uri()),
            "Resourcepacks:".to_string(),
            format!("{}/dark.zip (dark.zip)", server.uri()),
        ]
    );

    let summary = installer.download(&preparation, None).await.unwrap();

    assert_eq!(summary.applicable, 2);
    assert!(summary
        .outcomes
        .iter()
        .all(|(_, outcome)| matches!(outcome, FileOutcome::Downloaded { .. })));
    assert_eq!(std::fs::read(install_path.join("mods/lithium.jar")).unwrap().len(), 1500);
    assert_eq!(std::fs::read(install_path.join("resourcepacks/dark.zip")).unwrap(), vec![2u8; 20]);
    assert!(!install_path.join("mods/iris.jar").exists());
    assert!(!install_path.join("shaderpacks").exists());
}

#[tokio::test]
async fn test_invalid_provider_is_rejected_with_location() {
    let temp_dir = tempdir().unwrap();
    let manifest_path = temp_dir.path().join("modpack.json");
    let manifest = json!({
        "minecraft": { "version": "1.20.1", "modloader": "forge-47.2.0" },
        "mods": [
            { "type": "mr", "slug": "AANobbMI/versions/OihdIimA", "name": "sodium.jar" },
            { "type": "gh", "slug": "owner/repo", "name": "other.jar" }
        ]
    });
    std::fs::write(&manifest_path, manifest.to_string()).unwrap();

    let installer = Installer::new(InstallConfig::new(temp_dir.path(), Side::Client)).unwrap();
    let error = installer.install_file(&manifest_path, None).await.unwrap_err();

    assert_eq!(error.category(), "validation");
    match error {
        InstallError::Validation(validation) => {
            assert!(validation.is_invalid_enum());
            assert_eq!(validation.field(), "type");
            assert!(validation.to_string().contains("mod #1"));
        }
        other => panic!("Expected Validation error, got {:?}", other),
    }
    assert!(!temp_dir.path().join("mods").exists());
}

#[tokio::test]
async fn test_malformed_json_reports_manifest_path() {
    let temp_dir = tempdir().unwrap();
    let manifest_path = temp_dir.path().join("broken.json");
    std::fs::write(&manifest_path, "{ \"minecraft\": ").unwrap();

    let error = load_manifest(&manifest_path).await.unwrap_err();

    match error {
        InstallError::ManifestParse { path, .. } => assert_eq!(path, manifest_path),
        other => panic!("Expected ManifestParse error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_manifest_file() {
    let temp_dir = tempdir().unwrap();
    let error = load_manifest(temp_dir.path().join("absent.json")).await.unwrap_err();

    assert!(matches!(error, InstallError::FileSystem { .. }));
}
