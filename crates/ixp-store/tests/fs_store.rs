//! Directory-backed store behaviour

use ixp_artifact::{ConfigValidator, Namespace};
use ixp_store::{ArtifactStore, StorageConfig, StoreError};
use pretty_assertions::assert_eq;

const ROUND_TRIP: &str =
    r#"{"scenario_name":"a","peering_lan":{"4":"1.0.0.0/24","6":"::/48"},"route_servers":{}}"#;

const CANONICAL: &str = r#"{
    "scenario_name": "a",
    "peering_lan": {
        "4": "1.0.0.0/24",
        "6": "::/48"
    },
    "route_servers": {}
}"#;

async fn open() -> (tempfile::TempDir, StorageConfig, ArtifactStore) {
    let dir = tempfile::tempdir().unwrap();
    let config = StorageConfig::with_root(dir.path());
    let store = ArtifactStore::open(&config, ConfigValidator::new()).await.unwrap();
    (dir, config, store)
}

#[tokio::test]
async fn config_bytes_on_disk_are_canonical() {
    let (_dir, config, store) = open().await;
    store
        .configs()
        .create(Some("a.conf"), Some(ROUND_TRIP))
        .await
        .unwrap();

    let on_disk = std::fs::read_to_string(config.configs_dir.join("a.conf")).unwrap();
    assert_eq!(on_disk, CANONICAL);
}

#[tokio::test]
async fn listing_reflects_foreign_files() {
    let (_dir, config, store) = open().await;
    std::fs::write(config.configs_dir.join("manual.conf"), "{}").unwrap();
    std::fs::write(config.configs_dir.join("README"), "ignored").unwrap();
    std::fs::write(config.resources_dir.join("rib_v6.DUMP"), "routes").unwrap();

    let configs = store.configs().list().await.unwrap();
    assert_eq!(configs.len(), 1);
    assert_eq!(configs[0].name, "manual.conf");
    assert_eq!(configs[0].content, "{}");

    let resources = store.resources().list().await.unwrap();
    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0].kind, "resource");
}

#[tokio::test]
async fn update_and_delete_lifecycle() {
    let (_dir, config, store) = open().await;
    let resources = store.namespace(Namespace::Resources);

    resources.create(Some("peers.json"), Some("[1]")).await.unwrap();
    resources.update("peers.json", Some("[1, 2]")).await.unwrap();
    assert_eq!(
        std::fs::read_to_string(config.resources_dir.join("peers.json")).unwrap(),
        "[1, 2]"
    );

    resources.delete("peers.json").await.unwrap();
    assert!(!config.resources_dir.join("peers.json").exists());
    assert!(matches!(
        resources.delete("peers.json").await,
        Err(StoreError::NotFound(Namespace::Resources))
    ));
    assert!(matches!(
        resources.update("peers.json", Some("x")).await,
        Err(StoreError::NotFound(Namespace::Resources))
    ));
}

#[tokio::test]
async fn concurrent_creates_on_disk_have_one_winner() {
    let (_dir, config, store) = open().await;

    let tasks: Vec<_> = (0..12)
        .map(|i| {
            let resources = store.resources().clone();
            tokio::spawn(async move {
                let body = format!("writer {i}");
                resources.create(Some("race.dump"), Some(body)).await
            })
        })
        .collect();

    let mut winners = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => winners += 1,
            Err(StoreError::AlreadyExists) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(winners, 1);
    let content = std::fs::read_to_string(config.resources_dir.join("race.dump")).unwrap();
    assert!(content.starts_with("writer "));
}

#[tokio::test]
async fn reopen_sees_existing_artifacts() {
    let (_dir, config, store) = open().await;
    store
        .configs()
        .create(Some("keep.conf"), Some(ROUND_TRIP))
        .await
        .unwrap();
    drop(store);

    let reopened = ArtifactStore::open(&config, ConfigValidator::new()).await.unwrap();
    let doc = reopened.configs().get("keep.conf").await.unwrap();
    assert_eq!(doc.content, CANONICAL);
}
