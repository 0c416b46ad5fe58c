//! IXP Artifact Store
//!
//! Two disjoint namespaces of named files, each backed by one directory:
//!
//! - **configs**: `*.conf` scenario documents, validated and stored as
//!   canonical 4-space JSON
//! - **resources**: `*.json`, `*.dump` and `*.conf` blobs stored verbatim
//!
//! Name collisions are detected atomically by the repository and writes to
//! the same name are serialized by [`NameLocks`].

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
mod fs;
mod locks;
mod namespace_store;
mod repository;
mod store;

pub use error::{Operation, RepositoryError, StoreError};
pub use fs::FsRepository;
pub use locks::{NameGuard, NameLocks};
pub use namespace_store::{ArtifactDocument, ArtifactEntry, ContentInput, NamespaceStore};
pub use repository::{ArtifactRepository, MemoryRepository};
pub use store::{ArtifactStore, StorageConfig};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use ixp_artifact::{ConfigValidator, Namespace};
    use std::sync::Arc;

    #[tokio::test]
    async fn concurrent_creates_have_one_winner() {
        let store = ArtifactStore::in_memory(ConfigValidator::new());
        let body = r#"{"scenario_name":"race","peering_lan":{},"route_servers":{}}"#;

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let configs = store.configs().clone();
                tokio::spawn(async move { configs.create(Some("race.conf"), Some(body)).await })
            })
            .collect();

        let mut created = 0;
        let mut conflicts = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => created += 1,
                Err(StoreError::AlreadyExists) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!((created, conflicts), (1, 15));
    }

    #[tokio::test]
    async fn custom_repository_plugs_in() {
        let repo = Arc::new(MemoryRepository::new());
        repo.insert_raw("seed.dump", "routes");
        let resources =
            NamespaceStore::new(Namespace::Resources, repo.clone(), ConfigValidator::new());
        let store = ArtifactStore::from_parts(
            NamespaceStore::new(
                Namespace::Configs,
                Arc::new(MemoryRepository::new()),
                ConfigValidator::new(),
            ),
            resources,
        );
        assert_eq!(store.resources().get("seed.dump").await.unwrap().content, "routes");
        assert_eq!(store.resources().repository().location(), "memory");
    }
}
