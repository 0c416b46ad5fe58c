//! The pair of namespace stores, built once at startup

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ixp_artifact::{ConfigValidator, Namespace};
use serde::{Deserialize, Serialize};

use crate::error::RepositoryError;
use crate::fs::FsRepository;
use crate::namespace_store::NamespaceStore;
use crate::repository::MemoryRepository;

/// Storage directories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding `*.conf` scenario documents
    pub configs_dir: PathBuf,
    /// Directory holding auxiliary resources
    pub resources_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            configs_dir: PathBuf::from("ixpconfigs"),
            resources_dir: PathBuf::from("resources"),
        }
    }
}

impl StorageConfig {
    /// Default directory names under `root`
    #[must_use]
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            configs_dir: root.join("ixpconfigs"),
            resources_dir: root.join("resources"),
        }
    }

    /// Set configs directory
    #[inline]
    #[must_use]
    pub fn with_configs_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.configs_dir = dir.into();
        self
    }

    /// Set resources directory
    #[inline]
    #[must_use]
    pub fn with_resources_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.resources_dir = dir.into();
        self
    }

    /// Directory for a namespace
    #[must_use]
    pub fn dir(&self, namespace: Namespace) -> &Path {
        match namespace {
            Namespace::Configs => &self.configs_dir,
            Namespace::Resources => &self.resources_dir,
        }
    }
}

/// Config and resource stores
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    configs: NamespaceStore,
    resources: NamespaceStore,
}

impl ArtifactStore {
    /// Open directory-backed stores, creating missing directories
    ///
    /// # Errors
    /// Returns [`RepositoryError::Io`] if a directory cannot be created
    pub async fn open(
        config: &StorageConfig,
        validator: ConfigValidator,
    ) -> Result<Self, RepositoryError> {
        let configs = FsRepository::open(&config.configs_dir).await?;
        let resources = FsRepository::open(&config.resources_dir).await?;
        tracing::info!(
            configs = %configs.root().display(),
            resources = %resources.root().display(),
            "artifact store opened"
        );
        Ok(Self::from_parts(
            NamespaceStore::new(Namespace::Configs, Arc::new(configs), validator),
            NamespaceStore::new(Namespace::Resources, Arc::new(resources), validator),
        ))
    }

    /// Stores backed by memory only
    #[must_use]
    pub fn in_memory(validator: ConfigValidator) -> Self {
        Self::from_parts(
            NamespaceStore::new(Namespace::Configs, Arc::new(MemoryRepository::new()), validator),
            NamespaceStore::new(
                Namespace::Resources,
                Arc::new(MemoryRepository::new()),
                validator,
            ),
        )
    }

    /// Assemble from existing namespace stores
    #[must_use]
    pub fn from_parts(configs: NamespaceStore, resources: NamespaceStore) -> Self {
        Self { configs, resources }
    }

    /// Store for a namespace
    #[inline]
    #[must_use]
    pub fn namespace(&self, namespace: Namespace) -> &NamespaceStore {
        match namespace {
            Namespace::Configs => &self.configs,
            Namespace::Resources => &self.resources,
        }
    }

    #[inline]
    #[must_use]
    pub fn configs(&self) -> &NamespaceStore {
        &self.configs
    }

    #[inline]
    #[must_use]
    pub fn resources(&self) -> &NamespaceStore {
        &self.resources
    }
}
