//! Namespace policy over a repository
//!
//! A [`NamespaceStore`] applies the rules of one namespace (extension
//! whitelist, validation and canonical serialization for configs, verbatim
//! content for resources) on top of an [`ArtifactRepository`].

use std::sync::Arc;

use futures::future::try_join_all;
use ixp_artifact::{ArtifactName, ConfigValidator, ContentHash, Namespace, ValidationError};
use serde::{Deserialize, Serialize};

use crate::error::{Operation, RepositoryError, StoreError};
use crate::locks::NameLocks;
use crate::repository::ArtifactRepository;

/// `content` of a write request
///
/// Config content is JSON text. A structured value sent where text was
/// expected never validates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ContentInput {
    /// Absent or `null`; stored as empty text
    #[default]
    Missing,
    Text(String),
    /// An object or array instead of text
    Structured,
}

impl From<Option<&str>> for ContentInput {
    fn from(content: Option<&str>) -> Self {
        content.map_or(Self::Missing, |text| Self::Text(text.to_string()))
    }
}

impl From<Option<String>> for ContentInput {
    fn from(content: Option<String>) -> Self {
        content.map_or(Self::Missing, Self::Text)
    }
}

/// Listing entry, serialized as `{name, content, type}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactEntry {
    pub name: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Single artifact read with its content hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDocument {
    pub name: ArtifactName,
    pub content: String,
    pub hash: ContentHash,
}

/// Store for one namespace
#[derive(Clone)]
pub struct NamespaceStore {
    namespace: Namespace,
    repo: Arc<dyn ArtifactRepository>,
    validator: ConfigValidator,
    locks: NameLocks,
}

impl std::fmt::Debug for NamespaceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamespaceStore")
            .field("namespace", &self.namespace)
            .field("location", &self.repo.location())
            .field("validator", &self.validator)
            .finish_non_exhaustive()
    }
}

impl NamespaceStore {
    /// Create store over a repository
    #[must_use]
    pub fn new(
        namespace: Namespace,
        repo: Arc<dyn ArtifactRepository>,
        validator: ConfigValidator,
    ) -> Self {
        Self {
            namespace,
            repo,
            validator,
            locks: NameLocks::new(),
        }
    }

    /// Namespace this store serves
    #[inline]
    #[must_use]
    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    /// Underlying repository
    #[inline]
    #[must_use]
    pub fn repository(&self) -> &Arc<dyn ArtifactRepository> {
        &self.repo
    }

    fn repo_err(&self, operation: Operation) -> impl Fn(RepositoryError) -> StoreError + '_ {
        move |err| {
            let err = StoreError::from_repository(err, self.namespace, operation);
            if let StoreError::Io { source, .. } = &err {
                tracing::error!(
                    namespace = %self.namespace,
                    operation = operation.verb(),
                    location = %self.repo.location(),
                    error = %source,
                    "artifact storage failure"
                );
            }
            err
        }
    }

    /// Parse a client-supplied name that must carry an allowed extension
    fn checked_name(&self, raw: Option<&str>) -> Result<ArtifactName, StoreError> {
        let name = ArtifactName::parse(raw.unwrap_or_default())?;
        if !self.namespace.accepts(&name) {
            return Err(StoreError::InvalidExtension(self.namespace));
        }
        Ok(name)
    }

    /// Content to persist: canonical JSON for configs, verbatim otherwise
    fn prepare(&self, content: ContentInput) -> Result<String, StoreError> {
        let content = match content {
            ContentInput::Missing => String::new(),
            ContentInput::Text(text) => text,
            ContentInput::Structured => {
                return Err(ValidationError::InvalidJson(
                    "content must be a string of JSON text".to_string(),
                )
                .into())
            }
        };
        if self.namespace.is_validated() {
            let parsed = self.validator.validate(&content)?;
            Ok(parsed.into_canonical())
        } else {
            Ok(content)
        }
    }

    /// All artifacts matching the namespace, in enumeration order
    ///
    /// # Errors
    /// [`StoreError::Io`] if the directory or a file cannot be read
    pub async fn list(&self) -> Result<Vec<ArtifactEntry>, StoreError> {
        let names = self
            .repo
            .names()
            .await
            .map_err(self.repo_err(Operation::List))?;

        let matching: Vec<ArtifactName> = names
            .into_iter()
            .filter_map(|raw| ArtifactName::parse(raw).ok())
            .filter(|name| self.namespace.accepts(name))
            .collect();

        let reads = matching.iter().map(|name| async move {
            match self.repo.read(name).await {
                Ok(content) => Ok(Some(ArtifactEntry {
                    name: name.to_string(),
                    content,
                    kind: self.namespace.kind().to_string(),
                })),
                // Deleted between enumeration and read.
                Err(RepositoryError::NotFound(_)) => Ok(None),
                Err(err) => Err(err),
            }
        });

        let entries = try_join_all(reads)
            .await
            .map_err(self.repo_err(Operation::List))?;
        Ok(entries.into_iter().flatten().collect())
    }

    /// Read one artifact
    ///
    /// # Errors
    /// [`StoreError::NotFound`] if absent, [`StoreError::InvalidName`] for
    /// names that would leave the directory
    pub async fn get(&self, raw_name: &str) -> Result<ArtifactDocument, StoreError> {
        let name = ArtifactName::parse(raw_name)?;
        let content = self
            .repo
            .read(&name)
            .await
            .map_err(self.repo_err(Operation::Read))?;
        let hash = ContentHash::compute(content.as_bytes());
        Ok(ArtifactDocument { name, content, hash })
    }

    /// Entries of `names` with no artifact behind them, first occurrence
    /// order, without duplicates
    ///
    /// Names that could never be stored count as missing.
    ///
    /// # Errors
    /// [`StoreError::Io`] if an existence check fails
    pub async fn missing(&self, names: &[&str]) -> Result<Vec<String>, StoreError> {
        let mut missing: Vec<String> = Vec::new();
        for &raw in names {
            if missing.iter().any(|m| m == raw) {
                continue;
            }
            let present = match ArtifactName::parse(raw) {
                Ok(name) => self
                    .repo
                    .exists(&name)
                    .await
                    .map_err(self.repo_err(Operation::Read))?,
                Err(_) => false,
            };
            if !present {
                missing.push(raw.to_string());
            }
        }
        Ok(missing)
    }

    /// Create a new artifact
    ///
    /// Checks run in order: name present, extension, content validation,
    /// name collision.
    ///
    /// # Errors
    /// [`StoreError::MissingName`], [`StoreError::InvalidExtension`],
    /// [`StoreError::Validation`], [`StoreError::AlreadyExists`] or
    /// [`StoreError::Io`]
    pub async fn create(
        &self,
        name: Option<&str>,
        content: impl Into<ContentInput>,
    ) -> Result<ContentHash, StoreError> {
        let name = self.checked_name(name)?;
        let stored = self.prepare(content.into())?;

        let _guard = self.locks.lock(name.as_str()).await;
        self.repo
            .create(&name, &stored)
            .await
            .map_err(self.repo_err(Operation::Create))?;

        let hash = ContentHash::compute(stored.as_bytes());
        tracing::info!(namespace = %self.namespace, name = %name, hash = %hash.short(), "artifact created");
        Ok(hash)
    }

    /// Replace the content of an existing artifact; the name never changes
    ///
    /// # Errors
    /// [`StoreError::NotFound`] before any validation, then
    /// [`StoreError::Validation`] or [`StoreError::Io`]
    pub async fn update(
        &self,
        raw_name: &str,
        content: impl Into<ContentInput>,
    ) -> Result<ContentHash, StoreError> {
        let name = ArtifactName::parse(raw_name)?;

        let _guard = self.locks.lock(name.as_str()).await;
        let exists = self
            .repo
            .exists(&name)
            .await
            .map_err(self.repo_err(Operation::Update))?;
        if !exists {
            return Err(StoreError::NotFound(self.namespace));
        }

        let stored = self.prepare(content.into())?;
        self.repo
            .replace(&name, &stored)
            .await
            .map_err(self.repo_err(Operation::Update))?;

        let hash = ContentHash::compute(stored.as_bytes());
        tracing::info!(namespace = %self.namespace, name = %name, hash = %hash.short(), "artifact updated");
        Ok(hash)
    }

    /// Delete an artifact
    ///
    /// # Errors
    /// [`StoreError::NotFound`] if absent, [`StoreError::Io`] otherwise
    pub async fn delete(&self, raw_name: &str) -> Result<(), StoreError> {
        let name = ArtifactName::parse(raw_name)?;

        let _guard = self.locks.lock(name.as_str()).await;
        self.repo
            .remove(&name)
            .await
            .map_err(self.repo_err(Operation::Delete))?;

        tracing::info!(namespace = %self.namespace, name = %name, "artifact deleted");
        Ok(())
    }
}
