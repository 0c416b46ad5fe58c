//! Repository abstraction over one namespace directory
//!
//! The store never touches the filesystem directly: every read and write
//! goes through an [`ArtifactRepository`], built once at startup.

use async_trait::async_trait;
use ixp_artifact::ArtifactName;
use parking_lot::Mutex;

use crate::error::RepositoryError;

/// Named blob storage with create-if-absent semantics
///
/// Implementations hold one flat collection of files. Names are already
/// checked by the caller and never contain path separators.
#[async_trait]
pub trait ArtifactRepository: Send + Sync + 'static {
    /// Names of all stored artifacts, in enumeration order
    async fn names(&self) -> Result<Vec<String>, RepositoryError>;

    /// Full content of one artifact
    ///
    /// # Errors
    /// [`RepositoryError::NotFound`] if absent
    async fn read(&self, name: &ArtifactName) -> Result<String, RepositoryError>;

    /// Whether an artifact with this name exists
    async fn exists(&self, name: &ArtifactName) -> Result<bool, RepositoryError>;

    /// Store a new artifact; atomic with respect to the existence check
    ///
    /// # Errors
    /// [`RepositoryError::AlreadyExists`] if the name is taken
    async fn create(&self, name: &ArtifactName, content: &str) -> Result<(), RepositoryError>;

    /// Overwrite an existing artifact
    ///
    /// # Errors
    /// [`RepositoryError::NotFound`] if absent
    async fn replace(&self, name: &ArtifactName, content: &str) -> Result<(), RepositoryError>;

    /// Delete an artifact
    ///
    /// # Errors
    /// [`RepositoryError::NotFound`] if absent
    async fn remove(&self, name: &ArtifactName) -> Result<(), RepositoryError>;

    /// Human-readable location for logs
    fn location(&self) -> String;
}

/// In-memory repository
///
/// Keeps insertion order, so listings behave like a directory that never
/// reorders entries.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    entries: Mutex<Vec<(String, String)>>,
}

impl MemoryRepository {
    /// Create empty repository
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an entry regardless of namespace rules
    pub fn insert_raw(&self, name: impl Into<String>, content: impl Into<String>) {
        let name = name.into();
        let content = content.into();
        let mut guard = self.entries.lock();
        match guard.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = content,
            None => guard.push((name, content)),
        }
    }

    /// Number of stored entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether nothing is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[async_trait]
impl ArtifactRepository for MemoryRepository {
    async fn names(&self) -> Result<Vec<String>, RepositoryError> {
        Ok(self.entries.lock().iter().map(|(n, _)| n.clone()).collect())
    }

    async fn read(&self, name: &ArtifactName) -> Result<String, RepositoryError> {
        self.entries
            .lock()
            .iter()
            .find(|(n, _)| n == name.as_str())
            .map(|(_, c)| c.clone())
            .ok_or_else(|| RepositoryError::NotFound(name.to_string()))
    }

    async fn exists(&self, name: &ArtifactName) -> Result<bool, RepositoryError> {
        Ok(self.entries.lock().iter().any(|(n, _)| n == name.as_str()))
    }

    async fn create(&self, name: &ArtifactName, content: &str) -> Result<(), RepositoryError> {
        let mut guard = self.entries.lock();
        if guard.iter().any(|(n, _)| n == name.as_str()) {
            return Err(RepositoryError::AlreadyExists(name.to_string()));
        }
        guard.push((name.to_string(), content.to_string()));
        Ok(())
    }

    async fn replace(&self, name: &ArtifactName, content: &str) -> Result<(), RepositoryError> {
        let mut guard = self.entries.lock();
        let slot = guard
            .iter_mut()
            .find(|(n, _)| n == name.as_str())
            .ok_or_else(|| RepositoryError::NotFound(name.to_string()))?;
        slot.1 = content.to_string();
        Ok(())
    }

    async fn remove(&self, name: &ArtifactName) -> Result<(), RepositoryError> {
        let mut guard = self.entries.lock();
        let idx = guard
            .iter()
            .position(|(n, _)| n == name.as_str())
            .ok_or_else(|| RepositoryError::NotFound(name.to_string()))?;
        guard.remove(idx);
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(raw: &str) -> ArtifactName {
        ArtifactName::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn memory_create_conflicts() {
        let repo = MemoryRepository::new();
        repo.create(&name("a.conf"), "{}").await.unwrap();
        let err = repo.create(&name("a.conf"), "{}").await.unwrap_err();
        assert!(matches!(err, RepositoryError::AlreadyExists(_)));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn memory_keeps_insertion_order() {
        let repo = MemoryRepository::new();
        for n in ["z.json", "a.json", "m.dump"] {
            repo.create(&name(n), "").await.unwrap();
        }
        assert_eq!(repo.names().await.unwrap(), vec!["z.json", "a.json", "m.dump"]);
    }

    #[tokio::test]
    async fn memory_replace_and_remove_require_existing() {
        let repo = MemoryRepository::new();
        assert!(matches!(
            repo.replace(&name("a.json"), "x").await,
            Err(RepositoryError::NotFound(_))
        ));
        assert!(matches!(
            repo.remove(&name("a.json")).await,
            Err(RepositoryError::NotFound(_))
        ));

        repo.insert_raw("a.json", "old");
        repo.replace(&name("a.json"), "new").await.unwrap();
        assert_eq!(repo.read(&name("a.json")).await.unwrap(), "new");

        repo.remove(&name("a.json")).await.unwrap();
        assert!(repo.is_empty());
        assert!(!repo.exists(&name("a.json")).await.unwrap());
    }
}
