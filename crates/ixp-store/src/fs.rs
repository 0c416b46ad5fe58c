//! Directory-backed repository
//!
//! One flat directory per namespace. Creation uses `create_new` so the
//! existence check and the write are a single filesystem operation;
//! replacement writes a sibling temp file and renames it over the target.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use ixp_artifact::ArtifactName;
use tokio::io::AsyncWriteExt;

use crate::error::RepositoryError;
use crate::repository::ArtifactRepository;

/// Repository over one directory
#[derive(Debug, Clone)]
pub struct FsRepository {
    root: PathBuf,
}

impl FsRepository {
    /// Open a directory, creating it if missing
    ///
    /// # Errors
    /// Returns [`RepositoryError::Io`] if the directory cannot be created
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| RepositoryError::io_error(&root, e))?;
        tracing::debug!(root = %root.display(), "artifact directory ready");
        Ok(Self { root })
    }

    /// Directory this repository manages
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[inline]
    fn path_of(&self, name: &ArtifactName) -> PathBuf {
        self.root.join(name.as_str())
    }

    fn map_err(path: &Path, name: &ArtifactName, err: std::io::Error) -> RepositoryError {
        match err.kind() {
            ErrorKind::NotFound => RepositoryError::NotFound(name.to_string()),
            ErrorKind::AlreadyExists => RepositoryError::AlreadyExists(name.to_string()),
            _ => RepositoryError::io_error(path, err),
        }
    }
}

#[async_trait]
impl ArtifactRepository for FsRepository {
    async fn names(&self) -> Result<Vec<String>, RepositoryError> {
        let mut dir = tokio::fs::read_dir(&self.root)
            .await
            .map_err(|e| RepositoryError::io_error(&self.root, e))?;

        let mut names = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| RepositoryError::io_error(&self.root, e))?
        {
            // Follows symlinks; vanished entries and directories are skipped.
            let is_file = tokio::fs::metadata(entry.path())
                .await
                .map(|m| m.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => {
                    tracing::warn!(name = ?raw, root = %self.root.display(), "skipping non UTF-8 file name");
                }
            }
        }
        Ok(names)
    }

    async fn read(&self, name: &ArtifactName) -> Result<String, RepositoryError> {
        let path = self.path_of(name);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| Self::map_err(&path, name, e))?;
        Ok(String::from_utf8(bytes)
            .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned()))
    }

    async fn exists(&self, name: &ArtifactName) -> Result<bool, RepositoryError> {
        let path = self.path_of(name);
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| RepositoryError::io_error(&path, e))
    }

    async fn create(&self, name: &ArtifactName, content: &str) -> Result<(), RepositoryError> {
        let path = self.path_of(name);
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| Self::map_err(&path, name, e))?;

        let written = async {
            file.write_all(content.as_bytes()).await?;
            file.flush().await
        }
        .await;

        if let Err(e) = written {
            drop(file);
            if let Err(cleanup) = tokio::fs::remove_file(&path).await {
                tracing::warn!(path = %path.display(), error = %cleanup, "failed to remove partial file");
            }
            return Err(RepositoryError::io_error(&path, e));
        }
        Ok(())
    }

    async fn replace(&self, name: &ArtifactName, content: &str) -> Result<(), RepositoryError> {
        let path = self.path_of(name);
        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| Self::map_err(&path, name, e))?;

        let root = self.root.clone();
        let target = path.clone();
        let bytes = content.as_bytes().to_vec();
        let persisted = tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            let mut tmp = tempfile::NamedTempFile::new_in(&root)?;
            tmp.write_all(&bytes)?;
            tmp.as_file().sync_all()?;
            std::fs::set_permissions(tmp.path(), metadata.permissions())?;
            tmp.persist(&target).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|join| RepositoryError::io_error(&path, std::io::Error::other(join)))?;

        persisted.map_err(|e| RepositoryError::io_error(&path, e))
    }

    async fn remove(&self, name: &ArtifactName) -> Result<(), RepositoryError> {
        let path = self.path_of(name);
        tokio::fs::remove_file(&path)
            .await
            .map_err(|e| Self::map_err(&path, name, e))
    }

    fn location(&self) -> String {
        self.root.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn name(raw: &str) -> ArtifactName {
        ArtifactName::parse(raw).unwrap()
    }

    async fn repo() -> (tempfile::TempDir, FsRepository) {
        let dir = tempfile::tempdir().unwrap();
        let repo = FsRepository::open(dir.path().join("ixpconfigs")).await.unwrap();
        (dir, repo)
    }

    #[tokio::test]
    async fn open_creates_missing_directory() {
        let (dir, repo) = repo().await;
        assert!(repo.root().is_dir());
        assert_eq!(repo.root(), dir.path().join("ixpconfigs"));
    }

    #[tokio::test]
    async fn create_then_read() {
        let (_dir, repo) = repo().await;
        repo.create(&name("a.conf"), "{}").await.unwrap();
        assert_eq!(repo.read(&name("a.conf")).await.unwrap(), "{}");
        assert!(repo.exists(&name("a.conf")).await.unwrap());
    }

    #[tokio::test]
    async fn create_is_exclusive() {
        let (_dir, repo) = repo().await;
        repo.create(&name("a.conf"), "first").await.unwrap();
        let err = repo.create(&name("a.conf"), "second").await.unwrap_err();
        assert!(matches!(err, RepositoryError::AlreadyExists(_)));
        assert_eq!(repo.read(&name("a.conf")).await.unwrap(), "first");
    }

    #[tokio::test]
    async fn replace_overwrites_and_leaves_no_temp_files() {
        let (_dir, repo) = repo().await;
        repo.create(&name("a.conf"), "old").await.unwrap();
        repo.replace(&name("a.conf"), "new").await.unwrap();
        assert_eq!(repo.read(&name("a.conf")).await.unwrap(), "new");
        assert_eq!(repo.names().await.unwrap(), vec!["a.conf".to_string()]);
    }

    #[tokio::test]
    async fn replace_missing_is_not_found() {
        let (_dir, repo) = repo().await;
        let err = repo.replace(&name("ghost.conf"), "x").await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
        assert!(!repo.exists(&name("ghost.conf")).await.unwrap());
    }

    #[tokio::test]
    async fn remove_twice_is_not_found() {
        let (_dir, repo) = repo().await;
        repo.create(&name("a.conf"), "{}").await.unwrap();
        repo.remove(&name("a.conf")).await.unwrap();
        let err = repo.remove(&name("a.conf")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }

    #[tokio::test]
    async fn names_skip_directories() {
        let (_dir, repo) = repo().await;
        repo.create(&name("a.conf"), "{}").await.unwrap();
        repo.create(&name("b.json"), "[]").await.unwrap();
        tokio::fs::create_dir(repo.root().join("nested.conf")).await.unwrap();

        let names: BTreeSet<_> = repo.names().await.unwrap().into_iter().collect();
        assert_eq!(names, BTreeSet::from(["a.conf".to_string(), "b.json".to_string()]));
    }

    #[tokio::test]
    async fn read_invalid_utf8_is_lossy() {
        let (_dir, repo) = repo().await;
        tokio::fs::write(repo.root().join("bin.dump"), [0x66, 0xff, 0x6f])
            .await
            .unwrap();
        assert_eq!(repo.read(&name("bin.dump")).await.unwrap(), "f\u{fffd}o");
    }
}
