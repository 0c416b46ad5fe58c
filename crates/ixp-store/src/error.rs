//! Error types for the artifact store
//!
//! Provides error handling for:
//! - Repository operations (directory I/O, identity collisions)
//! - Namespace policy (names, extensions, validation)

use std::path::PathBuf;

use ixp_artifact::{NameError, Namespace, ValidationError};

/// Store operation, used to pick the public message of an I/O failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Read,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Verb used in messages
    #[inline]
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::List => "load",
            Self::Read => "read",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// Errors raised by an [`ArtifactRepository`](crate::ArtifactRepository)
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Create target already present
    #[error("artifact already exists: {0}")]
    AlreadyExists(String),

    /// Target absent
    #[error("artifact not found: {0}")]
    NotFound(String),

    /// Underlying I/O failure
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RepositoryError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Store error taxonomy
///
/// `Display` is the text sent to clients for every variant except
/// [`StoreError::Io`], whose details stay in the server log; use
/// [`StoreError::public_message`] when building responses.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Name absent or empty
    #[error("file name is required")]
    MissingName,

    /// Name would escape the namespace directory
    #[error("invalid file name: {0}")]
    InvalidName(String),

    /// Extension not whitelisted for the namespace
    #[error("{}", .0.extension_hint())]
    InvalidExtension(Namespace),

    /// Config content rejected by the validation engine
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Name collision on create
    #[error("file already exists")]
    AlreadyExists,

    /// Update/delete/read target absent
    #[error("{} not found", .0.noun())]
    NotFound(Namespace),

    /// Unexpected filesystem failure
    #[error("failed to {} in {namespace}: {source}", .operation.verb())]
    Io {
        namespace: Namespace,
        operation: Operation,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Convert a repository error in the context of one operation
    #[must_use]
    pub fn from_repository(err: RepositoryError, namespace: Namespace, operation: Operation) -> Self {
        match err {
            RepositoryError::AlreadyExists(_) => Self::AlreadyExists,
            RepositoryError::NotFound(_) => Self::NotFound(namespace),
            RepositoryError::Io { source, .. } => Self::Io {
                namespace,
                operation,
                source,
            },
        }
    }

    /// HTTP status this error maps to
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingName
            | Self::InvalidName(_)
            | Self::InvalidExtension(_)
            | Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::AlreadyExists => 409,
            Self::Io { .. } => 500,
        }
    }

    /// Whether the caller is at fault
    #[inline]
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Io { .. })
    }

    /// Message safe to return to a client
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Io {
                namespace,
                operation: Operation::List,
                ..
            } => format!("failed to load {}", namespace.route()),
            Self::Io {
                namespace,
                operation,
                ..
            } => format!("failed to {} {}", operation.verb(), namespace.noun()),
            other => other.to_string(),
        }
    }
}

impl From<NameError> for StoreError {
    fn from(err: NameError) -> Self {
        match err {
            NameError::Empty => Self::MissingName,
            NameError::InvalidName(name) => Self::InvalidName(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn io_err() -> io::Error {
        io::Error::new(io::ErrorKind::PermissionDenied, "/srv/ixpconfigs/a.conf: denied")
    }

    #[test]
    fn status_codes() {
        assert_eq!(StoreError::MissingName.status_code(), 400);
        assert_eq!(StoreError::InvalidExtension(Namespace::Configs).status_code(), 400);
        assert_eq!(
            StoreError::Validation(ValidationError::InvalidPeeringLan).status_code(),
            400
        );
        assert_eq!(StoreError::AlreadyExists.status_code(), 409);
        assert_eq!(StoreError::NotFound(Namespace::Resources).status_code(), 404);
        let io = StoreError::Io {
            namespace: Namespace::Configs,
            operation: Operation::Create,
            source: io_err(),
        };
        assert_eq!(io.status_code(), 500);
        assert!(!io.is_client_error());
    }

    #[test]
    fn public_messages() {
        assert_eq!(
            StoreError::InvalidExtension(Namespace::Configs).public_message(),
            "config must have the .conf extension (e.g. ixp.conf)"
        );
        assert_eq!(StoreError::NotFound(Namespace::Configs).public_message(), "config not found");
        assert_eq!(
            StoreError::NotFound(Namespace::Resources).public_message(),
            "resource not found"
        );
        assert_eq!(
            StoreError::Validation(ValidationError::MissingFields(vec!["route_servers"]))
                .public_message(),
            "missing required fields: route_servers"
        );
    }

    #[test]
    fn io_details_not_leaked() {
        let list = StoreError::Io {
            namespace: Namespace::Configs,
            operation: Operation::List,
            source: io_err(),
        };
        assert_eq!(list.public_message(), "failed to load configs");
        assert!(list.to_string().contains("denied"));

        let delete = StoreError::Io {
            namespace: Namespace::Resources,
            operation: Operation::Delete,
            source: io_err(),
        };
        assert_eq!(delete.public_message(), "failed to delete resource");
    }

    #[test]
    fn repository_errors_convert() {
        let err = StoreError::from_repository(
            RepositoryError::NotFound("a.conf".into()),
            Namespace::Configs,
            Operation::Delete,
        );
        assert!(matches!(err, StoreError::NotFound(Namespace::Configs)));

        let err = StoreError::from_repository(
            RepositoryError::AlreadyExists("a.conf".into()),
            Namespace::Configs,
            Operation::Create,
        );
        assert!(matches!(err, StoreError::AlreadyExists));
    }

    #[test]
    fn name_errors_convert() {
        assert!(matches!(StoreError::from(NameError::Empty), StoreError::MissingName));
        assert!(matches!(
            StoreError::from(NameError::InvalidName("../x".into())),
            StoreError::InvalidName(_)
        ));
    }
}
