//! Artifact file names
//!
//! Provides [`ArtifactName`], the identity of an artifact inside a namespace
//! directory. A name is a single path component: it can never address a
//! file outside the directory it belongs to.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// File name of an artifact within its namespace
///
/// # Examples
/// - `ixp.conf` (config)
/// - `rib_v4.dump` (resource)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArtifactName(String);

impl ArtifactName {
    /// Parse and check a raw file name
    ///
    /// # Errors
    /// - [`NameError::Empty`] for an empty name
    /// - [`NameError::InvalidName`] for names with separators, NUL bytes or
    ///   dot segments
    pub fn parse(raw: impl Into<String>) -> Result<Self, NameError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(NameError::Empty);
        }
        if raw == "." || raw == ".." || raw.contains(['/', '\\', '\0']) {
            return Err(NameError::InvalidName(raw));
        }
        Ok(Self(raw))
    }

    /// Name as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extension without the dot, if any
    ///
    /// A leading dot does not start an extension (`.conf` has none).
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        match self.0.rfind('.') {
            Some(0) | None => None,
            Some(idx) => Some(&self.0[idx + 1..]),
        }
    }

    /// Consume into the owned string
    #[inline]
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Display for ArtifactName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ArtifactName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ArtifactName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Errors related to artifact names
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    /// Name missing or empty
    #[error("file name is required")]
    Empty,

    /// Name escapes the namespace directory
    #[error("invalid file name: {0}")]
    InvalidName(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_parse_valid() {
        let name = ArtifactName::parse("ixp.conf").unwrap();
        assert_eq!(name.as_str(), "ixp.conf");
        assert_eq!(name.to_string(), "ixp.conf");
    }

    #[test]
    fn name_parse_empty() {
        assert_eq!(ArtifactName::parse(""), Err(NameError::Empty));
    }

    #[test]
    fn name_rejects_traversal() {
        for raw in ["..", ".", "../ixp.conf", "a/b.conf", "a\\b.conf", "a\0.conf"] {
            assert!(
                matches!(ArtifactName::parse(raw), Err(NameError::InvalidName(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn name_extension() {
        let ext = |raw: &str| ArtifactName::parse(raw).unwrap().extension().map(str::to_owned);
        assert_eq!(ext("rib.dump"), Some("dump".into()));
        assert_eq!(ext("a.b.JSON"), Some("JSON".into()));
        assert_eq!(ext("noext"), None);
        assert_eq!(ext(".conf"), None);
        assert_eq!(ext("trailing."), Some(String::new()));
    }

    #[test]
    fn name_from_str() {
        let name: ArtifactName = "peers.json".parse().unwrap();
        assert_eq!(name.into_string(), "peers.json");
    }
}
