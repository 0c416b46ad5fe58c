//! Artifact namespaces
//!
//! The store keeps two disjoint collections, each backed by its own
//! directory and extension whitelist.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::name::ArtifactName;

/// Extensions accepted in the resources namespace (compared lower-cased)
pub const RESOURCE_EXTENSIONS: &[&str] = &["json", "dump", "conf"];

/// Suffix every config artifact must carry
pub const CONFIG_SUFFIX: &str = ".conf";

/// One of the two artifact collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    /// Validated IXP scenario documents (`*.conf`)
    Configs,
    /// Opaque auxiliary blobs (`*.json`, `*.dump`, `*.conf`)
    Resources,
}

impl Namespace {
    /// Both namespaces, configs first
    pub const ALL: [Namespace; 2] = [Namespace::Configs, Namespace::Resources];

    /// Kind tag reported in listings
    #[inline]
    #[must_use]
    pub const fn kind(self) -> &'static str {
        match self {
            Self::Configs => "config",
            Self::Resources => "resource",
        }
    }

    /// Collection path segment (`/configs`, `/resources`)
    #[inline]
    #[must_use]
    pub const fn route(self) -> &'static str {
        match self {
            Self::Configs => "configs",
            Self::Resources => "resources",
        }
    }

    /// Whether content in this namespace goes through the validation engine
    #[inline]
    #[must_use]
    pub const fn is_validated(self) -> bool {
        matches!(self, Self::Configs)
    }

    /// Check a file name against the namespace whitelist
    ///
    /// Configs use a case-sensitive `.conf` suffix match; resources compare
    /// the lower-cased extension.
    #[must_use]
    pub fn accepts(self, name: &ArtifactName) -> bool {
        match self {
            Self::Configs => name.as_str().ends_with(CONFIG_SUFFIX),
            Self::Resources => name.extension().is_some_and(|ext| {
                let ext = ext.to_ascii_lowercase();
                RESOURCE_EXTENSIONS.contains(&ext.as_str())
            }),
        }
    }

    /// Message returned when [`Namespace::accepts`] fails
    #[inline]
    #[must_use]
    pub const fn extension_hint(self) -> &'static str {
        match self {
            Self::Configs => "config must have the .conf extension (e.g. ixp.conf)",
            Self::Resources => "invalid extension, use .json, .dump or .conf",
        }
    }

    /// Singular noun used in messages
    #[inline]
    #[must_use]
    pub const fn noun(self) -> &'static str {
        match self {
            Self::Configs => "config",
            Self::Resources => "resource",
        }
    }
}

impl Display for Namespace {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.route())
    }
}
