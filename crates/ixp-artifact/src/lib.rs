//! IXP Artifact Model
//!
//! Names, namespaces and the validation engine for the artifacts curated
//! for the IXP Digital Twin lab.
//!
//! # Core Concepts
//!
//! - [`ArtifactName`]: File name identity within a namespace
//! - [`Namespace`]: The two disjoint collections (configs, resources)
//! - [`ConfigValidator`]: Shallow validation of IXP scenario documents
//! - [`ParsedConfig`]: Validated document with its canonical serialization
//! - [`ContentHash`]: Blake3 hash of stored bytes
//!
//! # Example
//!
//! ```rust
//! use ixp_artifact::{validate, ValidationError};
//!
//! let parsed = validate(r#"{"scenario_name":"a","peering_lan":{},"route_servers":{}}"#)?;
//! assert!(parsed.canonical().starts_with("{\n    \"scenario_name\""));
//!
//! let err = validate(r#"{"peering_lan":{}}"#).unwrap_err();
//! assert_eq!(err.to_string(), "missing required fields: scenario_name, route_servers");
//! # Ok::<(), ValidationError>(())
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod hash;
mod name;
mod namespace;
pub mod types;
pub mod validation;

pub use hash::ContentHash;
pub use name::{ArtifactName, NameError};
pub use namespace::{Namespace, CONFIG_SUFFIX, RESOURCE_EXTENSIONS};
pub use types::{IxpConfig, RouteServerEntry};
pub use validation::{validate, ConfigValidator, ParsedConfig, ValidationError, REQUIRED_FIELDS};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
