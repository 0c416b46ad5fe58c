//! Validation engine for IXP config documents
//!
//! Turns raw request text into a [`ParsedConfig`] or a single
//! human-readable [`ValidationError`]. Checks are shallow on purpose: the
//! three required keys must exist and the two container fields must be
//! JSON objects. Nested fields are left to the orchestrator.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

use crate::hash::ContentHash;
use crate::types::IxpConfig;

/// Required top-level keys, in reporting order
pub const REQUIRED_FIELDS: [&str; 3] = ["scenario_name", "peering_lan", "route_servers"];

/// Indentation of the stored canonical form
const CANONICAL_INDENT: &[u8] = b"    ";

/// Config validation errors
///
/// The `Display` output is the exact text returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Input is not JSON, or is JSON `null`
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// One or more required keys absent
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// `peering_lan` present but not an object
    #[error("peering_lan must be an object")]
    InvalidPeeringLan,

    /// `route_servers` present but not an object
    #[error("route_servers must be an object")]
    InvalidRouteServers,
}

/// Validated config document
///
/// Holds the parsed object unmodified; key order is the order of the input.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedConfig {
    value: Map<String, Value>,
    canonical: String,
}

impl ParsedConfig {
    /// Parsed top-level object
    #[inline]
    #[must_use]
    pub fn as_object(&self) -> &Map<String, Value> {
        &self.value
    }

    /// `scenario_name` as a string, if it is one
    #[inline]
    #[must_use]
    pub fn scenario_name(&self) -> Option<&str> {
        self.value.get("scenario_name").and_then(Value::as_str)
    }

    /// Convert into a plain JSON value
    #[inline]
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.value)
    }

    /// Canonical stored form: pretty JSON with 4-space indentation
    #[inline]
    #[must_use]
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Take the canonical form, dropping the parsed object
    #[inline]
    #[must_use]
    pub fn into_canonical(self) -> String {
        self.canonical
    }

    /// Hash of the canonical form
    #[inline]
    #[must_use]
    pub fn canonical_hash(&self) -> ContentHash {
        ContentHash::compute(self.canonical.as_bytes())
    }

    /// Lenient typed projection
    ///
    /// # Errors
    /// Returns the serde error when nested fields do not fit [`IxpConfig`];
    /// such documents are still valid for storage.
    pub fn to_typed(&self) -> Result<IxpConfig, serde_json::Error> {
        serde_json::from_value(Value::Object(self.value.clone()))
    }
}

/// Config validator
///
/// `allow_array_containers` keeps the compatibility behaviour where an
/// array is accepted for `peering_lan` / `route_servers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigValidator {
    allow_array_containers: bool,
}

impl ConfigValidator {
    /// Validator with compatibility defaults (arrays accepted)
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            allow_array_containers: true,
        }
    }

    /// Validator that rejects arrays for the container fields
    #[inline]
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            allow_array_containers: false,
        }
    }

    /// Set array acceptance
    #[inline]
    #[must_use]
    pub const fn with_array_containers(mut self, allow: bool) -> Self {
        self.allow_array_containers = allow;
        self
    }

    /// Whether arrays count as objects
    #[inline]
    #[must_use]
    pub const fn allows_array_containers(&self) -> bool {
        self.allow_array_containers
    }

    /// Validate raw text
    ///
    /// # Errors
    /// - [`ValidationError::InvalidJson`] on parse failure or a `null` document
    /// - [`ValidationError::MissingFields`] listing every absent required key
    /// - [`ValidationError::InvalidPeeringLan`] / [`ValidationError::InvalidRouteServers`]
    ///   when a container field is not an object
    pub fn validate(&self, raw: &str) -> Result<ParsedConfig, ValidationError> {
        let parsed: Value =
            serde_json::from_str(raw).map_err(|e| ValidationError::InvalidJson(e.to_string()))?;

        let object = match parsed {
            Value::Object(map) => map,
            Value::Null => {
                return Err(ValidationError::InvalidJson(
                    "document is null".to_string(),
                ))
            }
            // Scalars and arrays carry none of the required keys.
            _ => return Err(ValidationError::MissingFields(REQUIRED_FIELDS.to_vec())),
        };

        let missing: Vec<&'static str> = REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|field| !object.contains_key(*field))
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        if !self.is_container(&object["peering_lan"]) {
            return Err(ValidationError::InvalidPeeringLan);
        }
        if !self.is_container(&object["route_servers"]) {
            return Err(ValidationError::InvalidRouteServers);
        }

        let canonical =
            render_canonical(&object).map_err(|e| ValidationError::InvalidJson(e.to_string()))?;
        Ok(ParsedConfig {
            value: object,
            canonical,
        })
    }

    fn is_container(&self, value: &Value) -> bool {
        match value {
            Value::Object(_) => true,
            Value::Array(_) => self.allow_array_containers,
            _ => false,
        }
    }
}

fn render_canonical(value: &Map<String, Value>) -> Result<String, serde_json::Error> {
    let mut buf = Vec::with_capacity(256);
    let mut ser =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(CANONICAL_INDENT));
    value.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate with compatibility defaults
///
/// # Errors
/// See [`ConfigValidator::validate`]
#[inline]
pub fn validate(raw: &str) -> Result<ParsedConfig, ValidationError> {
    ConfigValidator::new().validate(raw)
}
