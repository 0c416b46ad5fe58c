//! Content hashing
//!
//! [`ContentHash`] is the Blake3 hash of the bytes stored for an artifact.

use std::fmt::{self, Display, Formatter};

/// A 32-byte content hash (Blake3)
///
/// Computed over the exact bytes written to disk, so two artifacts with the
/// same hash are byte-identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Compute Blake3 hash of arbitrary data
    #[inline]
    #[must_use]
    pub fn compute(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// First 16 hex chars, for logs
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }

    /// Quoted strong entity tag for HTTP `ETag` headers
    #[inline]
    #[must_use]
    pub fn etag(&self) -> String {
        format!("\"{self}\"")
    }
}

impl Display for ContentHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_hash_compute_deterministic() {
        let h1 = ContentHash::compute(b"{\"scenario_name\": \"a\"}");
        let h2 = ContentHash::compute(b"{\"scenario_name\": \"a\"}");
        assert_eq!(h1, h2);
        assert_ne!(h1, ContentHash::compute(b"{}"));
    }

    #[test]
    fn content_hash_display_is_lowercase_hex() {
        let hash = ContentHash::compute(b"rib dump");
        let text = hash.to_string();
        assert_eq!(text.len(), 64);
        assert!(text.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(text, blake3::hash(b"rib dump").to_hex().as_str());
    }

    #[test]
    fn content_hash_short_is_prefix() {
        let hash = ContentHash::compute(b"test");
        let short = hash.short();
        assert_eq!(short.len(), 16);
        assert!(hash.to_string().starts_with(&short));
    }

    #[test]
    fn content_hash_etag_is_quoted() {
        let hash = ContentHash::compute(b"test");
        let etag = hash.etag();
        assert!(etag.starts_with('"') && etag.ends_with('"'));
        assert_eq!(etag.len(), 66);
    }
}
