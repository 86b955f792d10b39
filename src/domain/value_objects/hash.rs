//! Content Hash Value Object
//!
//! SHA-256 digest of a file's bytes, used by the watch loop to tell a real
//! edit from an editor rewriting identical content.

use std::fmt;
use std::path::Path;

use sha2::{Digest, Sha256};

/// Content hash value object, always carrying the `sha256:` prefix
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash(String);

impl ContentHash {
    pub const PREFIX: &'static str = "sha256:";

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(format!("{}{:x}", Self::PREFIX, Sha256::digest(bytes)))
    }

    pub fn from_content(content: &str) -> Self {
        Self::from_bytes(content.as_bytes())
    }

    /// Hash a file on disk; `None` when it cannot be read (deleted mid-event)
    pub fn of_file(path: &Path) -> Option<Self> {
        std::fs::read(path).ok().map(|b| Self::from_bytes(&b))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hex digest without prefix
    pub fn hex(&self) -> &str {
        self.0.strip_prefix(Self::PREFIX).unwrap_or(&self.0)
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_content_computes_sha256() {
        let hash = ContentHash::from_content("hello");
        assert!(hash.as_str().starts_with("sha256:"));
        assert_eq!(hash.hex().len(), 64);
        assert_eq!(
            hash.hex(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn same_bytes_same_hash() {
        assert_eq!(
            ContentHash::from_bytes(b"proc add"),
            ContentHash::from_content("proc add")
        );
        assert_ne!(
            ContentHash::from_content("a"),
            ContentHash::from_content("b")
        );
    }

    #[test]
    fn of_file_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ContentHash::of_file(&dir.path().join("gone.nim")).is_none());
    }
}
