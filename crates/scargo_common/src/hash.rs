//! Content hashing for change detection and state-file naming.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// A 128-bit content hash computed using XXH3.
///
/// Two inputs with the same `ContentHash` are assumed to be identical. Used
/// to detect changed source files between builds and to derive stable names
/// for per-source-root state files.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash([u8; 16]);

impl ContentHash {
    /// Computes a content hash from a byte slice using XXH3-128.
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = xxhash_rust::xxh3::xxh3_128(data);
        Self(hash.to_le_bytes())
    }

    /// Computes the content hash of a file's bytes.
    pub fn from_file(path: &Path) -> io::Result<Self> {
        let content = std::fs::read(path)?;
        Ok(Self::from_bytes(&content))
    }

    /// Computes a hash over an ordered list of paths.
    ///
    /// The paths are hashed in the order given; callers that need a stable
    /// hash across invocations must pass an already-sorted list.
    pub fn of_paths(paths: &[PathBuf]) -> Self {
        let mut buf = Vec::new();
        for path in paths {
            buf.extend_from_slice(path.to_string_lossy().as_bytes());
            buf.push(0);
        }
        Self::from_bytes(&buf)
    }

    /// Returns the first eight hex characters of the hash.
    ///
    /// Short enough to embed in a state-file name while still making
    /// collisions between distinct source-root sets unlikely.
    pub fn short(&self) -> String {
        self.0[..4].iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}
