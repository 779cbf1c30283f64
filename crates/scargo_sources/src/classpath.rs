//! Ordered, deduplicated classpath assembly.
//!
//! Classpaths are built once through [`ClasspathBuilder`] and frozen into a
//! [`Classpath`] value before being handed to the invoker, so nothing can
//! mutate the path list between command construction and execution.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Platform classpath separator.
#[cfg(windows)]
const SEPARATOR: &str = ";";
#[cfg(not(windows))]
const SEPARATOR: &str = ":";

/// Accumulates classpath entries, deduplicating while preserving
/// first-seen order.
#[derive(Debug, Default)]
pub struct ClasspathBuilder {
    entries: Vec<PathBuf>,
    seen: HashSet<PathBuf>,
}

impl ClasspathBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one entry; duplicates are ignored.
    pub fn add(mut self, entry: impl Into<PathBuf>) -> Self {
        let entry = entry.into();
        if self.seen.insert(entry.clone()) {
            self.entries.push(entry);
        }
        self
    }

    /// Appends every entry in order.
    pub fn add_all<I, P>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        for entry in entries {
            self = self.add(entry);
        }
        self
    }

    /// Freezes the accumulated entries into an immutable [`Classpath`].
    pub fn build(self) -> Classpath {
        Classpath {
            entries: self.entries,
        }
    }
}

/// A finalized, ordered classpath.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classpath {
    entries: Vec<PathBuf>,
}

impl Classpath {
    /// Returns the ordered entries.
    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    /// Returns `true` if no entries were added.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Joins the entries with the platform separator for `-classpath`.
    pub fn to_search_path(&self) -> String {
        self.entries
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(SEPARATOR)
    }

    /// Returns a copy with `entry` prepended if not already present.
    ///
    /// Used to put the output directory itself on the compile classpath,
    /// which mixed Java/Scala compiles require.
    pub fn with_leading(&self, entry: &Path) -> Classpath {
        ClasspathBuilder::new()
            .add(entry)
            .add_all(self.entries.iter().cloned())
            .build()
    }
}
