//! Persisted per-file dependency analysis.
//!
//! The analysis file records, for every source file of the previous
//! successful compile, its content hash, its source-to-source dependency
//! edges, and the class names it produced. The bridge driver is the only
//! owner; everything else treats the file as an opaque blob identified by
//! path. All reads are fail-safe: corruption, version skew, or a bad
//! checksum yields an empty analysis, which costs a full recompile but never
//! correctness.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use scargo_common::ContentHash;
use serde::{Deserialize, Serialize};

use crate::driver::SourceAnalysis;
use crate::error::DriverError;

/// Magic bytes identifying a scargo analysis file.
const ANALYSIS_MAGIC: [u8; 4] = *b"SCAN";

/// Current analysis format version. Increment on breaking changes to the
/// header or payload format.
const ANALYSIS_FORMAT_VERSION: u32 = 1;

/// Header prepended to the analysis payload for validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AnalysisHeader {
    magic: [u8; 4],
    format_version: u32,
    tool_version: String,
    checksum: ContentHash,
}

/// Analysis facts for a single source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileAnalysis {
    /// Content hash of the source when it was last compiled.
    pub content_hash: ContentHash,
    /// Source files this file depends on.
    pub dependencies: Vec<PathBuf>,
    /// Class names produced from this file.
    pub produced_classes: Vec<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct AnalysisData {
    files: HashMap<PathBuf, FileAnalysis>,
}

/// Result of comparing current source hashes against the stored analysis.
#[derive(Debug, Clone)]
pub struct ChangeSet {
    /// Files not present in the analysis.
    pub new_files: Vec<PathBuf>,
    /// Files whose content hash differs from the analysis.
    pub modified_files: Vec<PathBuf>,
    /// Files present in the analysis but not in the current set.
    pub deleted_files: Vec<PathBuf>,
    /// Files whose content hash matches the analysis.
    pub unchanged_files: Vec<PathBuf>,
}

impl ChangeSet {
    /// Returns `true` if nothing is new, modified, or deleted.
    pub fn is_empty(&self) -> bool {
        self.new_files.is_empty() && self.modified_files.is_empty() && self.deleted_files.is_empty()
    }

    /// Files that must be recompiled before considering dependents.
    pub fn dirty_count(&self) -> usize {
        self.new_files.len() + self.modified_files.len()
    }
}

/// The analysis store bound to one cache file path.
///
/// Main and test compiles use distinct paths so their state cannot corrupt
/// each other.
pub struct AnalysisStore {
    path: PathBuf,
    tool_version: String,
    data: AnalysisData,
}

impl AnalysisStore {
    /// Loads the analysis at `path`, or starts empty.
    ///
    /// Any problem reading or validating the file results in an empty
    /// analysis rather than an error.
    pub fn load_or_default(path: &Path, tool_version: &str) -> Self {
        let data = std::fs::read(path)
            .ok()
            .and_then(|raw| parse_analysis(&raw, tool_version))
            .unwrap_or_default();
        Self {
            path: path.to_path_buf(),
            tool_version: tool_version.to_string(),
            data,
        }
    }

    /// The cache file path this store is bound to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of files in the analysis.
    pub fn len(&self) -> usize {
        self.data.files.len()
    }

    /// Returns `true` if no file has been analyzed yet.
    pub fn is_empty(&self) -> bool {
        self.data.files.is_empty()
    }

    /// Looks up the analysis for one file.
    pub fn get(&self, file: &Path) -> Option<&FileAnalysis> {
        self.data.files.get(file)
    }

    /// Hashes the given files, silently skipping any that cannot be read.
    ///
    /// Unreadable files will show up as deleted in the change set.
    pub fn hash_files(paths: &[PathBuf]) -> HashMap<PathBuf, ContentHash> {
        let mut hashes = HashMap::with_capacity(paths.len());
        for path in paths {
            if let Ok(hash) = ContentHash::from_file(path) {
                hashes.insert(path.clone(), hash);
            }
        }
        hashes
    }

    /// Categorizes current hashes against the stored analysis.
    pub fn detect_changes(&self, current: &HashMap<PathBuf, ContentHash>) -> ChangeSet {
        let mut new_files = Vec::new();
        let mut modified_files = Vec::new();
        let mut unchanged_files = Vec::new();

        for (path, hash) in current {
            match self.data.files.get(path) {
                Some(fa) if fa.content_hash == *hash => unchanged_files.push(path.clone()),
                Some(_) => modified_files.push(path.clone()),
                None => new_files.push(path.clone()),
            }
        }

        let mut deleted_files: Vec<PathBuf> = self
            .data
            .files
            .keys()
            .filter(|p| !current.contains_key(*p))
            .cloned()
            .collect();

        new_files.sort();
        modified_files.sort();
        unchanged_files.sort();
        deleted_files.sort();

        ChangeSet {
            new_files,
            modified_files,
            deleted_files,
            unchanged_files,
        }
    }

    /// Computes the reverse-dependency closure of `dirty`.
    ///
    /// Returns every file whose recorded dependencies reach any dirty file
    /// transitively. The dirty files themselves are not included.
    pub fn affected_by(&self, dirty: &BTreeSet<PathBuf>) -> BTreeSet<PathBuf> {
        // Invert the recorded edges once, then walk a worklist.
        let mut dependents: HashMap<&Path, Vec<&Path>> = HashMap::new();
        for (file, fa) in &self.data.files {
            for dep in &fa.dependencies {
                dependents
                    .entry(dep.as_path())
                    .or_default()
                    .push(file.as_path());
            }
        }

        let mut affected = BTreeSet::new();
        let mut worklist: Vec<&Path> = dirty.iter().map(PathBuf::as_path).collect();
        while let Some(current) = worklist.pop() {
            if let Some(users) = dependents.get(current) {
                for user in users {
                    if !dirty.contains(*user) && affected.insert(user.to_path_buf()) {
                        worklist.push(user);
                    }
                }
            }
        }
        affected
    }

    /// Records the results of a compile.
    ///
    /// Each analyzed file gets its current content hash plus the reported
    /// dependency edges and produced classes. Files without a current hash
    /// (deleted mid-compile) are skipped.
    pub fn apply(
        &mut self,
        analysis: &[SourceAnalysis],
        current: &HashMap<PathBuf, ContentHash>,
    ) {
        for entry in analysis {
            let Some(hash) = current.get(&entry.file) else {
                continue;
            };
            self.data.files.insert(
                entry.file.clone(),
                FileAnalysis {
                    content_hash: *hash,
                    dependencies: entry.dependencies.clone(),
                    produced_classes: entry.produced_classes.clone(),
                },
            );
        }
    }

    /// Drops entries for files that no longer exist.
    pub fn remove(&mut self, deleted: &[PathBuf]) {
        for path in deleted {
            self.data.files.remove(path);
        }
    }

    /// Persists the analysis to its cache file.
    ///
    /// Creates parent directories as needed. Write failures propagate; they
    /// mean the next run will do a full recompile.
    pub fn save(&self) -> Result<(), DriverError> {
        let state_err = |source| DriverError::State {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(state_err)?;
        }

        let payload = bincode::serde::encode_to_vec(&self.data, bincode::config::standard())
            .map_err(|e| {
                state_err(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
            })?;

        let header = AnalysisHeader {
            magic: ANALYSIS_MAGIC,
            format_version: ANALYSIS_FORMAT_VERSION,
            tool_version: self.tool_version.clone(),
            checksum: ContentHash::from_bytes(&payload),
        };
        let header_bytes = bincode::serde::encode_to_vec(&header, bincode::config::standard())
            .map_err(|e| {
                state_err(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
            })?;

        // Layout: 4-byte header length (little-endian) + header + payload.
        let header_len = header_bytes.len() as u32;
        let mut output = Vec::with_capacity(4 + header_bytes.len() + payload.len());
        output.extend_from_slice(&header_len.to_le_bytes());
        output.extend_from_slice(&header_bytes);
        output.extend_from_slice(&payload);

        std::fs::write(&self.path, &output).map_err(state_err)
    }
}

/// Validates and decodes a raw analysis file. `None` on any mismatch.
fn parse_analysis(raw: &[u8], tool_version: &str) -> Option<AnalysisData> {
    if raw.len() < 4 {
        return None;
    }
    let header_len = u32::from_le_bytes(raw[..4].try_into().ok()?) as usize;
    if raw.len() < 4 + header_len {
        return None;
    }

    let header: AnalysisHeader =
        bincode::serde::decode_from_slice(&raw[4..4 + header_len], bincode::config::standard())
            .ok()?
            .0;

    if header.magic != ANALYSIS_MAGIC
        || header.format_version != ANALYSIS_FORMAT_VERSION
        || header.tool_version != tool_version
    {
        return None;
    }

    let payload = &raw[4 + header_len..];
    if ContentHash::from_bytes(payload) != header.checksum {
        return None;
    }

    bincode::serde::decode_from_slice(payload, bincode::config::standard())
        .ok()
        .map(|(data, _)| data)
}
