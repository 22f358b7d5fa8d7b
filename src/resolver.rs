//! Library file resolution
//!
//! LDraw documents reference other files by logical name ("3001.dat",
//! "s\\3001s01.dat"). This module maps those names to byte content through
//! configured search roots, without touching any other state.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::Resolution;

/// Resolves a logical LDraw filename to file content.
///
/// Implementations must be pure lookups: same input, same answer, no side
/// effects beyond reading. Names are matched case-insensitively and may use
/// either `/` or `\` as separators.
pub trait LibraryResolver {
    /// Return the content of `filename`, or `None` when the name cannot be
    /// resolved against this library.
    fn resolve(&self, filename: &str) -> Option<Vec<u8>>;
}

/// Normalize a logical filename for lookups: lower-cased, `\` → `/`.
pub fn normalize_name(filename: &str) -> String {
    filename.trim().to_lowercase().replace('\\', "/")
}

/// A resolver backed by directories on disk.
///
/// For each configured root the following candidate directories are tried in
/// order, and within each the name is tried verbatim and lower-cased; the
/// first existing file wins:
///
/// 1. the root itself
/// 2. `parts/`
/// 3. `p/48/` (high resolution) or `p/8/` (low resolution), when selected
/// 4. `p/`
/// 5. `models/`
///
/// Roots are searched in the order they were added, so a directory placed
/// before the official library shadows it (the usual way to supply
/// unofficial parts).
pub struct FileSystemResolver {
    roots: Vec<PathBuf>,
    resolution: Resolution,
}

impl FileSystemResolver {
    /// Create a resolver over the given library roots.
    pub fn new(roots: Vec<PathBuf>, resolution: Resolution) -> Self {
        Self { roots, resolution }
    }

    /// Add a root searched before the existing ones.
    pub fn prepend_root(&mut self, root: PathBuf) {
        self.roots.insert(0, root);
    }

    fn candidate_dirs(&self, root: &Path) -> Vec<PathBuf> {
        let mut dirs = vec![root.to_path_buf(), root.join("parts")];
        if let Some(sub) = self.resolution.primitive_dir() {
            dirs.push(root.join("p").join(sub));
        }
        dirs.push(root.join("p"));
        dirs.push(root.join("models"));
        dirs
    }
}

impl LibraryResolver for FileSystemResolver {
    fn resolve(&self, filename: &str) -> Option<Vec<u8>> {
        let relative = filename.trim().replace('\\', "/");
        let lowered = relative.to_lowercase();

        for root in &self.roots {
            for dir in self.candidate_dirs(root) {
                for name in [relative.as_str(), lowered.as_str()] {
                    let candidate = dir.join(name);
                    if candidate.is_file() {
                        log::trace!("resolved '{}' to {}", filename, candidate.display());
                        return std::fs::read(candidate).ok();
                    }
                }
            }
        }
        None
    }
}

/// An in-memory resolver over a name → content map.
///
/// Lookup is by normalized name (see [`normalize_name`]). Used by tests and
/// by callers that already hold library content in memory.
#[derive(Default)]
pub struct MemoryResolver {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryResolver {
    /// Create an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `content` under `filename`.
    pub fn insert(&mut self, filename: &str, content: impl Into<Vec<u8>>) {
        self.files.insert(normalize_name(filename), content.into());
    }
}

impl LibraryResolver for MemoryResolver {
    fn resolve(&self, filename: &str) -> Option<Vec<u8>> {
        self.files.get(&normalize_name(filename)).cloned()
    }
}
