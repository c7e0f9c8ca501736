//! Sources of per-version header trees.
//!
//! The pipeline never reads files or talks to version control itself. It asks
//! a [`TreeProvider`] for the headers of each version.

use crate::error::{DocError, Result};
use std::collections::BTreeMap;

/// Supplies the header files of a version
///
/// Shared by every extraction task, so implementations must be `Send + Sync`.
pub trait TreeProvider: Send + Sync {
    /// Path → content for every file of `version`
    fn headers(&self, version: &str) -> Result<BTreeMap<String, String>>;
}

/// Tree provider backed by in-memory maps
#[derive(Debug, Clone, Default)]
pub struct MemoryTreeProvider {
    trees: BTreeMap<String, BTreeMap<String, String>>,
}

impl MemoryTreeProvider {
    /// Create an empty provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`add_file`](Self::add_file)
    pub fn with_file(
        mut self,
        version: impl Into<String>,
        path: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        self.add_file(version, path, content);
        self
    }

    /// Add or replace one file of a version
    pub fn add_file(
        &mut self,
        version: impl Into<String>,
        path: impl Into<String>,
        content: impl Into<String>,
    ) {
        self.trees
            .entry(version.into())
            .or_default()
            .insert(path.into(), content.into());
    }

    /// Replace the whole tree of a version
    pub fn insert_tree(&mut self, version: impl Into<String>, files: BTreeMap<String, String>) {
        self.trees.insert(version.into(), files);
    }

    /// Versions this provider knows, sorted bytewise
    pub fn versions(&self) -> Vec<&str> {
        self.trees.keys().map(String::as_str).collect()
    }
}

impl TreeProvider for MemoryTreeProvider {
    fn headers(&self, version: &str) -> Result<BTreeMap<String, String>> {
        self.trees
            .get(version)
            .cloned()
            .ok_or_else(|| DocError::VersionNotFound {
                version: version.to_string(),
            })
    }
}
