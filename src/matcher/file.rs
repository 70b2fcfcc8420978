//! Candidate file collection.

use crate::error::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

/// A candidate file together with the metadata used for sorting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub size: u64,
    pub accessed: Option<SystemTime>,
    pub modified: Option<SystemTime>,
    pub created: Option<SystemTime>,
}

impl FileEntry {
    /// Reads the metadata of `path`.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let metadata = fs::metadata(&path)?;
        Ok(Self {
            size: metadata.len(),
            accessed: metadata.accessed().ok(),
            modified: metadata.modified().ok(),
            created: metadata.created().ok(),
            path,
        })
    }

    /// An entry with no metadata, for paths that only need name sorting.
    pub fn bare(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            size: 0,
            accessed: None,
            modified: None,
            created: None,
        }
    }

    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }

    pub fn directory(&self) -> PathBuf {
        self.path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }
}

/// Predicates for collecting the files a rule is applied to.
#[derive(Default, Clone)]
pub struct FileCollector {
    recursive: bool,
    include_hidden: bool,
    extensions: Vec<String>,
    include_globs: Vec<String>,
    exclude_globs: Vec<String>,
}

impl FileCollector {
    /// Creates a collector for the top level of a directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Descends into subdirectories.
    pub fn recursive(mut self) -> Self {
        self.recursive = true;
        self
    }

    /// Includes dot files.
    pub fn hidden(mut self) -> Self {
        self.include_hidden = true;
        self
    }

    /// Matches files with the given extension (without dot).
    pub fn extension(mut self, ext: impl Into<String>) -> Self {
        self.extensions.push(ext.into());
        self
    }

    /// Includes files matching the glob pattern.
    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.include_globs.push(pattern.into());
        self
    }

    /// Excludes files matching the glob pattern.
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_globs.push(pattern.into());
        self
    }

    /// Collects matching files under `root`. A plain file is returned as is.
    pub fn collect(&self, root: &Path) -> Result<Vec<FileEntry>> {
        if root.is_file() {
            return Ok(vec![FileEntry::from_path(root)?]);
        }

        let include_set = build_glob_set(&self.include_globs)?;
        let exclude_set = build_glob_set(&self.exclude_globs)?;
        let max_depth = if self.recursive { usize::MAX } else { 1 };

        let mut collected = Vec::new();
        let walker = WalkDir::new(root)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || self.include_hidden || !is_hidden(e.path()));

        for entry in walker.filter_map(|e| e.ok()) {
            let path = entry.path();
            if !entry.file_type().is_file() {
                continue;
            }

            if !self.extensions.is_empty() {
                let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
                if !self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)) {
                    continue;
                }
            }

            let rel_path = path.strip_prefix(root).unwrap_or(path);
            if !self.include_globs.is_empty() && !include_set.is_match(rel_path) {
                continue;
            }
            if !self.exclude_globs.is_empty() && exclude_set.is_match(rel_path) {
                continue;
            }

            collected.push(FileEntry::from_path(path)?);
        }

        Ok(collected)
    }

    /// Collects from several roots, dropping duplicates.
    pub fn collect_all(&self, roots: &[PathBuf]) -> Result<Vec<FileEntry>> {
        let mut seen = std::collections::HashSet::new();
        let mut collected = Vec::new();
        for root in roots {
            for entry in self.collect(root)? {
                if seen.insert(entry.path.clone()) {
                    collected.push(entry);
                }
            }
        }
        Ok(collected)
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

fn build_glob_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

/// Partitions entries by parent directory, in directory path order.
///
/// Each group is one batch and gets its own state.
pub fn group_by_directory(entries: Vec<FileEntry>) -> Vec<(PathBuf, Vec<FileEntry>)> {
    let mut groups: BTreeMap<PathBuf, Vec<FileEntry>> = BTreeMap::new();
    for entry in entries {
        groups.entry(entry.directory()).or_default().push(entry);
    }
    groups.into_iter().collect()
}
