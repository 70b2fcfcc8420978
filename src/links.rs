//! Keeping companion files in sync with renamed paths.

use crate::error::{RenameError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The rewrite of one companion file.
#[derive(Debug, Clone)]
pub struct LinkUpdate {
    pub path: PathBuf,
    pub original: String,
    pub transformed: String,
}

impl LinkUpdate {
    /// Returns true if any reference was rewritten.
    pub fn is_modified(&self) -> bool {
        self.original != self.transformed
    }

    /// Writes the transformed content to disk if it changed.
    pub fn apply(&self) -> Result<()> {
        if self.is_modified() {
            fs::write(&self.path, &self.transformed).map_err(|source| {
                RenameError::LinkUpdate {
                    path: self.path.clone(),
                    source,
                }
            })?;
        }
        Ok(())
    }
}

/// The three textual forms a path may take inside a companion file:
/// backslashes doubled, forward slashes, and the literal path.
fn encodings(path: &str) -> [String; 3] {
    [
        path.replace('\\', "\\\\"),
        path.replace('\\', "/"),
        path.to_string(),
    ]
}

/// Replaces every encoding of `old` in `content` with the matching encoding
/// of `new`. Returns the new content and whether anything changed.
pub fn substitute_path(content: &str, old: &str, new: &str) -> (String, bool) {
    if old.is_empty() || old == new {
        return (content.to_string(), false);
    }

    let mut result = content.to_string();
    let mut changed = false;
    let mut done: Vec<String> = Vec::with_capacity(3);

    for (from, to) in encodings(old).into_iter().zip(encodings(new)) {
        if done.contains(&from) {
            continue;
        }
        if result.contains(&from) {
            result = result.replace(&from, &to);
            changed = true;
        }
        done.push(from);
    }

    (result, changed)
}

/// Rewrites references to a renamed path inside companion files.
pub struct LinkPropagator;

impl LinkPropagator {
    /// Computes the rewrite of `companion` without touching it.
    pub fn plan(companion: &Path, old: &str, new: &str) -> Result<LinkUpdate> {
        let original = fs::read_to_string(companion).map_err(|source| RenameError::LinkUpdate {
            path: companion.to_path_buf(),
            source,
        })?;
        let (transformed, changed) = substitute_path(&original, old, new);
        debug!(
            "Linked file {}: {}",
            companion.display(),
            if changed { "references updated" } else { "no references" }
        );
        Ok(LinkUpdate {
            path: companion.to_path_buf(),
            original,
            transformed,
        })
    }

    /// Rewrites `companion` in place, writing only if something changed.
    /// Returns whether any reference was rewritten.
    pub fn update(companion: &Path, old: &str, new: &str) -> Result<bool> {
        let update = Self::plan(companion, old, new)?;
        update.apply()?;
        Ok(update.is_modified())
    }
}
