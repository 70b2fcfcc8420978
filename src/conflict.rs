//! Rename conflict detection and resolution.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// The state of a proposed rename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Proposal {
    /// The file already has the proposed name.
    NoOp,
    /// The target is free.
    Ready,
    /// Something else already lives at the target.
    Exists,
}

/// What to do about an existing target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Stop the whole run.
    Cancel,
    /// Leave the file alone and never retry it in this batch.
    Skip,
    /// Advance the counter and compute a new name.
    TryAgain,
}

/// Decides how to handle a name collision. May block on a human.
pub trait ConflictPolicy {
    fn decide(&mut self, original: &Path, target: &Path) -> Decision;
}

/// A fixed answer for every conflict.
impl ConflictPolicy for Decision {
    fn decide(&mut self, _original: &Path, _target: &Path) -> Decision {
        *self
    }
}

/// Adapts a closure into a [`ConflictPolicy`].
pub struct PolicyFn<F>(pub F);

impl<F> ConflictPolicy for PolicyFn<F>
where
    F: FnMut(&Path, &Path) -> Decision,
{
    fn decide(&mut self, original: &Path, target: &Path) -> Decision {
        (self.0)(original, target)
    }
}

/// Classifies proposed renames against the file system.
///
/// Existence is checked at the moment of classification. In simulated mode
/// the resolver also remembers the renames it was told about, so a dry run
/// sees the same collisions a real run would.
#[derive(Debug, Default)]
pub struct ConflictResolver {
    simulated: bool,
    planned: HashSet<PathBuf>,
    vacated: HashSet<PathBuf>,
}

impl ConflictResolver {
    pub fn live() -> Self {
        Self::default()
    }

    pub fn simulated() -> Self {
        Self {
            simulated: true,
            ..Default::default()
        }
    }

    pub fn classify(&self, original: &Path, target: &Path) -> Proposal {
        if original == target {
            return Proposal::NoOp;
        }
        if !self.exists(target) {
            return Proposal::Ready;
        }
        // A case-only rename on a case-insensitive file system.
        if !self.simulated && same_file(original, target) {
            return Proposal::Ready;
        }
        Proposal::Exists
    }

    /// Notes a completed rename. Only affects simulated mode.
    pub fn record(&mut self, original: &Path, target: &Path) {
        if self.simulated {
            self.planned.remove(original);
            self.vacated.insert(original.to_path_buf());
            self.vacated.remove(target);
            self.planned.insert(target.to_path_buf());
        }
    }

    fn exists(&self, path: &Path) -> bool {
        if self.planned.contains(path) {
            return true;
        }
        if self.vacated.contains(path) {
            return false;
        }
        path.exists()
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
