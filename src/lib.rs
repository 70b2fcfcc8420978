//! # Rename DSL
//!
//! A domain-specific language for rule-based batch file renaming.
//!
//! This crate provides a fluent API for:
//! - Finding pattern occurrences in file names, case-sensitively or not
//! - Inserting text next to matches, replacing them, or replacing whole names
//! - Generating per-file text from counters and rotating lists
//! - Resolving name collisions with a pluggable policy
//! - Rewriting references to renamed paths inside companion files
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rename_dsl::prelude::*;
//!
//! // IMG_0001.jpg -> holiday-001.jpg, in order of modification time
//! let rule = RuleSpec::rename(CountingText::new(1).prefix("holiday-").width(3))
//!     .sort(SortKey::ModifyDate, SortOrder::Ascending);
//!
//! let report = Renamer::new(rule)?
//!     .on_conflict(Decision::TryAgain)
//!     .run_paths(&["./photos".into()], &FileCollector::new())?;
//!
//! println!("Renamed {} file(s)", report.total_renamed());
//! # Ok::<(), rename_dsl::error::RenameError>(())
//! ```
//!
//! ## Rules from configuration
//!
//! ```rust,no_run
//! use rename_dsl::prelude::*;
//!
//! // Validation runs on load, before any file is touched.
//! let rule = RuleSpec::from_yaml("rules/extension.yaml")?;
//! let report = Renamer::new(rule)?
//!     .dry_run()
//!     .run_paths(&["./docs".into()], &FileCollector::new().recursive())?;
//!
//! print!("{}", report.plan());
//! # Ok::<(), rename_dsl::error::RenameError>(())
//! ```
//!
//! ## Matching only
//!
//! ```rust
//! use rename_dsl::matcher::find_matches;
//! use rename_dsl::rule::MatchSpec;
//!
//! let spec = MatchSpec::pattern("x").limit(2).from_right();
//! let set = find_matches("x1x2x3x", &spec);
//! let offsets: Vec<usize> = set.matches.iter().map(|m| m.offset).collect();
//! assert_eq!(offsets, vec![6, 4]);
//! ```

pub mod conflict;
pub mod diff;
pub mod error;
pub mod links;
pub mod matcher;
pub mod renamer;
pub mod rule;
pub mod sort;
pub mod state;
pub mod transform;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::conflict::{ConflictPolicy, ConflictResolver, Decision, PolicyFn, Proposal};
    pub use crate::error::{RenameError, Result};
    pub use crate::links::{LinkPropagator, LinkUpdate, substitute_path};
    pub use crate::matcher::{
        FileCollector, FileEntry, Match, MatchSet, NameParts, find_extension_matches, find_matches,
        group_by_directory,
    };
    pub use crate::renamer::{
        DirectoryOutcome, LinkFailure, RenameResult, Renamer, RunReport, StopReason,
    };
    pub use crate::rule::{
        Action, Anchor, CountingText, InsertSpec, InsertText, MatchMode, MatchSpec, PlacementSpec,
        Position, RuleSpec, SortKey, SortOrder, SortSpec, TextItem,
    };
    pub use crate::sort::sort_entries;
    pub use crate::state::BatchState;
    pub use crate::transform::{Candidate, Exhaustion, GeneratedText, TextGenerator, candidate_name};
}

pub use prelude::*;
