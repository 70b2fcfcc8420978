//! Error types for the rename DSL.

use crate::renamer::RunReport;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for rename operations.
#[derive(Error, Debug)]
pub enum RenameError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Glob pattern error: {0}")]
    Glob(#[from] globset::Error),

    /// The rule is structurally inconsistent (detected before any file is touched).
    #[error("Rule mismatch: {0}")]
    RuleMismatch(String),

    /// The rule requests a feature that has no implementation.
    #[error("Unsupported option: {0}")]
    UnsupportedOption(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to rename {}: {source}", .path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to update linked file {}: {source}", .path.display())]
    LinkUpdate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A conflict was answered with `Cancel`. Files renamed before the
    /// cancellation stay renamed and are listed in the report.
    #[error("Run cancelled after {} file(s) renamed", .report.total_renamed())]
    Cancelled { report: Box<RunReport> },
}

/// A specialized Result type for rename operations.
pub type Result<T> = std::result::Result<T, RenameError>;
