//! # Error Types Module
//!
//! Defines `RenameError`, the error taxonomy for the whole pipeline.
//!
//! ## Categories:
//! - `Io`: file system errors (rename failures, permissions, etc.)
//! - `Probe`: external prober exited non-zero or produced unparsable output
//! - `Schema`: probe output is missing the expected stream data
//! - `InvalidTimestamp`: missing or unparsable creation time
//! - `UnknownField`: template references a field that does not exist
//! - `DestinationExists`: rename target collision (never overwrite silently)
//! - `MissingDependency`: external tool (ffprobe) not installed
//! - `Validation`: bad configuration or template syntax
//! - `Cancelled`: job skipped because fail-fast tripped
//!
//! Every per-file failure in a batch is one of these variants, so the
//! final report can tell the user what went wrong for which file.

use std::path::PathBuf;

/// Custom error types for media renaming
#[derive(thiserror::Error, Debug)]
pub enum RenameError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("probe failed: {0}")]
    Probe(String),

    #[error("unrecognized probe output: {0}")]
    Schema(String),

    #[error("invalid creation timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("unknown metadata field: {0}")]
    UnknownField(String),

    #[error("destination already exists: {}", .0.display())]
    DestinationExists(PathBuf),

    #[error("dependency missing: {0}")]
    MissingDependency(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("cancelled before start")]
    Cancelled,
}
