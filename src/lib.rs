//! # Media Renamer Library
//!
//! Renames media files based on metadata extracted by ffprobe.
//!
//! ## Module architecture:
//! - `config`: runtime configuration, validation, JSON persistence
//! - `error`: the `RenameError` taxonomy
//! - `prober`: external probe invocation behind the `MetadataProber` seam
//! - `classifier`: recording-device classification from vendor tags
//! - `location`: coordinate tag parsing and nearest-place lookup
//! - `metadata`: probe document -> fixed-schema `NormalizedMetadata`
//! - `formatter`: `{field}` template substitution
//! - `renamer`: bounded worker pool driving probe -> normalize -> rename
//! - `progress`: progress bar and batch statistics
//! - `platform`: external command naming and availability checks
//!
//! ## Usage:
//! ```rust,no_run
//! use std::sync::Arc;
//! use media_renamer::{BatchRenamer, Config, FfprobeProber, PlaceIndex};
//!
//! # async fn demo(files: Vec<std::path::PathBuf>) -> anyhow::Result<()> {
//! let config = Config::default();
//! let renamer = BatchRenamer::new(
//!     config,
//!     Arc::new(FfprobeProber::new()),
//!     Arc::new(PlaceIndex::builtin()),
//! )?;
//! let _report = renamer.run(&files).await?;
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod config;
pub mod error;
pub mod formatter;
pub mod location;
pub mod metadata;
pub mod platform;
pub mod prober;
pub mod progress;
pub mod renamer;

pub use classifier::Recorder;
pub use config::Config;
pub use error::RenameError;
pub use location::PlaceIndex;
pub use metadata::NormalizedMetadata;
pub use prober::{FfprobeProber, MetadataProber, ProbeDocument};
pub use renamer::{BatchRenamer, BatchReport, RenameOutcome};
