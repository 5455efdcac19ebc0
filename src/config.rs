//! # Configuration Management Module
//!
//! Defines the `Config` struct consumed by the batch renamer.
//!
//! ## Parameters:
//! - `template`: filename template with `{field}` placeholders (default: "{date}")
//! - `workers`: number of parallel rename workers (default: detected CPU count)
//! - `fail_fast`: stop scheduling new files after the first failure (default: false)
//! - `dry_run`: report new names without touching the file system (default: false)
//! - `working_dir`: base directory for resolving relative input paths
//!
//! The working directory and worker count are carried here explicitly
//! instead of being read from the process environment inside the renamer,
//! so the renamer can be exercised in isolation.
//!
//! Supports loading/saving defaults from a JSON file; the CLI looks for
//! one under the platform config dir when `--config` is not given.

use crate::error::RenameError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_working_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Configuration for batch renaming
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Filename template with `{field}` placeholders (extension is appended)
    pub template: String,
    /// Number of parallel rename workers
    pub workers: usize,
    /// Stop scheduling new files after the first failure
    #[serde(default)]
    pub fail_fast: bool,
    /// Dry run - report new names without renaming anything
    #[serde(default)]
    pub dry_run: bool,
    /// Base directory for resolving relative input paths
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            template: "{date}".to_string(),
            workers: num_cpus::get(),
            fail_fast: false,
            dry_run: false,
            working_dir: default_working_dir(),
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), RenameError> {
        if self.template.is_empty() {
            return Err(RenameError::Validation(
                "template must not be empty".to_string(),
            ));
        }

        if self.workers == 0 {
            return Err(RenameError::Validation(
                "number of workers must be greater than 0".to_string(),
            ));
        }

        if !self.working_dir.is_dir() {
            return Err(RenameError::Validation(format!(
                "working directory does not exist: {}",
                self.working_dir.display()
            )));
        }

        Ok(())
    }

    /// Default config file location under the platform config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("media-renamer").join("config.json"))
    }

    /// Load configuration from file, falling back to defaults if it is absent
    pub async fn from_file(path: &Path) -> Result<Self, RenameError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| RenameError::Validation(format!("bad config file: {e}")))?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &Path) -> Result<(), RenameError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| RenameError::Validation(format!("config not serializable: {e}")))?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}
