//! # Metadata Prober Module
//!
//! Spawns `ffprobe` against a single media file and captures its JSON
//! description of the container format and streams.
//!
//! ## Responsibilities:
//! - Invoke ffprobe with banner and log noise suppressed
//! - Parse its stdout into a `ProbeDocument`
//! - Surface process failures and unparsable output as `RenameError::Probe`
//! - Verify the ffprobe dependency before batch work starts
//!
//! The prober sits behind the narrow `MetadataProber` trait, so everything
//! downstream (normalizer, batch renamer) can be driven with synthetic
//! documents in tests without spawning any external process. One process
//! is spawned per call; there is no retry.

use crate::error::RenameError;
use crate::platform::PlatformCommands;
use async_trait::async_trait;
use std::path::Path;
use tracing::debug;

/// Parsed ffprobe output: a `format` section with container-level tags
/// and a `streams` sequence with per-stream tags and durations.
#[derive(Debug, Clone)]
pub struct ProbeDocument {
    raw: serde_json::Value,
}

impl ProbeDocument {
    pub fn new(raw: serde_json::Value) -> Self {
        Self { raw }
    }

    /// Parse a raw ffprobe stdout capture
    pub fn from_json_str(raw: &str) -> Result<Self, RenameError> {
        let value: serde_json::Value = serde_json::from_str(raw)
            .map_err(|e| RenameError::Probe(format!("unparsable probe output: {e}")))?;
        Ok(Self::new(value))
    }

    /// Look up a container-level tag (`format.tags.<name>`)
    pub fn format_tag(&self, name: &str) -> Option<&str> {
        self.raw["format"]["tags"][name].as_str()
    }

    /// The per-stream entries, if the document has any stream section at all
    pub fn streams(&self) -> Option<&Vec<serde_json::Value>> {
        self.raw["streams"].as_array()
    }
}

/// Narrow probing capability: one file path in, one parsed document out.
#[async_trait]
pub trait MetadataProber: Send + Sync {
    async fn probe(&self, path: &Path) -> Result<ProbeDocument, RenameError>;
}

/// Production prober backed by the ffprobe binary
pub struct FfprobeProber;

impl FfprobeProber {
    pub fn new() -> Self {
        Self
    }

    /// Check that ffprobe is installed before starting any work
    pub async fn check_available() -> Result<(), RenameError> {
        let platform = PlatformCommands::instance();
        if !platform.is_command_available(platform.ffprobe()).await {
            return Err(RenameError::MissingDependency(
                "ffprobe is required to read media metadata".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for FfprobeProber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetadataProber for FfprobeProber {
    async fn probe(&self, path: &Path) -> Result<ProbeDocument, RenameError> {
        let ffprobe = PlatformCommands::instance().ffprobe();
        debug!("Probing {} with {}", path.display(), ffprobe);

        let output = tokio::process::Command::new(ffprobe)
            .arg("-i")
            .arg(path)
            .args([
                "-print_format",
                "json",
                "-show_streams",
                "-show_format",
                "-hide_banner",
                "-v",
                "quiet",
            ])
            .output()
            .await
            .map_err(|e| RenameError::Probe(format!("failed to execute {ffprobe}: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RenameError::Probe(format!(
                "{} exited with {} for {}: {}",
                ffprobe,
                output.status,
                path.display(),
                stderr.trim()
            )));
        }

        ProbeDocument::from_json_str(&String::from_utf8_lossy(&output.stdout))
    }
}
