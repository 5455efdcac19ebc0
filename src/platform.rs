//! # Platform-specific utilities
//!
//! Centralizes the handling of the external `ffprobe` dependency:
//! command naming on Windows vs Unix and availability checks.

use std::sync::OnceLock;

/// Platform-specific command manager for external tools
pub struct PlatformCommands {
    ffprobe: &'static str,
    which_command: &'static str,
}

impl PlatformCommands {
    /// Get the singleton instance
    pub fn instance() -> &'static Self {
        static INSTANCE: OnceLock<PlatformCommands> = OnceLock::new();
        INSTANCE.get_or_init(Self::new)
    }

    fn new() -> Self {
        if cfg!(windows) {
            Self {
                ffprobe: "ffprobe.exe",
                which_command: "where",
            }
        } else {
            Self {
                ffprobe: "ffprobe",
                which_command: "which",
            }
        }
    }

    /// Get the platform-specific name of the ffprobe binary
    pub fn ffprobe(&self) -> &'static str {
        self.ffprobe
    }

    /// Check if a command is available on the system PATH
    pub async fn is_command_available(&self, command: &str) -> bool {
        let result = tokio::process::Command::new(self.which_command)
            .arg(command)
            .output()
            .await;

        match result {
            Ok(output) => output.status.success(),
            Err(_) => false,
        }
    }
}
