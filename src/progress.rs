//! # Progress Tracking and Statistics Module
//!
//! Progress bar and batch statistics for rename runs.
//!
//! ## Components:
//! - `ProgressManager`: wraps the `indicatif` bar, one tick per file
//! - `RenameStats`: cumulative counts for the final summary line
//!
//! Per-file status messages arrive in completion order, not input order;
//! the bar only guarantees that every file ticks exactly once.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Manages progress reporting for a batch rename
#[derive(Clone)]
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(total_files: u64) -> Self {
        let bar = ProgressBar::new(total_files);

        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Update progress with a message
    pub fn update(&self, message: &str) {
        self.bar.inc(1);
        self.bar.set_message(message.to_string());
    }

    /// Finish with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

/// Statistics tracker for batch rename results
#[derive(Debug, Default)]
pub struct RenameStats {
    pub files_processed: usize,
    pub files_renamed: usize,
    pub files_cancelled: usize,
    pub errors: usize,
}

impl RenameStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_renamed(&mut self) {
        self.files_processed += 1;
        self.files_renamed += 1;
    }

    pub fn add_cancelled(&mut self) {
        self.files_processed += 1;
        self.files_cancelled += 1;
    }

    pub fn add_error(&mut self) {
        self.files_processed += 1;
        self.errors += 1;
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Processed: {} files | Renamed: {} | Cancelled: {} | Errors: {}",
            self.files_processed, self.files_renamed, self.files_cancelled, self.errors
        )
    }
}
