//! # Batch Renamer Module
//!
//! Orchestrates the per-file pipeline over a list of input files.
//!
//! ## Flow per file:
//! 1. Resolve the path against the configured working directory
//! 2. Probe the file and normalize its metadata
//! 3. Render the template and append the lowercased original extension
//! 4. Rename within the source file's directory
//!
//! ## Concurrency:
//! - Semaphore-bounded worker pool, one tokio task per file
//! - Jobs are independent; one job's failure never cancels in-flight
//!   siblings
//! - With `fail_fast`, the first failure flips a shared flag: files not
//!   yet started are reported as cancelled, in-flight ones finish
//!
//! ## Reporting:
//! - Per-file status messages tick the progress bar in completion order
//! - Every outcome lands in the `BatchReport`; nothing is dropped
//!   silently, and destination collisions fail the job instead of
//!   overwriting

use crate::config::Config;
use crate::error::RenameError;
use crate::formatter;
use crate::location::PlaceIndex;
use crate::metadata::{self, NormalizedMetadata};
use crate::prober::MetadataProber;
use crate::progress::{ProgressManager, RenameStats};
use anyhow::Result;
use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, error, info};

/// A completed rename: where the file was and where it is now
#[derive(Debug, Clone)]
pub struct RenameOutcome {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Aggregate result of a batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    pub renamed: Vec<RenameOutcome>,
    pub failures: Vec<(PathBuf, RenameError)>,
    pub cancelled: Vec<PathBuf>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.cancelled.is_empty()
    }
}

/// Main batch rename orchestrator
pub struct BatchRenamer {
    config: Config,
    prober: Arc<dyn MetadataProber>,
    places: Arc<PlaceIndex>,
}

impl BatchRenamer {
    /// Create a new batch renamer instance
    pub fn new(
        config: Config,
        prober: Arc<dyn MetadataProber>,
        places: Arc<PlaceIndex>,
    ) -> Result<Self, RenameError> {
        config.validate()?;

        Ok(Self {
            config,
            prober,
            places,
        })
    }

    /// Run the rename over all given files
    pub async fn run(&self, files: &[PathBuf]) -> Result<BatchReport> {
        info!(
            "Renaming {} files with {} workers (template: {})",
            files.len(),
            self.config.workers,
            self.config.template
        );

        if self.config.dry_run {
            info!("🧪 Dry run mode: no files will be renamed");
        }
        if self.config.fail_fast {
            info!("🛑 Fail-fast mode: stop scheduling after the first failure");
        }

        let progress = ProgressManager::new(files.len() as u64);
        let semaphore = Arc::new(Semaphore::new(self.config.workers));
        let batch_failed = Arc::new(AtomicBool::new(false));
        let fail_fast = self.config.fail_fast;

        let mut report = BatchReport::default();
        let mut tasks = Vec::new();

        for file in files.iter().cloned() {
            if fail_fast && batch_failed.load(Ordering::SeqCst) {
                progress.update(&format!("⏩ {}: cancelled", file_label(&file)));
                report.cancelled.push(file);
                continue;
            }

            let permit = semaphore.clone().acquire_owned().await?;
            let job = RenameJob {
                config: self.config.clone(),
                prober: Arc::clone(&self.prober),
                places: Arc::clone(&self.places),
            };
            let batch_failed = Arc::clone(&batch_failed);
            let progress = progress.clone();

            tasks.push(tokio::spawn(async move {
                let _permit = permit; // Keep permit alive for the job's duration

                if fail_fast && batch_failed.load(Ordering::SeqCst) {
                    progress.update(&format!("⏩ {}: cancelled", file_label(&file)));
                    return (file, Err(RenameError::Cancelled));
                }

                let result = job.rename_one(&file).await;
                match &result {
                    Ok(outcome) => {
                        progress.update(&format!(
                            "✅ {} -> {}",
                            file_label(&outcome.source),
                            file_label(&outcome.destination)
                        ));
                    }
                    Err(e) => {
                        batch_failed.store(true, Ordering::SeqCst);
                        progress.update(&format!("❌ {}: {}", file_label(&file), e));
                    }
                }

                (file, result)
            }));
        }

        // Wait for all tasks and collect results
        let mut stats = RenameStats::new();
        for cancelled in &report.cancelled {
            debug!("Never scheduled: {}", cancelled.display());
            stats.add_cancelled();
        }

        for task in join_all(tasks).await {
            match task? {
                (_, Ok(outcome)) => {
                    stats.add_renamed();
                    report.renamed.push(outcome);
                }
                (file, Err(RenameError::Cancelled)) => {
                    stats.add_cancelled();
                    report.cancelled.push(file);
                }
                (file, Err(e)) => {
                    stats.add_error();
                    error!("Failed to rename {}: {}", file.display(), e);
                    report.failures.push((file, e));
                }
            }
        }

        progress.finish(&stats.format_summary());

        Ok(report)
    }
}

/// Per-file pipeline, run inside one worker task
struct RenameJob {
    config: Config,
    prober: Arc<dyn MetadataProber>,
    places: Arc<PlaceIndex>,
}

impl RenameJob {
    async fn rename_one(&self, file: &Path) -> Result<RenameOutcome, RenameError> {
        let source = resolve_source(&self.config.working_dir, file);
        debug!("Processing: {}", source.display());

        let doc = self.prober.probe(&source).await?;
        let meta = metadata::normalize(&doc, &self.places)?;
        let destination = destination_path(&source, &self.config.template, &meta)?;

        if destination == source {
            debug!("Already named correctly: {}", source.display());
            return Ok(RenameOutcome {
                source,
                destination,
            });
        }

        if tokio::fs::try_exists(&destination).await? {
            return Err(RenameError::DestinationExists(destination));
        }

        if self.config.dry_run {
            info!(
                "Dry run: would rename {} -> {}",
                source.display(),
                destination.display()
            );
            return Ok(RenameOutcome {
                source,
                destination,
            });
        }

        tokio::fs::rename(&source, &destination).await?;
        debug!(
            "Renamed {} -> {}",
            source.display(),
            destination.display()
        );

        Ok(RenameOutcome {
            source,
            destination,
        })
    }
}

/// New path in the source file's directory: rendered template plus the
/// lowercased original extension
fn destination_path(
    source: &Path,
    template: &str,
    meta: &NormalizedMetadata,
) -> Result<PathBuf, RenameError> {
    let stem = formatter::render(template, meta)?;
    let extension = source
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default();

    let directory = source.parent().unwrap_or_else(|| Path::new(""));
    Ok(directory.join(format!("{stem}{extension}")))
}

fn resolve_source(working_dir: &Path, file: &Path) -> PathBuf {
    if file.is_absolute() {
        file.to_path_buf()
    } else {
        working_dir.join(file)
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prober::ProbeDocument;
    use async_trait::async_trait;
    use serde_json::json;
    use tempfile::TempDir;

    /// Prober returning synthetic documents keyed off the file name:
    /// `clipN` probes to a creation time N seconds past the hour, and
    /// names containing `fail_on` error out.
    struct StubProber {
        fail_on: Option<&'static str>,
    }

    fn stub_doc(second: u32) -> ProbeDocument {
        ProbeDocument::new(json!({
            "format": {"tags": {}},
            "streams": [{
                "duration": "12.5",
                "tags": {"creation_time": format!("2021-03-09T10:00:{second:02}.000000Z")}
            }]
        }))
    }

    #[async_trait]
    impl MetadataProber for StubProber {
        async fn probe(&self, path: &Path) -> Result<ProbeDocument, RenameError> {
            let stem = path
                .file_stem()
                .unwrap_or_default()
                .to_string_lossy()
                .into_owned();

            if let Some(marker) = self.fail_on {
                if stem.contains(marker) {
                    return Err(RenameError::Probe("stub probe failure".to_string()));
                }
            }

            let index: u32 = stem.trim_start_matches("clip").parse().unwrap_or(0);
            Ok(stub_doc(index))
        }
    }

    fn renamer_in(dir: &TempDir, fail_on: Option<&'static str>, config: Config) -> BatchRenamer {
        let config = Config {
            working_dir: dir.path().to_path_buf(),
            ..config
        };
        BatchRenamer::new(
            config,
            Arc::new(StubProber { fail_on }),
            Arc::new(PlaceIndex::new(Vec::new())),
        )
        .unwrap()
    }

    fn make_files(dir: &TempDir, count: usize) -> Vec<PathBuf> {
        (0..count)
            .map(|i| {
                let path = dir.path().join(format!("clip{i}.mp4"));
                std::fs::write(&path, b"fake video").unwrap();
                path
            })
            .collect()
    }

    #[tokio::test]
    async fn test_batch_renames_every_file_exactly_once() {
        let dir = TempDir::new().unwrap();
        let files = make_files(&dir, 5);

        let config = Config {
            template: "{date}".to_string(),
            workers: 2,
            ..Config::default()
        };
        let report = renamer_in(&dir, None, config).run(&files).await.unwrap();

        assert!(report.is_success());
        assert_eq!(report.renamed.len(), 5);

        for (i, file) in files.iter().enumerate() {
            assert!(!file.exists(), "original {} should be gone", file.display());
            let renamed = dir.path().join(format!("2021-03-09T10-00-{i:02}.mp4"));
            assert!(renamed.exists(), "missing {}", renamed.display());
        }
    }

    #[tokio::test]
    async fn test_one_failure_does_not_block_siblings() {
        let dir = TempDir::new().unwrap();
        let mut files = make_files(&dir, 4);
        let bad = dir.path().join("badclip.mp4");
        std::fs::write(&bad, b"fake video").unwrap();
        files.push(bad.clone());

        let config = Config {
            template: "{date}".to_string(),
            workers: 2,
            ..Config::default()
        };
        let report = renamer_in(&dir, Some("bad"), config)
            .run(&files)
            .await
            .unwrap();

        assert_eq!(report.renamed.len(), 4);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, bad);
        assert!(matches!(report.failures[0].1, RenameError::Probe(_)));
        assert!(bad.exists(), "failed file must be left untouched");
    }

    #[tokio::test]
    async fn test_destination_collision_fails_that_job_only() {
        let dir = TempDir::new().unwrap();
        let files = make_files(&dir, 2);

        // Occupy clip0's destination ahead of time
        std::fs::write(dir.path().join("2021-03-09T10-00-00.mp4"), b"squatter").unwrap();

        let config = Config {
            template: "{date}".to_string(),
            workers: 2,
            ..Config::default()
        };
        let report = renamer_in(&dir, None, config).run(&files).await.unwrap();

        assert_eq!(report.renamed.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(
            report.failures[0].1,
            RenameError::DestinationExists(_)
        ));
        assert!(files[0].exists(), "collided file must be left in place");
        assert!(!files[1].exists());
    }

    #[tokio::test]
    async fn test_dry_run_touches_nothing() {
        let dir = TempDir::new().unwrap();
        let files = make_files(&dir, 3);

        let config = Config {
            template: "{date}".to_string(),
            workers: 2,
            dry_run: true,
            ..Config::default()
        };
        let report = renamer_in(&dir, None, config).run(&files).await.unwrap();

        assert!(report.is_success());
        assert_eq!(report.renamed.len(), 3);
        for file in &files {
            assert!(file.exists(), "dry run must not move {}", file.display());
        }
    }

    #[tokio::test]
    async fn test_fail_fast_cancels_unstarted_jobs() {
        let dir = TempDir::new().unwrap();
        let files = make_files(&dir, 5);

        // Every probe fails; with one worker the first failure is
        // observed before any later job starts.
        let config = Config {
            template: "{date}".to_string(),
            workers: 1,
            fail_fast: true,
            ..Config::default()
        };
        let report = renamer_in(&dir, Some("clip"), config)
            .run(&files)
            .await
            .unwrap();

        assert!(report.renamed.is_empty());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.cancelled.len(), 4);
    }

    #[tokio::test]
    async fn test_extension_is_lowercased() {
        let dir = TempDir::new().unwrap();
        let upper = dir.path().join("clip3.MP4");
        std::fs::write(&upper, b"fake video").unwrap();

        let config = Config {
            template: "{date}".to_string(),
            workers: 1,
            ..Config::default()
        };
        let report = renamer_in(&dir, None, config)
            .run(std::slice::from_ref(&upper))
            .await
            .unwrap();

        assert!(report.is_success());
        assert!(dir.path().join("2021-03-09T10-00-03.mp4").exists());
    }

    #[tokio::test]
    async fn test_relative_paths_resolve_against_working_dir() {
        let dir = TempDir::new().unwrap();
        make_files(&dir, 1);

        let config = Config {
            template: "{date}".to_string(),
            workers: 1,
            ..Config::default()
        };
        let report = renamer_in(&dir, None, config)
            .run(&[PathBuf::from("clip0.mp4")])
            .await
            .unwrap();

        assert!(report.is_success());
        assert!(dir.path().join("2021-03-09T10-00-00.mp4").exists());
    }
}
