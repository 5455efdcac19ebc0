//! # Media Renamer - Main Entry Point
//!
//! ## Responsibilities:
//! - Command line parsing with `clap`
//! - Logging setup with `tracing` (INFO, or DEBUG with --verbose)
//! - Mode dispatch: metadata inspection vs batch rename
//! - Merging config-file defaults under explicit CLI flags
//!
//! ## Modes:
//! - `--meta`: probe the first given file and print a key/value table
//! - `--format <TEMPLATE>`: rename all given files using the template;
//!   the lowercased original extension is appended automatically
//!
//! ## Exit codes:
//! - 0: full success
//! - 1: any probe, normalization, or rename step failed
//! - 2: malformed invocation (clap usage error, e.g. no mode flag)
//!
//! ## Examples:
//! ```bash
//! media-renamer --meta holiday.mp4
//! media-renamer --format '{date}' *.mp4
//! media-renamer --format '{location}-{year}-{month}' --workers 2 clips/*.mov
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

use media_renamer::{
    metadata, BatchRenamer, Config, FfprobeProber, MetadataProber, NormalizedMetadata, PlaceIndex,
};

#[derive(Parser)]
#[command(name = "media-renamer")]
#[command(about = "Rename media files from their embedded metadata")]
#[command(group = clap::ArgGroup::new("mode").required(true).args(["meta", "format"]))]
struct Args {
    /// Media files to inspect or rename
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Print available metadata for the first given file
    #[arg(short, long)]
    meta: bool,

    /// Filename template, e.g. '{date}' or '{location}-{year}'
    #[arg(short, long)]
    format: Option<String>,

    /// Number of parallel workers (default: detected CPU count)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Stop scheduling new files after the first failure
    #[arg(long)]
    fail_fast: bool,

    /// Dry run - report new names without renaming anything
    #[arg(long)]
    dry_run: bool,

    /// Configuration file with default options
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<bool> {
    FfprobeProber::check_available().await?;

    let prober = Arc::new(FfprobeProber::new());
    let places = Arc::new(PlaceIndex::builtin());

    if args.meta {
        let file = args
            .files
            .first()
            .ok_or_else(|| anyhow::anyhow!("no input files given"))?;
        let source = resolve_against_cwd(file)?;

        let doc = prober.probe(&source).await?;
        let meta = metadata::normalize(&doc, &places)?;
        print_metadata_table(&meta);
        return Ok(true);
    }

    let config = load_config(&args).await?;

    info!("{} CPUs detected", num_cpus::get());

    let renamer = BatchRenamer::new(config, prober, places)?;
    let report = renamer.run(&args.files).await?;

    if !report.failures.is_empty() {
        eprintln!(
            "\n{} of {} files failed:",
            report.failures.len(),
            args.files.len()
        );
        for (path, err) in &report.failures {
            eprintln!("  ❌ {}: {}", path.display(), err);
        }
    }
    if !report.cancelled.is_empty() {
        eprintln!(
            "{} files cancelled after the first failure",
            report.cancelled.len()
        );
    }

    Ok(report.is_success())
}

/// File-config defaults merged under explicit CLI flags
async fn load_config(args: &Args) -> Result<Config> {
    let base = match &args.config {
        Some(path) => Config::from_file(path).await?,
        None => match Config::default_path() {
            Some(path) if path.exists() => Config::from_file(&path).await?,
            _ => Config::default(),
        },
    };

    Ok(Config {
        template: args.format.clone().unwrap_or(base.template),
        workers: args.workers.unwrap_or(base.workers),
        fail_fast: args.fail_fast || base.fail_fast,
        dry_run: args.dry_run || base.dry_run,
        working_dir: std::env::current_dir()?,
    })
}

fn resolve_against_cwd(file: &Path) -> Result<PathBuf> {
    if file.is_absolute() {
        Ok(file.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(file))
    }
}

fn print_metadata_table(meta: &NormalizedMetadata) {
    let fields = meta.fields();
    let key_width = fields
        .iter()
        .map(|(key, _)| key.len())
        .max()
        .unwrap_or(0)
        .max("Key".len());
    let value_width = fields
        .iter()
        .map(|(_, value)| value.len())
        .max()
        .unwrap_or(0)
        .max("Value".len());

    let border = format!("+-{}-+-{}-+", "-".repeat(key_width), "-".repeat(value_width));
    println!("{border}");
    println!("| {:<key_width$} | {:<value_width$} |", "Key", "Value");
    println!("{border}");
    for (key, value) in &fields {
        println!("| {key:<key_width$} | {value:<value_width$} |");
    }
    println!("{border}");
}
