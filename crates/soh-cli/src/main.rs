//! Battery SOH Pipeline - Command-Line Driver
//!
//! All I/O lives here: file enumeration, JSON parsing, and the feature log.
//! The core pipeline never touches the filesystem. Per-record failures are
//! reported and counted, never fatal to the batch.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crank_features::{extract_features, CrankRecord, FeatureRecord};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Directory name that holds crank JSON documents.
const CRANK_DATA_DIR: &str = "crankData";

#[derive(Parser, Debug)]
#[command(author, version, about = "Battery crank feature extraction driver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract SOH features from crank JSON files under a data root
    Features(FeaturesArgs),
    /// Flatten search-result JSON files in a directory into CSV tables
    Flatten(FlattenArgs),
}

#[derive(Parser, Debug)]
struct FeaturesArgs {
    /// Data root to scan for crankData directories
    #[arg(long, default_value = "anwb_data")]
    root: PathBuf,

    /// Output log of `<path> <feature-json>` lines
    #[arg(short, long, default_value = "features.log")]
    output: PathBuf,
}

#[derive(Parser, Debug)]
struct FlattenArgs {
    /// Directory of search-result JSON files
    #[arg(long, default_value = ".")]
    dir: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Features(args) => run_features(&args),
        Command::Flatten(args) => run_flatten(&args),
    }
}

fn run_features(args: &FeaturesArgs) -> Result<()> {
    let mut crank_files = Vec::new();
    collect_crank_files(&args.root, &mut crank_files)
        .with_context(|| format!("scanning data root {}", args.root.display()))?;
    crank_files.sort();
    info!(files = crank_files.len(), root = %args.root.display(), "found crank documents");

    let output = File::create(&args.output)
        .with_context(|| format!("creating feature log {}", args.output.display()))?;
    let mut writer = BufWriter::new(output);

    let mut extracted = 0usize;
    let mut discarded = 0usize;
    for path in &crank_files {
        match read_and_extract(path) {
            Ok(features) => {
                let line = serde_json::to_string(&features)?;
                writeln!(writer, "{} {}", path.display(), line)
                    .with_context(|| format!("writing {}", args.output.display()))?;
                extracted += 1;
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "discarding crank record");
                discarded += 1;
            }
        }
    }
    writer.flush()?;

    info!(extracted, discarded, "feature extraction finished");
    Ok(())
}

/// Parse one crank document and run the pipeline. Any error here discards
/// only this record.
fn read_and_extract(path: &Path) -> Result<FeatureRecord> {
    let file = File::open(path)?;
    let record: CrankRecord = serde_json::from_reader(BufReader::new(file))?;
    Ok(extract_features(&record)?)
}

/// Recursively gather `*.json` files inside `crankData` directories.
fn collect_crank_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        if path.file_name().is_some_and(|name| name == CRANK_DATA_DIR) {
            for entry in fs::read_dir(&path)? {
                let file = entry?.path();
                if file.extension().is_some_and(|ext| ext == "json") {
                    files.push(file);
                }
            }
        }
        collect_crank_files(&path, files)?;
    }
    Ok(())
}

fn run_flatten(args: &FlattenArgs) -> Result<()> {
    let mut converted = 0usize;
    let mut failed = 0usize;
    for entry in
        fs::read_dir(&args.dir).with_context(|| format!("reading {}", args.dir.display()))?
    {
        let path = entry?.path();
        if !path.extension().is_some_and(|ext| ext == "json") {
            continue;
        }
        match es_flatten::flatten_file(&path) {
            Ok(dst) => {
                info!(src = %path.display(), dst = %dst.display(), "wrote csv table");
                converted += 1;
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping file");
                failed += 1;
            }
        }
    }

    info!(converted, failed, "flatten finished");
    Ok(())
}
