// src/main.rs
use landmark_smoother::data::{read_observations, DataExporter};
use landmark_smoother::{FilterKind, FrameDriver, SessionSettings, ShapePolicy, SmootherConfig};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

/// Smooth recorded pose and face landmarks and export the result
#[derive(Parser, Debug)]
#[command(name = "landmark_smoother", about = "Temporal smoothing for landmark detections")]
struct Args {
    /// JSON Lines file with one observation per line
    input: PathBuf,

    /// Filter to apply: none, ewma or kalman (overrides the config file)
    #[arg(long)]
    filter: Option<FilterKind>,

    /// JSON smoother configuration
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory that receives the session folder
    #[arg(long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Session folder name (defaults to session_YYYYmmdd_HHMMSS)
    #[arg(long)]
    session: Option<String>,

    /// Reset filter state on any per-entity point count change
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SmootherConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SmootherConfig::default(),
    };
    if let Some(filter) = args.filter {
        config.filter = filter;
    }
    if args.strict {
        config.shape_policy = ShapePolicy::Strict;
    }

    let file = File::open(&args.input)
        .with_context(|| format!("Cannot open landmark file {}", args.input.display()))?;
    let observations = read_observations(BufReader::new(file))
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    if observations.is_empty() {
        warn!(input = %args.input.display(), "No observations found");
    }

    let mut driver = FrameDriver::new(&config).context("Invalid smoother configuration")?;

    let defaults = SessionSettings::default();
    let mut exporter = DataExporter::new(
        args.output.unwrap_or(defaults.output_directory),
        args.session.or(Some(defaults.session_name)),
    );

    for observation in observations {
        if let Some(smoothed) = driver.process(&observation) {
            exporter.add_frame(observation, smoothed);
        }
    }

    let csv_path = exporter.export_csv().context("Failed to export CSV")?;
    let jsonl_path = exporter.export_jsonl().context("Failed to export JSON Lines")?;

    let metrics = driver.metrics();
    info!(
        smoother = driver.smoother_name(),
        processed = metrics.frames_processed,
        skipped = metrics.frames_skipped,
        avg_ms = metrics.avg_processing_time * 1000.0,
        "Smoothing complete"
    );
    println!("{}", csv_path.display());
    println!("{}", jsonl_path.display());

    Ok(())
}
