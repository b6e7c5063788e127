use anyhow::Result;
use beepbrake_core::DetectorConfig;
use beepbrake_cv::{Candidate, CarDetector, FnSink, FrameMetrics, HaarCascade};
use clap::Parser;
use image::GrayImage;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod runner;

#[derive(Parser, Debug)]
#[command(name = "beepbrake", about = "Largest-car detection over a sequence of frames")]
struct Args {
    /// OpenCV cascade XML model
    #[arg(long, value_name = "PATH")]
    cascade: PathBuf,
    /// JSON detector configuration; defaults sized to the cascade window when omitted
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Frames to analyze, in capture order
    #[arg(required = true)]
    frames: Vec<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let cascade = HaarCascade::load(&args.cascade)?;
    let config = match &args.config {
        Some(path) => DetectorConfig::from_json_file(path)?,
        None => DetectorConfig {
            template_size: cascade.original_window_size()?,
            ..Default::default()
        },
    };
    let metrics = Arc::new(FrameMetrics::new());

    let report = FnSink(|frame: &GrayImage, found: Option<Candidate>| match found {
        Some(rect) => info!(frame = ?frame.dimensions(), car = %rect, "car found"),
        None => info!(frame = ?frame.dimensions(), "no car"),
    });
    let mut detector =
        CarDetector::with_instrumentation(cascade, config, report, metrics.clone());

    runner::run_frames(&mut detector, &args.frames)?;

    println!("{}", serde_json::to_string_pretty(&metrics.summary())?);
    Ok(())
}
