use anyhow::{Context, Result};
use clap::Parser;
use headshot_cropper::codec::DEFAULT_JPEG_QUALITY;
use headshot_cropper::input::load_entries;
use headshot_cropper::{load_detector, HttpFetcher, JpegCodec, RecordPipeline, EXPAND_FACTOR};
use log::{error, info, warn};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(author, version, about = "Download portraits and save square headshot crops around the detected face")]
struct Args {
    /// JSON list of {"name", "url"} records
    #[clap(short, long, value_parser, default_value = "input.json")]
    input: PathBuf,

    /// Output directory for cropped headshots
    #[clap(short, long, value_parser, default_value = "output")]
    output_dir: PathBuf,

    /// Directory holding the face detection model
    #[clap(short, long, value_parser, default_value = "models")]
    models_dir: PathBuf,

    /// JPEG quality for saved crops (1-100)
    #[clap(short, long, default_value_t = DEFAULT_JPEG_QUALITY)]
    quality: u8,

    /// Download the face detection model if it is missing
    #[clap(long)]
    fetch_model: bool,
}

/// Main program logic
fn run(args: Args) -> Result<()> {
    info!("Initializing face detector from {:?}", args.models_dir);
    let detector = load_detector(&args.models_dir, args.fetch_model)
        .context("Failed to initialize face detector")?;

    let entries = load_entries(&args.input)?;
    info!("Loaded {} records from {:?}", entries.len(), args.input);

    // Create output directory if it doesn't exist
    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", args.output_dir))?;

    let pipeline = RecordPipeline::new(
        HttpFetcher::new(),
        JpegCodec::new(args.quality),
        detector,
        args.output_dir.clone(),
        EXPAND_FACTOR,
    );

    let start_time = Instant::now();
    let summary = pipeline.run_batch(&entries);

    info!("Processing complete.");
    info!(
        "Saved {} of {} records ({} without a face, {} failed) in {} seconds",
        summary.saved,
        summary.total(),
        summary.skipped,
        summary.failed,
        start_time.elapsed().as_secs()
    );

    if summary.saved == 0 && summary.total() > 0 {
        warn!("No headshots were saved");
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = Args::parse();
    run(args).map_err(|err| {
        error!("An error occurred: {:#}", err);
        err
    })
}
