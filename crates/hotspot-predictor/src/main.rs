//! Crime Hotspot Prediction CLI
//!
//! Predicts a risk tier and patrol deployment for every district at a given
//! month, weekday and hour.
//!
//! Usage:
//!   predict-hotspots --month June --day Monday --hour 14 \
//!                    --model data/gradient_boosting_model.json \
//!                    --zones data/district.json \
//!                    --output hotspots.json --geojson hotspots.geojson

use anyhow::Result;
use clap::Parser;
use hotspot_predictor::{
    normalize,
    render::{text_report, to_geojson},
    ExecutionMode, RenderStyle, Runtime, RuntimeConfig,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "predict-hotspots",
    about = "Predict crime hotspots and patrol deployment per district"
)]
struct Args {
    /// Month name (e.g. June)
    #[arg(short, long)]
    month: String,

    /// Day of week (e.g. Monday)
    #[arg(short, long)]
    day: String,

    /// Hour of day, 0-23
    #[arg(short = 'H', long, allow_negative_numbers = true)]
    hour: i64,

    /// Path to model JSON file [env: HOTSPOT_MODEL_PATH]
    #[arg(long)]
    model: Option<PathBuf>,

    /// Path to district coordinates JSON file [env: HOTSPOT_ZONES_PATH]
    #[arg(short = 'z', long)]
    zones: Option<PathBuf>,

    /// Output JSON file (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write a GeoJSON render export to this path
    #[arg(long)]
    geojson: Option<PathBuf>,

    /// Predict districts in parallel [env: HOTSPOT_PARALLEL]
    #[arg(long)]
    parallel: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("{}", "=".repeat(60));
    info!("Crime Hotspot Prediction");
    info!("{}", "=".repeat(60));

    // Validate input before touching the model
    let ctx = normalize(&args.month, &args.day, args.hour)?;

    let mut config = RuntimeConfig::from_env();
    if let Some(model) = args.model {
        config.model_path = model;
    }
    if let Some(zones) = args.zones {
        config.zones_path = zones;
    }
    if args.parallel {
        config.mode = ExecutionMode::Parallel;
    }

    let runtime = Runtime::load(&config)?;
    let result = runtime.run(&ctx)?;

    // Report
    eprint!("{}", text_report(&result));

    let envelope = serde_json::json!({
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "context": {
            "month": ctx.month_label(),
            "day": ctx.day_label(),
            "hour": ctx.hour(),
            "codes": ctx,
        },
        "summary": result.tier_counts(),
        "result": result,
    });

    match &args.output {
        Some(path) => {
            info!("Writing output to {:?}", path);
            let file = File::create(path)?;
            let writer = BufWriter::new(file);
            serde_json::to_writer_pretty(writer, &envelope)?;
        }
        None => println!("{}", serde_json::to_string_pretty(&envelope)?),
    }

    if let Some(path) = &args.geojson {
        info!("Writing GeoJSON to {:?}", path);
        let geojson = to_geojson(&result, &RenderStyle::default());
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &geojson)?;
    }

    // Summary
    info!("{}", "=".repeat(60));
    info!("SUMMARY for {}", ctx);
    info!("{}", "=".repeat(60));
    for (tier, count) in result.tier_counts() {
        info!("  {}: {} districts", tier, count);
    }

    Ok(())
}
