use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::{info, warn};
use sisterhood_mmr::algorithm::mortality::SyntheticSurvey;
use sisterhood_mmr::{
    MortalityEstimate, RateConfig, SiblingReaderConfig, estimate_rates, estimate_rates_from_rows,
    load_sibling_dir_async, read_sibling_rows_async,
};

#[global_allocator]
static ALLOC: snmalloc_rs::SnMalloc = snmalloc_rs::SnMalloc;

/// Age-specific maternal mortality rates from survey sibling histories.
#[derive(Debug, Parser)]
#[command(name = "sisterhood-mmr", version, about)]
struct Args {
    /// Parquet file or directory of sibling rows; a synthetic survey is used when omitted
    input: Option<PathBuf>,

    /// Print the estimate as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Fail on the first rejected sibling record
    #[arg(long)]
    strict: bool,

    /// Weights in the input are already fractional
    #[arg(long)]
    prescaled: bool,

    /// Show a progress bar while screening records
    #[arg(long)]
    progress: bool,
}

async fn run(args: &Args, config: &RateConfig) -> anyhow::Result<MortalityEstimate> {
    let Some(input) = &args.input else {
        warn!("No input given, estimating from a synthetic survey");
        let records = SyntheticSurvey::default().generate();
        return Ok(estimate_rates(&records, config)?);
    };

    let reader_config = if args.prescaled {
        SiblingReaderConfig::prescaled()
    } else {
        SiblingReaderConfig::default()
    };
    let rows = if input.is_dir() {
        load_sibling_dir_async(input, &reader_config).await
    } else {
        read_sibling_rows_async(input, &reader_config).await
    };
    let rows = rows.with_context(|| format!("Failed to read sibling table {}", input.display()))?;

    estimate_rates_from_rows(&rows, reader_config.weight_scale, config)
        .context("Failed to estimate maternal mortality rates")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = RateConfig::builder().show_progress(args.progress).build();
    info!("{config}");

    let estimate = run(&args, &config).await?;
    if args.strict {
        estimate.screening.ensure_no_rejections()?;
    }

    let screening = &estimate.screening;
    info!(
        "{} records: {} exposed, {} excluded, {} rejected",
        screening.total_records,
        screening.exposed,
        screening.excluded(),
        screening.rejected.len()
    );
    if let Some(period) = screening.exposure_period_label() {
        info!("Exposure period: {period}");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&estimate)?);
    } else {
        println!("{}", estimate.rates);
    }

    Ok(())
}
