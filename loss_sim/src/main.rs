use anyhow::{Context, Result};
use clap::Parser;
use loss_sim::config::DEFAULT_RUN_COUNT;
use loss_sim::prelude::*;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Runs a batch of blackjack table simulations and reports how fast each strategy loses its cash.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file with the simulation properties, the reference 10/100 table is used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of independent simulations to run
    #[arg(short, long, default_value_t = DEFAULT_RUN_COUNT)]
    runs: usize,

    /// Write the statistics as JSON to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print a line for every finished simulation
    #[arg(short, long)]
    verbose: bool,

    /// Seed for reproducible shoes, overrides the seed of the config file
    #[arg(long)]
    seed: Option<u64>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_properties(args: &Args) -> Result<SimulationProperties> {
    let mut properties = match &args.config {
        Some(path) => SimulationProperties::from_json_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => SimulationProperties::default(),
    };
    if let Some(seed) = args.seed {
        properties.seed = Some(seed);
    }
    Ok(properties)
}

fn run_batch<S: StatisticsSink>(
    sink: S,
    properties: &SimulationProperties,
    args: &Args,
) -> Result<Vec<StrategyStatistics>> {
    let reporter = ConsoleReporter::new(io::stdout(), args.verbose);
    let mut runner = SimulationRunner::new(sink, reporter);
    let statistics = runner
        .run(properties, args.runs)
        .context("simulation batch failed")?;
    Ok(statistics)
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let properties = load_properties(&args)?;

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            run_batch(JsonStatisticsSink::new(BufWriter::new(file)), &properties, &args)?;
        }
        None => {
            run_batch(MemoryStatisticsSink::new(), &properties, &args)?;
        }
    }
    Ok(())
}
