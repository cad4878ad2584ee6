use anyhow::Result;
use clap::Parser;
use covalence_core::metrics::init_logging;
use covalence_core::Lab;
use covalence_lib::scenario::{Orchestrator, Scenario};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Workload to run
    #[arg(short, long, value_enum, default_value = "all")]
    scenario: Scenario,

    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Rounds per scenario
    #[arg(short, long, default_value_t = 10)]
    rounds: usize,

    /// Overrides the seed from the config file
    #[arg(long)]
    seed: Option<u64>,

    /// Default log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let mut config = covalence_lib::config::load(&args.config)?;
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let lab = Lab::new(config)?;
    let metrics = lab.metrics.clone();
    let mut orchestrator = Orchestrator::new(lab);
    let summary = orchestrator.run(args.scenario, args.rounds)?;

    metrics.log_summary();
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
