//! Settlement plan from a scenario file
//!
//! The scenario holds `participants`, `expenses` and `settlements`; the plan
//! for every currency is printed as JSON.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tally_settlement::{Config, Scenario};

#[derive(Parser, Debug)]
#[command(
    name = "tally-settle",
    version,
    about = "Print who pays whom for a shared-expense scenario"
)]
struct Args {
    /// Scenario JSON file
    scenario: PathBuf,

    /// TOML config file (TALLY_* environment variables still apply)
    #[arg(short, long, env = "TALLY_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    }
    .with_overrides(|key| std::env::var(key).ok())?;

    let scenario = Scenario::from_file(&args.scenario)
        .with_context(|| format!("reading scenario {}", args.scenario.display()))?;
    let report = scenario.report(config)?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
