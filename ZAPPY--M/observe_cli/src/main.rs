use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use zappy_observations::{ObservationConfig, ObservationDriver, RemovalRate, RunSummary};

#[derive(Parser, Debug)]
#[command(
    name = "observe",
    version,
    about = "Generates partial observations by removing a fraction of actions from solved plans"
)]
struct Cli {
    /// TOML configuration file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory holding the solved plans.
    #[arg(long)]
    source: Option<PathBuf>,
    /// Directory receiving the partial observations.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Plan file extension.
    #[arg(long)]
    extension: Option<String>,
    /// Fraction of actions to remove, in [0, 1).
    #[arg(long)]
    rate: Option<f64>,
    /// Seed for the run-wide random generator.
    #[arg(long)]
    seed: Option<u64>,
    /// JSON-lines run log.
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// JSON run report.
    #[arg(long)]
    report: Option<PathBuf>,
    /// Parse and sample without writing observation files.
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut console = stdout.lock();
    run(cli, &mut console)?;
    Ok(())
}

fn run<W: Write>(cli: Cli, console: &mut W) -> Result<RunSummary> {
    let config = resolve_config(cli)?;
    let mut driver = ObservationDriver::new(config).context("preparing observation run")?;
    Ok(driver.run(console)?)
}

fn resolve_config(cli: Cli) -> Result<ObservationConfig> {
    let mut config = match &cli.config {
        Some(path) => ObservationConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ObservationConfig::default(),
    };
    if let Some(source) = cli.source {
        config.source_dir = source;
    }
    if let Some(output) = cli.output {
        config.output_dir = output;
    }
    if let Some(extension) = cli.extension {
        config.extension = extension;
    }
    if let Some(rate) = cli.rate {
        config.removal_rate = RemovalRate::new(rate)?;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if cli.log_file.is_some() {
        config.log_file = cli.log_file;
    }
    if cli.report.is_some() {
        config.report_file = cli.report;
    }
    config.dry_run |= cli.dry_run;
    config.validate()?;
    Ok(config)
}
