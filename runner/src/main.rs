use clap::Parser;
use sketchbench_runner::{config::SweepConfig, sweep::Sweep};
use std::{path::PathBuf, process::exit};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Time the reference and candidate sketching tools over a grid of k-mer sizes and scaled values
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// input sequence file handed to both tools
    #[arg(short = 'f', long)]
    filename: PathBuf,
    /// optional YAML file overriding the sweep axes, seed, store path or tool executables
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => match SweepConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load config {}: {e}", path.to_string_lossy());
                exit(1)
            }
        },
        None => SweepConfig::default(),
    };

    if config.preflight_checks() {
        error!("Config contains errors, refusing to start the sweep");
        exit(2)
    }

    info!(
        "Sweeping {} grid points on {}, storing results in {}",
        config.grid().len(),
        cli.filename.to_string_lossy(),
        config.records.to_string_lossy()
    );

    match Sweep::from_config(&cli.filename, &config).run_to(&config.records) {
        Ok(table) => info!("Recorded {} rows", table.len()),
        Err(e) => {
            error!(error = ?e, "Sweep aborted: {e}");
            exit(1)
        }
    }
}
