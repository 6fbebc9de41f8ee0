use clap::Parser;
use sketchbench_analysis::chart::{render_records, ChartConfig};
use std::{path::PathBuf, process::exit};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Plot the recorded sweep as one panel per scaled value
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// result store written by the runner
    #[arg(short, long, default_value = "records")]
    records: PathBuf,
    /// image file to write
    #[arg(short, long, default_value = "res.png")]
    output: PathBuf,
    #[arg(long, default_value_t = 1200)]
    dpi: u32,
    /// fixed upper bound of the time axis in seconds
    #[arg(long, default_value_t = 150.0)]
    y_max: f64,
    /// scale the time axis to the slowest run instead of --y-max
    #[arg(long)]
    auto_y: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = ChartConfig {
        dpi: cli.dpi,
        y_max: (!cli.auto_y).then_some(cli.y_max),
        ..ChartConfig::default()
    };

    match render_records(&cli.records, &cli.output, &config) {
        Ok(panels) => info!("Wrote {panels} panels to {}", cli.output.to_string_lossy()),
        Err(e) => {
            error!(error = ?e, "Failed to plot {}: {e}", cli.records.to_string_lossy());
            exit(1)
        }
    }
}
