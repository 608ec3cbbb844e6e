use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use rundex_train::{write_run_artifacts, TrainConfig};

#[derive(Parser, Debug)]
#[command(
    name = "rundex-train",
    about = "Record run metadata for a resolved training configuration"
)]
struct Cli {
    /// Resolved training configuration in YAML form.
    #[arg(long)]
    config: PathBuf,
    /// Directory that receives the run artifacts.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = TrainConfig::load(&cli.config)?;

    log::info!("Working directory: {}", cli.out.display());
    log::info!("Experiment name: {}", config.experiment_name());

    let summary = write_run_artifacts(&cli.out, &config)?;
    log::info!("Recorded run metadata at {}", summary.timestamp);
    Ok(())
}
