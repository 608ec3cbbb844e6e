use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use commands::{
    analyze_sweep::{self, AnalyzeSweepArgs},
    cd::{self, CdArgs},
    cleanup::{self, CleanupArgs},
    find_best::{self, FindBestArgs},
    list, shortcuts, sweeps,
};

mod commands;
mod render;

#[derive(Parser, Debug)]
#[command(name = "rundex", about = "Training run output organizer CLI")]
struct Cli {
    /// Outputs directory holding experiment runs.
    #[arg(long, global = true, default_value = "./outputs")]
    root: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "snake_case")]
enum Command {
    /// Rebuild the index and list every experiment.
    List,
    /// Rank experiments by a results metric.
    FindBest(FindBestArgs),
    /// Print a change-directory command for a matching experiment.
    Cd(CdArgs),
    /// Remove old low-performing experiment directories.
    Cleanup(CleanupArgs),
    /// Regenerate symlinks to the best experiments.
    Shortcuts,
    /// List recorded parameter sweeps.
    Sweeps,
    /// Summarize one parameter sweep.
    AnalyzeSweep(AnalyzeSweepArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    match cli.command {
        Command::List => list::run(&cli.root),
        Command::FindBest(args) => find_best::run(&cli.root, &args),
        Command::Cd(args) => cd::run(&cli.root, &args),
        Command::Cleanup(args) => cleanup::run(&cli.root, &args),
        Command::Shortcuts => shortcuts::run(&cli.root),
        Command::Sweeps => sweeps::run(&cli.root),
        Command::AnalyzeSweep(args) => analyze_sweep::run(&cli.root, &args),
    }
}
