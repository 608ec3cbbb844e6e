use std::error::Error;
use std::path::Path;

use clap::Args;
use rundex_core::{analyze_sweep, load_index, SweepAnalysis};

use crate::render::format_table;

#[derive(Args, Debug)]
pub struct AnalyzeSweepArgs {
    /// Sweep parent directory name.
    pub name: String,
}

pub fn run(root: &Path, args: &AnalyzeSweepArgs) -> Result<(), Box<dyn Error>> {
    let index = load_index(root)?;
    match analyze_sweep(&index, &args.name) {
        SweepAnalysis::NoSweepData => {
            println!("No parameter sweep data found in experiment index");
        }
        SweepAnalysis::NotFound => println!("No sweep results found for: {}", args.name),
        SweepAnalysis::Report(summary) => {
            println!();
            println!("Parameter Sweep Analysis: {}", args.name);
            println!("{}", "=".repeat(50));
            println!("{}", format_table(&summary.table));
            if let Some(best) = &summary.best {
                println!();
                println!("Best configuration:");
                println!("  Job: {}", best.job_number);
                println!("  Accuracy: {:.4}", best.metric);
                println!("  Path: {}", best.full_path);
            }
        }
    }
    Ok(())
}
