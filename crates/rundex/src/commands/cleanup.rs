use std::error::Error;
use std::path::Path;

use clap::Args;
use rundex_core::{cleanup_old_experiments, CleanupAction, RetentionPolicy};

#[derive(Args, Debug)]
pub struct CleanupArgs {
    /// Age in days beyond which experiments become removable.
    #[arg(long, default_value_t = RetentionPolicy::default().keep_days)]
    pub days: u64,
}

pub fn run(root: &Path, args: &CleanupArgs) -> Result<(), Box<dyn Error>> {
    let policy = RetentionPolicy {
        keep_days: args.days,
        ..RetentionPolicy::default()
    };
    let report = cleanup_old_experiments(root, &policy)?;
    for action in &report.actions {
        match action {
            CleanupAction::Kept { folder } => {
                println!("Keeping high-performing experiment: {folder}");
            }
            CleanupAction::Removed { folder } => {
                println!("Removing old experiment: {folder}");
            }
        }
    }
    println!("Removed {} old experiments", report.removed());
    Ok(())
}
