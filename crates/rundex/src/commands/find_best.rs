use std::error::Error;
use std::path::Path;

use clap::Args;
use rundex_core::{project_records, top_by_metric, DEFAULT_METRIC};

use crate::commands::rebuild_index;
use crate::render::format_table;

#[derive(Args, Debug)]
pub struct FindBestArgs {
    /// Results metric to rank by.
    #[arg(default_value = DEFAULT_METRIC)]
    pub metric: String,
    /// How many experiments to show.
    #[arg(default_value_t = 5)]
    pub count: usize,
}

pub fn run(root: &Path, args: &FindBestArgs) -> Result<(), Box<dyn Error>> {
    let index = rebuild_index(root)?;
    let Some(ranked) = top_by_metric(&index, &args.metric, args.count) else {
        println!("Metric '{}' not found", args.metric);
        return Ok(());
    };
    println!();
    println!("Top {} experiments by {}:", args.count, args.metric);
    let columns = ["folder_name", "model", "dataset", args.metric.as_str()];
    println!(
        "{}",
        format_table(&project_records(&index, &ranked, &columns))
    );
    Ok(())
}
