use std::error::Error;
use std::path::Path;

use crate::commands::rebuild_index;
use crate::render::format_table;

const LIST_COLUMNS: &[&str] = &[
    "folder_name",
    "model",
    "dataset",
    "lr",
    "best_accuracy",
    "timestamp",
];

pub fn run(root: &Path) -> Result<(), Box<dyn Error>> {
    let index = rebuild_index(root)?;
    if index.is_empty() {
        println!("No experiments found");
        return Ok(());
    }
    println!("{}", format_table(&index.project(LIST_COLUMNS)));
    Ok(())
}
