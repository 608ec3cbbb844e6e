use std::error::Error;
use std::path::Path;

use clap::Args;
use rundex_core::{match_folder, project_records};

use crate::commands::rebuild_index;
use crate::render::format_table;

#[derive(Args, Debug)]
pub struct CdArgs {
    /// Substring of the experiment folder name, matched case-insensitively.
    pub name: String,
}

pub fn run(root: &Path, args: &CdArgs) -> Result<(), Box<dyn Error>> {
    let index = rebuild_index(root)?;
    let matches = match_folder(&index, &args.name);
    match matches.as_slice() {
        [] => println!("No experiments found matching '{}'", args.name),
        [only] => println!("cd {}", only.full_path()),
        _ => {
            println!("Multiple matches found:");
            let columns = ["folder_name", "model", "dataset"];
            println!(
                "{}",
                format_table(&project_records(&index, &matches, &columns))
            );
        }
    }
    Ok(())
}
