use std::error::Error;
use std::path::Path;

use rundex_core::{list_sweeps, load_index};

pub fn run(root: &Path) -> Result<(), Box<dyn Error>> {
    let index = load_index(root)?;
    match list_sweeps(&index) {
        None => println!("No parameter sweep data found"),
        Some(groups) => {
            println!("Found {} parameter sweeps:", groups.len());
            for group in &groups {
                println!("  {} ({} jobs)", group.name, group.jobs);
            }
        }
    }
    Ok(())
}
