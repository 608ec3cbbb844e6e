use std::error::Error;
use std::path::Path;

use rundex_core::{create_shortcuts, load_index, DEFAULT_SHORTCUT_COUNT};

pub fn run(root: &Path) -> Result<(), Box<dyn Error>> {
    let index = load_index(root)?;
    let report = create_shortcuts(root, &index, DEFAULT_SHORTCUT_COUNT)?;
    println!("Created shortcuts in {}", report.dir.display());
    Ok(())
}
