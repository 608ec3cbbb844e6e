use std::error::Error;
use std::path::Path;

use rundex_core::{build_index, ExperimentIndex};

pub mod analyze_sweep;
pub mod cd;
pub mod cleanup;
pub mod find_best;
pub mod list;
pub mod shortcuts;
pub mod sweeps;

/// Rescans the outputs root, persists the index and reports the refresh.
pub(crate) fn rebuild_index(root: &Path) -> Result<ExperimentIndex, Box<dyn Error>> {
    let index = build_index(root)?;
    println!("Created experiment index with {} experiments", index.len());
    Ok(index)
}
