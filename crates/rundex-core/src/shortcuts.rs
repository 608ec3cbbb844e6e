//! Symlink shortcuts to the best-performing experiments.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, RundexError};
use crate::index::ExperimentIndex;
use crate::query::{top_by_metric, DEFAULT_METRIC};
use crate::record::ExperimentRecord;
use crate::SHORTCUTS_DIR;

/// How many top experiments receive a shortcut link.
pub const DEFAULT_SHORTCUT_COUNT: usize = 5;

/// Links created by one regeneration pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutReport {
    /// Directory holding the links.
    pub dir: PathBuf,
    /// Link names created, in rank order.
    pub created: Vec<String>,
}

/// Regenerates the shortcut links under the outputs root.
///
/// Existing symlinks are cleared first; regular files are left alone. The
/// top experiments by the ranking metric each get a link named after their
/// model, dataset and rounded metric, pointing at the experiment directory.
/// Selections whose directory no longer exists, or whose link name was
/// already taken this pass, are skipped.
pub fn create_shortcuts(
    root: &Path,
    index: &ExperimentIndex,
    count: usize,
) -> Result<ShortcutReport, RundexError> {
    let dir = root.join(SHORTCUTS_DIR);
    fs::create_dir_all(&dir).map_err(|err| shortcut_error("shortcut-dir", &dir, err))?;
    clear_links(&dir)?;
    let mut created: Vec<String> = Vec::new();
    let Some(ranked) = top_by_metric(index, DEFAULT_METRIC, count) else {
        return Ok(ShortcutReport { dir, created });
    };
    for record in ranked {
        let target = PathBuf::from(record.full_path());
        if !target.exists() {
            continue;
        }
        let Some(metric) = record.metric(DEFAULT_METRIC) else {
            continue;
        };
        let name = format!(
            "top_{}_{}_{:.3}",
            label(record, "model"),
            label(record, "dataset"),
            metric,
        );
        if created.iter().any(|existing| existing == &name) {
            continue;
        }
        make_link(&target, &dir.join(&name))?;
        created.push(name);
    }
    Ok(ShortcutReport { dir, created })
}

fn label(record: &ExperimentRecord, field: &str) -> String {
    let text = record.cell(field);
    if text.is_empty() {
        "unknown".to_string()
    } else {
        text
    }
}

fn clear_links(dir: &Path) -> Result<(), RundexError> {
    let entries = fs::read_dir(dir).map_err(|err| shortcut_error("shortcut-list", dir, err))?;
    for entry in entries.filter_map(|entry| entry.ok()) {
        let path = entry.path();
        let is_link = fs::symlink_metadata(&path)
            .map(|meta| meta.file_type().is_symlink())
            .unwrap_or(false);
        if is_link {
            fs::remove_file(&path).map_err(|err| shortcut_error("shortcut-clear", &path, err))?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn make_link(target: &Path, link: &Path) -> Result<(), RundexError> {
    std::os::unix::fs::symlink(target, link)
        .map_err(|err| shortcut_error("shortcut-link", link, err))
}

#[cfg(windows)]
fn make_link(target: &Path, link: &Path) -> Result<(), RundexError> {
    std::os::windows::fs::symlink_dir(target, link)
        .map_err(|err| shortcut_error("shortcut-link", link, err))
}

fn shortcut_error(code: &str, path: &Path, err: std::io::Error) -> RundexError {
    RundexError::Shortcut(
        ErrorInfo::new(code, "failed to maintain shortcut links")
            .with_context("path", path.display().to_string())
            .with_hint(err.to_string()),
    )
}
