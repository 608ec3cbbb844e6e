//! Age-based cleanup of experiment directories.

use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::discover::{read_document, sorted_dirs};
use crate::errors::{ErrorInfo, RundexError};
use crate::query::DEFAULT_METRIC;
use crate::record::dir_name;
use crate::RESULTS_FILE;

/// Age and preservation rules applied by [`cleanup_old_experiments`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetentionPolicy {
    /// Directories modified within this many days are never touched.
    pub keep_days: u64,
    /// Results at or above this metric value exempt a directory from removal.
    pub preserve_threshold: f64,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            keep_days: 30,
            preserve_threshold: 0.9,
        }
    }
}

/// One cleanup decision about a stale directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CleanupAction {
    /// Preserved for its recorded results.
    Kept { folder: String },
    /// Deleted recursively.
    Removed { folder: String },
}

/// Every decision taken during one cleanup pass, in traversal order.
/// Directories younger than the cutoff produce no entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CleanupReport {
    pub actions: Vec<CleanupAction>,
}

impl CleanupReport {
    /// Number of directories deleted.
    pub fn removed(&self) -> usize {
        self.actions
            .iter()
            .filter(|action| matches!(action, CleanupAction::Removed { .. }))
            .count()
    }
}

/// Deletes stale experiment directories under the root.
///
/// A directory is stale when its modification time predates the policy
/// cutoff. Stale directories whose results meet the preservation threshold
/// are kept. Every top-level directory is considered, whether or not it
/// carries experiment metadata.
pub fn cleanup_old_experiments(
    root: &Path,
    policy: &RetentionPolicy,
) -> Result<CleanupReport, RundexError> {
    let cutoff = SystemTime::now()
        .checked_sub(Duration::from_secs(policy.keep_days.saturating_mul(86_400)))
        .unwrap_or(UNIX_EPOCH);
    let mut report = CleanupReport::default();
    for dir in sorted_dirs(root)? {
        if dir_modified(&dir)? >= cutoff {
            continue;
        }
        let folder = dir_name(&dir);
        if best_metric(&dir)? >= policy.preserve_threshold {
            report.actions.push(CleanupAction::Kept { folder });
            continue;
        }
        fs::remove_dir_all(&dir).map_err(|err| {
            RundexError::Retention(
                ErrorInfo::new("retention-remove", "failed to remove experiment directory")
                    .with_context("path", dir.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
        report.actions.push(CleanupAction::Removed { folder });
    }
    Ok(report)
}

fn dir_modified(dir: &Path) -> Result<SystemTime, RundexError> {
    let metadata = fs::metadata(dir).map_err(|err| stat_error(dir, err))?;
    metadata.modified().map_err(|err| stat_error(dir, err))
}

/// Reads the ranking metric from a directory's results. Directories without
/// a results document, or without the metric, rank at zero.
fn best_metric(dir: &Path) -> Result<f64, RundexError> {
    let path = dir.join(RESULTS_FILE);
    if !path.is_file() {
        return Ok(0.0);
    }
    let results = read_document(&path)?;
    Ok(results
        .get(DEFAULT_METRIC)
        .and_then(Value::as_f64)
        .unwrap_or(0.0))
}

fn stat_error(dir: &Path, err: std::io::Error) -> RundexError {
    RundexError::Retention(
        ErrorInfo::new("retention-stat", "failed to read directory metadata")
            .with_context("path", dir.display().to_string())
            .with_hint(err.to_string()),
    )
}
