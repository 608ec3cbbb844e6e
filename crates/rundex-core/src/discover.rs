//! Directory walk that locates experiment metadata under an outputs root.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::errors::{ErrorInfo, RundexError};
use crate::record::{dir_name, ExperimentRecord};
use crate::{INFO_FILE, RESULTS_FILE, SWEEP_JOB_PREFIX};

/// Scans the outputs root for experiment directories.
///
/// A directory holding the metadata document is indexed directly. A
/// directory without one becomes a sweep parent when it contains `job_*`
/// subdirectories, each of which is indexed with its parent and job name
/// recorded. Anything else under the root is skipped. Both levels are
/// traversed in name order so repeated scans agree.
pub fn scan_experiments(root: &Path) -> Result<Vec<ExperimentRecord>, RundexError> {
    let mut records = Vec::new();
    for dir in sorted_dirs(root)? {
        if dir.join(INFO_FILE).is_file() {
            records.push(read_record(&dir)?);
            continue;
        }
        for job_dir in sorted_dirs(&dir)? {
            let is_job = job_dir
                .file_name()
                .and_then(|name| name.to_str())
                .map_or(false, |name| name.starts_with(SWEEP_JOB_PREFIX));
            if !is_job || !job_dir.join(INFO_FILE).is_file() {
                continue;
            }
            let mut record = read_record(&job_dir)?;
            record.tag_sweep(&dir_name(&dir), &dir_name(&job_dir));
            records.push(record);
        }
    }
    Ok(records)
}

pub(crate) fn sorted_dirs(root: &Path) -> Result<Vec<PathBuf>, RundexError> {
    let entries = fs::read_dir(root).map_err(|err| {
        RundexError::Discovery(
            ErrorInfo::new("discover-read-dir", "failed to list outputs directory")
                .with_context("path", root.display().to_string())
                .with_hint(err.to_string()),
        )
    })?;
    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();
    Ok(dirs)
}

fn read_record(dir: &Path) -> Result<ExperimentRecord, RundexError> {
    let info = read_document(&dir.join(INFO_FILE))?;
    let results_path = dir.join(RESULTS_FILE);
    let results = if results_path.is_file() {
        Some(read_document(&results_path)?)
    } else {
        None
    };
    ExperimentRecord::from_documents(dir, info, results)
}

pub(crate) fn read_document(path: &Path) -> Result<Value, RundexError> {
    let text = fs::read_to_string(path).map_err(|err| {
        RundexError::Metadata(
            ErrorInfo::new("metadata-read", "failed to read metadata document")
                .with_context("path", path.display().to_string())
                .with_hint(err.to_string()),
        )
    })?;
    serde_json::from_str(&text).map_err(|err| {
        RundexError::Metadata(
            ErrorInfo::new("metadata-parse", "failed to parse metadata document")
                .with_context("path", path.display().to_string())
                .with_hint(err.to_string()),
        )
    })
}
