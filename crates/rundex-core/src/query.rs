//! Read-side operations over the experiment index.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::index::ExperimentIndex;
use crate::record::{ExperimentRecord, FIELD_FOLDER_NAME, FIELD_SWEEP_PARENT};

/// Metric used when the caller does not name one.
pub const DEFAULT_METRIC: &str = "best_accuracy";
/// Columns shown by listing and filter queries.
pub const DISPLAY_COLUMNS: &[&str] = &[FIELD_FOLDER_NAME, "model", "dataset", "lr", DEFAULT_METRIC];
/// Extra columns appended to filter output when the index has sweep jobs.
pub const SWEEP_COLUMNS: &[&str] = &["sweep_parent", "job_number"];
/// Columns of the per-sweep analysis table.
pub const SWEEP_ANALYSIS_COLUMNS: &[&str] = &["job_number", "lr", "batch_size", DEFAULT_METRIC];

/// Tabular projection handed to rendering code.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// One sweep parent and the number of jobs recorded under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepGroup {
    pub name: String,
    pub jobs: usize,
}

/// Winning job of a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestJob {
    pub job_number: String,
    pub metric: f64,
    pub full_path: String,
}

/// Per-sweep report: one row per job, best first, plus the winner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepSummary {
    pub table: Table,
    /// Absent when no job in the sweep carries the ranking metric.
    pub best: Option<BestJob>,
}

/// Outcome of a sweep analysis request.
#[derive(Debug, Clone, PartialEq)]
pub enum SweepAnalysis {
    /// The index records no sweep jobs at all.
    NoSweepData,
    /// No record belongs to the requested sweep.
    NotFound,
    Report(SweepSummary),
}

/// Filters records on exact field values and projects the display columns.
///
/// Comparison is typed JSON equality. Filter keys the index has no column
/// for are ignored rather than matching nothing.
pub fn find_experiments(index: &ExperimentIndex, filters: &BTreeMap<String, Value>) -> Table {
    let active: Vec<(&String, &Value)> = filters
        .iter()
        .filter(|(name, _)| index.has_column(name))
        .collect();
    let matches: Vec<&ExperimentRecord> = index
        .records()
        .iter()
        .filter(|record| {
            active
                .iter()
                .all(|&(name, expected)| record.field(name) == Some(expected))
        })
        .collect();
    let mut columns: Vec<&str> = DISPLAY_COLUMNS.to_vec();
    if index.has_column(FIELD_SWEEP_PARENT) {
        columns.extend_from_slice(SWEEP_COLUMNS);
    }
    project_records(index, &matches, &columns)
}

/// Ranks records by a numeric metric, best first.
///
/// Returns `None` when the metric is not a known column. Records without a
/// numeric value for it do not rank; ties keep discovery order.
pub fn top_by_metric<'a>(
    index: &'a ExperimentIndex,
    metric: &str,
    limit: usize,
) -> Option<Vec<&'a ExperimentRecord>> {
    if !index.has_column(metric) {
        return None;
    }
    let mut ranked: Vec<(f64, &ExperimentRecord)> = index
        .records()
        .iter()
        .filter_map(|record| record.metric(metric).map(|value| (value, record)))
        .collect();
    ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    Some(
        ranked
            .into_iter()
            .take(limit)
            .map(|(_, record)| record)
            .collect(),
    )
}

/// Case-insensitive substring match over folder names.
pub fn match_folder<'a>(index: &'a ExperimentIndex, query: &str) -> Vec<&'a ExperimentRecord> {
    let needle = query.to_lowercase();
    index
        .records()
        .iter()
        .filter(|record| record.folder_name().to_lowercase().contains(&needle))
        .collect()
}

/// Lists sweep parents in first-seen order with their job counts.
///
/// Returns `None` when the index has no sweep column at all.
pub fn list_sweeps(index: &ExperimentIndex) -> Option<Vec<SweepGroup>> {
    if !index.has_column(FIELD_SWEEP_PARENT) {
        return None;
    }
    let mut groups: Vec<SweepGroup> = Vec::new();
    for record in index.records() {
        let Some(parent) = record.sweep_parent().filter(|name| !name.is_empty()) else {
            continue;
        };
        match groups.iter_mut().find(|group| group.name == parent) {
            Some(group) => group.jobs += 1,
            None => groups.push(SweepGroup {
                name: parent.to_string(),
                jobs: 1,
            }),
        }
    }
    Some(groups)
}

/// Collects and ranks the jobs of one sweep.
///
/// Jobs are ordered best-first by the ranking metric when the index has it;
/// jobs without the metric sink to the end in discovery order.
pub fn analyze_sweep(index: &ExperimentIndex, name: &str) -> SweepAnalysis {
    if !index.has_column(FIELD_SWEEP_PARENT) {
        return SweepAnalysis::NoSweepData;
    }
    let mut jobs: Vec<&ExperimentRecord> = index
        .records()
        .iter()
        .filter(|record| record.sweep_parent() == Some(name))
        .collect();
    if jobs.is_empty() {
        return SweepAnalysis::NotFound;
    }
    if index.has_column(DEFAULT_METRIC) {
        jobs.sort_by(|a, b| {
            metric_rank(b)
                .partial_cmp(&metric_rank(a))
                .unwrap_or(Ordering::Equal)
        });
    }
    let best = jobs.iter().find_map(|record| {
        record.metric(DEFAULT_METRIC).map(|value| BestJob {
            job_number: record.job_number().unwrap_or("").to_string(),
            metric: value,
            full_path: record.full_path().to_string(),
        })
    });
    let table = project_records(index, &jobs, SWEEP_ANALYSIS_COLUMNS);
    SweepAnalysis::Report(SweepSummary { table, best })
}

/// Projects a record subset onto the given columns, keeping those present.
pub fn project_records(
    index: &ExperimentIndex,
    records: &[&ExperimentRecord],
    columns: &[&str],
) -> Table {
    let kept: Vec<String> = columns
        .iter()
        .filter(|name| index.has_column(name))
        .map(|name| name.to_string())
        .collect();
    let rows = records
        .iter()
        .map(|record| kept.iter().map(|column| record.cell(column)).collect())
        .collect();
    Table {
        columns: kept,
        rows,
    }
}

fn metric_rank(record: &ExperimentRecord) -> f64 {
    record.metric(DEFAULT_METRIC).unwrap_or(f64::NEG_INFINITY)
}
