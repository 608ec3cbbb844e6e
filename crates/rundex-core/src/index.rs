//! Persisted CSV index of discovered experiments.

use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};

use crate::discover::scan_experiments;
use crate::errors::{ErrorInfo, RundexError};
use crate::query::Table;
use crate::record::ExperimentRecord;
use crate::INDEX_FILE;

/// In-memory view of the experiment index.
///
/// Columns are the union of all record fields in first-seen order; records
/// keep their discovery order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExperimentIndex {
    columns: Vec<String>,
    records: Vec<ExperimentRecord>,
}

impl ExperimentIndex {
    /// Builds the in-memory index from scanned records.
    pub fn from_records(records: Vec<ExperimentRecord>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for record in &records {
            for (name, _) in record.fields() {
                if !columns.iter().any(|existing| existing == name) {
                    columns.push(name.clone());
                }
            }
        }
        Self { columns, records }
    }

    pub fn records(&self) -> &[ExperimentRecord] {
        &self.records
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when the column union contains `name`.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|column| column == name)
    }

    /// Projects every record onto the given columns, keeping those present.
    pub fn project(&self, columns: &[&str]) -> Table {
        let kept: Vec<String> = columns
            .iter()
            .filter(|name| self.has_column(name))
            .map(|name| name.to_string())
            .collect();
        let rows = self
            .records
            .iter()
            .map(|record| kept.iter().map(|column| record.cell(column)).collect())
            .collect();
        Table {
            columns: kept,
            rows,
        }
    }

    /// Writes the index as CSV, overwriting any previous version. An index
    /// with no records becomes an empty file.
    pub fn write_csv(&self, path: &Path) -> Result<(), RundexError> {
        if self.records.is_empty() {
            return fs::write(path, "").map_err(|err| index_error("index-write", path, err));
        }
        let mut writer =
            csv::Writer::from_path(path).map_err(|err| index_error("index-open", path, err))?;
        writer
            .write_record(&self.columns)
            .map_err(|err| index_error("index-write-header", path, err))?;
        for record in &self.records {
            let row: Vec<String> = self
                .columns
                .iter()
                .map(|column| record.cell(column))
                .collect();
            writer
                .write_record(&row)
                .map_err(|err| index_error("index-write-row", path, err))?;
        }
        writer
            .flush()
            .map_err(|err| index_error("index-flush", path, err))
    }

    /// Loads a previously written index file.
    pub fn read_csv(path: &Path) -> Result<Self, RundexError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(|err| index_error("index-read", path, err))?;
        let columns: Vec<String> = reader
            .headers()
            .map_err(|err| index_error("index-header", path, err))?
            .iter()
            .map(|name| name.to_string())
            .collect();
        let mut records = Vec::new();
        for result in reader.records() {
            let row = result.map_err(|err| index_error("index-record", path, err))?;
            records.push(ExperimentRecord::from_row(&columns, row.iter()));
        }
        Ok(Self { columns, records })
    }
}

/// Location of the persisted index inside an outputs root.
pub fn index_path(root: &Path) -> PathBuf {
    root.join(INDEX_FILE)
}

/// Rebuilds the index from disk and persists it, returning the fresh view.
pub fn build_index(root: &Path) -> Result<ExperimentIndex, RundexError> {
    let records = scan_experiments(root)?;
    let index = ExperimentIndex::from_records(records);
    index.write_csv(&index_path(root))?;
    Ok(index)
}

/// Loads the persisted index, or an empty one when none has been written.
pub fn load_index(root: &Path) -> Result<ExperimentIndex, RundexError> {
    let path = index_path(root);
    if !path.exists() {
        return Ok(ExperimentIndex::default());
    }
    ExperimentIndex::read_csv(&path)
}

fn index_error(code: &str, path: &Path, err: impl Display) -> RundexError {
    RundexError::Index(
        ErrorInfo::new(code, "experiment index I/O failure")
            .with_context("path", path.display().to_string())
            .with_hint(err.to_string()),
    )
}
