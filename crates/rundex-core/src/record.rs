//! Flat experiment records assembled from on-disk metadata documents.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{ErrorInfo, RundexError};

/// Field holding the experiment directory's own name.
pub const FIELD_FOLDER_NAME: &str = "folder_name";
/// Field holding the absolute path of the experiment directory.
pub const FIELD_FULL_PATH: &str = "full_path";
/// Field naming the sweep parent directory, present on sweep jobs only.
pub const FIELD_SWEEP_PARENT: &str = "sweep_parent";
/// Field naming the job subdirectory, present on sweep jobs only.
pub const FIELD_JOB_NUMBER: &str = "job_number";

/// Fields injected during discovery rather than read from documents. They
/// hold names and paths, so index reloads keep them as plain strings.
pub const DERIVED_FIELDS: &[&str] = &[
    FIELD_FOLDER_NAME,
    FIELD_FULL_PATH,
    FIELD_SWEEP_PARENT,
    FIELD_JOB_NUMBER,
];

/// One discovered experiment: metadata, results and derived location fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExperimentRecord {
    fields: BTreeMap<String, Value>,
}

impl ExperimentRecord {
    /// Assembles a record from parsed metadata documents.
    ///
    /// Results fields override metadata fields on key collision. The
    /// directory's own name and resolved path are injected last and always
    /// win. Both documents must be JSON objects.
    pub fn from_documents(
        dir: &Path,
        info: Value,
        results: Option<Value>,
    ) -> Result<Self, RundexError> {
        let mut fields = object_fields(dir, crate::INFO_FILE, info)?;
        if let Some(results) = results {
            for (key, value) in object_fields(dir, crate::RESULTS_FILE, results)? {
                fields.insert(key, value);
            }
        }
        let full_path = dir.canonicalize().map_err(|err| {
            RundexError::Discovery(
                ErrorInfo::new("record-path", "failed to resolve experiment path")
                    .with_context("path", dir.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
        fields.insert(FIELD_FOLDER_NAME.to_string(), Value::String(dir_name(dir)));
        fields.insert(
            FIELD_FULL_PATH.to_string(),
            Value::String(full_path.display().to_string()),
        );
        Ok(Self { fields })
    }

    /// Rebuilds a record from an index header/row pair.
    ///
    /// Cells that parse as JSON numbers or booleans come back typed; all
    /// other cells stay strings, and derived fields skip inference entirely
    /// so numeric-looking folder names survive a reload. Empty cells mean
    /// the field was absent.
    pub fn from_row<'a>(columns: &[String], cells: impl Iterator<Item = &'a str>) -> Self {
        let mut fields = BTreeMap::new();
        for (column, cell) in columns.iter().zip(cells) {
            if cell.is_empty() {
                continue;
            }
            fields.insert(column.clone(), parse_cell(column, cell));
        }
        Self { fields }
    }

    /// Marks the record as a job belonging to a sweep parent.
    pub fn tag_sweep(&mut self, parent: &str, job: &str) {
        self.fields.insert(
            FIELD_SWEEP_PARENT.to_string(),
            Value::String(parent.to_string()),
        );
        self.fields.insert(
            FIELD_JOB_NUMBER.to_string(),
            Value::String(job.to_string()),
        );
    }

    /// Returns the raw value of a field, if present.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Reads a field as a float, accepting any JSON numeric representation.
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.fields.get(name).and_then(Value::as_f64)
    }

    /// Iterates fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    pub fn folder_name(&self) -> &str {
        self.text_field(FIELD_FOLDER_NAME)
    }

    pub fn full_path(&self) -> &str {
        self.text_field(FIELD_FULL_PATH)
    }

    pub fn sweep_parent(&self) -> Option<&str> {
        self.fields.get(FIELD_SWEEP_PARENT).and_then(Value::as_str)
    }

    pub fn job_number(&self) -> Option<&str> {
        self.fields.get(FIELD_JOB_NUMBER).and_then(Value::as_str)
    }

    /// Renders a field for an index cell. Absent fields and nulls are empty,
    /// strings stay raw, everything else uses its JSON form.
    pub fn cell(&self, name: &str) -> String {
        match self.fields.get(name) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
        }
    }

    fn text_field(&self, name: &str) -> &str {
        self.fields.get(name).and_then(Value::as_str).unwrap_or("")
    }
}

fn object_fields(
    dir: &Path,
    file: &str,
    document: Value,
) -> Result<BTreeMap<String, Value>, RundexError> {
    match document {
        Value::Object(map) => Ok(map.into_iter().collect()),
        other => Err(RundexError::Metadata(
            ErrorInfo::new("metadata-shape", "metadata document is not a JSON object")
                .with_context("path", dir.join(file).display().to_string())
                .with_context("found", value_kind(&other)),
        )),
    }
}

fn parse_cell(column: &str, cell: &str) -> Value {
    if DERIVED_FIELDS.contains(&column) {
        return Value::String(cell.to_string());
    }
    match serde_json::from_str(cell) {
        Ok(value @ (Value::Bool(_) | Value::Number(_))) => value,
        _ => Value::String(cell.to_string()),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub(crate) fn dir_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string()
}
