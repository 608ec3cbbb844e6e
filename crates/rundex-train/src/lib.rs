//! Run metadata capture for training entrypoints.
//!
//! A training process hands its resolved configuration to this crate, which
//! persists the two files the indexer picks up later: the full configuration
//! as YAML and a short `experiment_info.json` summary.

use std::fmt::Display;
use std::fs;
use std::io;
use std::path::Path;

use chrono::Utc;
use rundex_core::{ErrorInfo, RundexError, INFO_FILE};
use serde::{Deserialize, Serialize};

/// File name for the resolved configuration written next to the run outputs.
pub const FULL_CONFIG_FILE: &str = "full_config.yaml";

#[derive(Debug, Clone, Deserialize)]
struct SummaryFields {
    experiment: ExperimentGroup,
    model: ModelGroup,
    dataset: DatasetGroup,
    hyperparam: HyperparamGroup,
}

#[derive(Debug, Clone, Deserialize)]
struct ExperimentGroup {
    name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ModelGroup {
    base_model: String,
}

#[derive(Debug, Clone, Deserialize)]
struct DatasetGroup {
    dataset_name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct HyperparamGroup {
    lr: f64,
    batch_size: u64,
}

/// Resolved training configuration with the summary fields already checked.
///
/// The raw document is kept verbatim so sections this crate does not model,
/// such as optimizer or scheduler settings, survive into `full_config.yaml`.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    raw: serde_yaml::Value,
    summary: SummaryFields,
}

impl TrainConfig {
    /// Parses a configuration from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self, RundexError> {
        let raw: serde_yaml::Value =
            serde_yaml::from_str(text).map_err(|err| config_error("config-parse", err))?;
        let summary = serde_yaml::from_value(raw.clone())
            .map_err(|err| config_error("config-fields", err))?;
        Ok(Self { raw, summary })
    }

    /// Reads and parses a configuration file.
    pub fn load(path: &Path) -> Result<Self, RundexError> {
        let text = fs::read_to_string(path).map_err(|err| {
            RundexError::Config(
                ErrorInfo::new("config-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        Self::from_yaml(&text)
    }

    pub fn experiment_name(&self) -> &str {
        &self.summary.experiment.name
    }

    pub fn model(&self) -> &str {
        &self.summary.model.base_model
    }

    pub fn dataset(&self) -> &str {
        &self.summary.dataset.dataset_name
    }

    pub fn lr(&self) -> f64 {
        self.summary.hyperparam.lr
    }

    pub fn batch_size(&self) -> u64 {
        self.summary.hyperparam.batch_size
    }

    /// Full configuration exactly as parsed.
    pub fn raw(&self) -> &serde_yaml::Value {
        &self.raw
    }
}

/// Short run summary persisted as `experiment_info.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentSummary {
    pub name: String,
    pub model: String,
    pub dataset: String,
    pub lr: f64,
    pub batch_size: u64,
    pub timestamp: String,
}

impl ExperimentSummary {
    /// Captures the summary for a run starting now.
    pub fn capture(config: &TrainConfig) -> Self {
        Self {
            name: config.experiment_name().to_string(),
            model: config.model().to_string(),
            dataset: config.dataset().to_string(),
            lr: config.lr(),
            batch_size: config.batch_size(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Writes the resolved configuration and the run summary into `out_dir`.
///
/// Returns the summary so callers can log the recorded fields.
pub fn write_run_artifacts(
    out_dir: &Path,
    config: &TrainConfig,
) -> Result<ExperimentSummary, RundexError> {
    fs::create_dir_all(out_dir).map_err(|err| artifact_error(out_dir, err))?;

    let config_text =
        serde_yaml::to_string(config.raw()).map_err(|err| config_error("config-render", err))?;
    let config_path = out_dir.join(FULL_CONFIG_FILE);
    fs::write(&config_path, config_text).map_err(|err| artifact_error(&config_path, err))?;

    let summary = ExperimentSummary::capture(config);
    let summary_text =
        serde_json::to_string_pretty(&summary).map_err(|err| config_error("config-render", err))?;
    let info_path = out_dir.join(INFO_FILE);
    fs::write(&info_path, summary_text).map_err(|err| artifact_error(&info_path, err))?;

    Ok(summary)
}

fn config_error(code: &str, err: impl Display) -> RundexError {
    RundexError::Config(ErrorInfo::new(code, err.to_string()))
}

fn artifact_error(path: &Path, err: io::Error) -> RundexError {
    RundexError::Config(
        ErrorInfo::new("run-artifacts", err.to_string())
            .with_context("path", path.display().to_string()),
    )
}
