//! Discovery, indexing and housekeeping for training run outputs.

pub mod discover;
pub mod errors;
pub mod index;
pub mod query;
pub mod record;
pub mod retention;
pub mod shortcuts;

pub use discover::scan_experiments;
pub use errors::{ErrorInfo, RundexError};
pub use index::{build_index, index_path, load_index, ExperimentIndex};
pub use query::{
    analyze_sweep, find_experiments, list_sweeps, match_folder, project_records, top_by_metric,
    BestJob, SweepAnalysis, SweepGroup, SweepSummary, Table, DEFAULT_METRIC,
};
pub use record::ExperimentRecord;
pub use retention::{cleanup_old_experiments, CleanupAction, CleanupReport, RetentionPolicy};
pub use shortcuts::{create_shortcuts, ShortcutReport, DEFAULT_SHORTCUT_COUNT};

/// Metadata document marking a directory as an experiment.
pub const INFO_FILE: &str = "experiment_info.json";
/// Optional results document merged over the experiment metadata.
pub const RESULTS_FILE: &str = "results.json";
/// Index file persisted at the root of the outputs directory.
pub const INDEX_FILE: &str = "experiment_index.csv";
/// Directory of generated symlinks under the outputs root.
pub const SHORTCUTS_DIR: &str = "shortcuts";
/// Prefix marking job subdirectories inside a sweep parent.
pub const SWEEP_JOB_PREFIX: &str = "job_";
