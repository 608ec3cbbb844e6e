use std::fs;
use std::path::Path;

use rundex_core::{build_index, load_index, scan_experiments, INDEX_FILE, INFO_FILE, RESULTS_FILE};
use serde_json::json;
use tempfile::tempdir;

fn write_info(dir: &Path, body: serde_json::Value) {
    fs::create_dir_all(dir).expect("experiment dir");
    fs::write(dir.join(INFO_FILE), body.to_string()).expect("info file");
}

fn write_results(dir: &Path, body: serde_json::Value) {
    fs::write(dir.join(RESULTS_FILE), body.to_string()).expect("results file");
}

#[test]
fn indexes_one_row_per_experiment_directory() {
    let root = tempdir().expect("root");
    write_info(
        &root.path().join("expA"),
        json!({"name": "expA", "model": "r18"}),
    );
    write_info(
        &root.path().join("expB"),
        json!({"name": "expB", "model": "r50"}),
    );
    fs::write(root.path().join("notes.txt"), "scratch").expect("stray file");

    let index = build_index(root.path()).expect("build");
    assert_eq!(index.len(), 2);
    assert!(root.path().join(INDEX_FILE).is_file());
    let folders: Vec<&str> = index
        .records()
        .iter()
        .map(|record| record.folder_name())
        .collect();
    assert_eq!(folders, ["expA", "expB"]);
}

#[test]
fn sweep_jobs_are_tagged_and_ordered() {
    let root = tempdir().expect("root");
    for job in ["job_0", "job_10", "job_2"] {
        write_info(&root.path().join("sweepA").join(job), json!({"lr": 0.1}));
    }

    let records = scan_experiments(root.path()).expect("scan");
    let jobs: Vec<&str> = records
        .iter()
        .filter_map(|record| record.job_number())
        .collect();
    assert_eq!(jobs, ["job_0", "job_10", "job_2"]);
    assert!(records
        .iter()
        .all(|record| record.sweep_parent() == Some("sweepA")));
}

#[test]
fn job_dirs_without_metadata_are_skipped() {
    let root = tempdir().expect("root");
    fs::create_dir_all(root.path().join("misc").join("data")).expect("plain dirs");
    fs::create_dir_all(root.path().join("sweepB").join("job_0")).expect("bare job dir");
    write_info(
        &root.path().join("sweepB").join("job_1"),
        json!({"lr": 1.0}),
    );

    let records = scan_experiments(root.path()).expect("scan");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].job_number(), Some("job_1"));
}

#[test]
fn results_override_info_fields() {
    let root = tempdir().expect("root");
    let dir = root.path().join("expA");
    write_info(&dir, json!({"name": "expA", "status": "running"}));
    write_results(&dir, json!({"status": "done", "best_accuracy": 0.9}));

    let records = scan_experiments(root.path()).expect("scan");
    assert_eq!(records[0].field("status"), Some(&json!("done")));
    assert_eq!(records[0].metric("best_accuracy"), Some(0.9));
}

#[test]
fn rebuild_is_idempotent() {
    let root = tempdir().expect("root");
    write_info(
        &root.path().join("expA"),
        json!({"model": "r18", "lr": 0.01}),
    );
    write_info(
        &root.path().join("sweepB").join("job_0"),
        json!({"model": "r18", "lr": 0.1}),
    );

    build_index(root.path()).expect("first build");
    let first = fs::read(root.path().join(INDEX_FILE)).expect("first bytes");
    build_index(root.path()).expect("second build");
    let second = fs::read(root.path().join(INDEX_FILE)).expect("second bytes");
    assert_eq!(first, second);
}

#[test]
fn malformed_metadata_aborts_the_build() {
    let root = tempdir().expect("root");
    let dir = root.path().join("expA");
    fs::create_dir_all(&dir).expect("experiment dir");
    fs::write(dir.join(INFO_FILE), "{not json").expect("broken info");

    let err = build_index(root.path()).expect_err("malformed metadata");
    assert_eq!(err.info().code, "metadata-parse");
    assert!(!root.path().join(INDEX_FILE).exists());
}

#[test]
fn missing_root_is_a_discovery_error() {
    let err = scan_experiments(Path::new("/nonexistent/outputs")).expect_err("missing root");
    assert_eq!(err.info().code, "discover-read-dir");
}

#[test]
fn empty_root_builds_an_empty_index() {
    let root = tempdir().expect("root");
    let index = build_index(root.path()).expect("build");
    assert!(index.is_empty());
    assert!(root.path().join(INDEX_FILE).is_file());

    let reloaded = load_index(root.path()).expect("reload");
    assert!(reloaded.is_empty());
}

#[test]
fn missing_index_loads_as_empty() {
    let root = tempdir().expect("root");
    let index = load_index(root.path()).expect("load");
    assert!(index.is_empty());
    assert!(index.columns().is_empty());
}

#[test]
fn reload_preserves_scalar_types() {
    let root = tempdir().expect("root");
    write_info(
        &root.path().join("expA"),
        json!({"model": "r18", "lr": 0.01, "batch_size": 32}),
    );

    build_index(root.path()).expect("build");
    let loaded = load_index(root.path()).expect("reload");
    let record = &loaded.records()[0];
    assert_eq!(record.field("lr"), Some(&json!(0.01)));
    assert_eq!(record.field("batch_size"), Some(&json!(32)));
    assert_eq!(record.field("model"), Some(&json!("r18")));
}

#[test]
fn numeric_folder_names_reload_as_strings() {
    let root = tempdir().expect("root");
    write_info(&root.path().join("42"), json!({"model": "r18"}));

    build_index(root.path()).expect("build");
    let loaded = load_index(root.path()).expect("reload");
    assert_eq!(loaded.records()[0].folder_name(), "42");
}
