use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;

use rundex_core::{
    build_index, cleanup_old_experiments, create_shortcuts, CleanupAction, RetentionPolicy,
    DEFAULT_SHORTCUT_COUNT, INFO_FILE, RESULTS_FILE,
};
use serde_json::{json, Value};
use tempfile::tempdir;

fn write_experiment(dir: &Path, info: Value, results: Option<Value>) {
    fs::create_dir_all(dir).expect("experiment dir");
    fs::write(dir.join(INFO_FILE), info.to_string()).expect("info file");
    if let Some(results) = results {
        fs::write(dir.join(RESULTS_FILE), results.to_string()).expect("results file");
    }
}

/// Zero-day retention with a short pause makes every directory stale.
fn stale_policy() -> RetentionPolicy {
    thread::sleep(Duration::from_millis(20));
    RetentionPolicy {
        keep_days: 0,
        ..RetentionPolicy::default()
    }
}

#[test]
fn cleanup_removes_stale_low_performers() {
    let root = tempdir().expect("root");
    write_experiment(
        &root.path().join("old_low"),
        json!({"model": "r18"}),
        Some(json!({"best_accuracy": 0.4})),
    );
    write_experiment(
        &root.path().join("old_high"),
        json!({"model": "r18"}),
        Some(json!({"best_accuracy": 0.93})),
    );
    write_experiment(&root.path().join("old_bare"), json!({"model": "r18"}), None);

    let report = cleanup_old_experiments(root.path(), &stale_policy()).expect("cleanup");
    assert_eq!(report.removed(), 2);
    assert!(!root.path().join("old_low").exists());
    assert!(!root.path().join("old_bare").exists());
    assert!(root.path().join("old_high").exists());
    assert!(report.actions.contains(&CleanupAction::Kept {
        folder: "old_high".to_string()
    }));
}

#[test]
fn threshold_results_are_preserved() {
    let root = tempdir().expect("root");
    write_experiment(
        &root.path().join("exact"),
        json!({"model": "r18"}),
        Some(json!({"best_accuracy": 0.9})),
    );

    let report = cleanup_old_experiments(root.path(), &stale_policy()).expect("cleanup");
    assert_eq!(report.removed(), 0);
    assert!(root.path().join("exact").exists());
}

#[test]
fn recent_directories_are_untouched() {
    let root = tempdir().expect("root");
    write_experiment(&root.path().join("fresh"), json!({"model": "r18"}), None);

    let policy = RetentionPolicy {
        keep_days: 1,
        ..RetentionPolicy::default()
    };
    let report = cleanup_old_experiments(root.path(), &policy).expect("cleanup");
    assert!(report.actions.is_empty());
    assert!(root.path().join("fresh").exists());
}

#[test]
fn malformed_results_abort_the_pass() {
    let root = tempdir().expect("root");
    let bad = root.path().join("aaa_bad");
    fs::create_dir_all(&bad).expect("experiment dir");
    fs::write(bad.join(RESULTS_FILE), "{oops").expect("broken results");
    write_experiment(&root.path().join("zzz_old"), json!({"model": "r18"}), None);

    let err = cleanup_old_experiments(root.path(), &stale_policy()).expect_err("broken results");
    assert_eq!(err.info().code, "metadata-parse");
    assert!(bad.exists());
    assert!(root.path().join("zzz_old").exists());
}

#[test]
fn shortcuts_link_the_top_experiments() {
    let root = tempdir().expect("root");
    write_experiment(
        &root.path().join("expA"),
        json!({"model": "r18", "dataset": "c10"}),
        Some(json!({"best_accuracy": 0.9})),
    );
    write_experiment(
        &root.path().join("expB"),
        json!({"model": "r50", "dataset": "c100"}),
        Some(json!({"best_accuracy": 0.8})),
    );
    write_experiment(
        &root.path().join("expC"),
        json!({"model": "vit", "dataset": "in1k"}),
        Some(json!({"best_accuracy": 0.7})),
    );
    let index = build_index(root.path()).expect("build");

    let report = create_shortcuts(root.path(), &index, DEFAULT_SHORTCUT_COUNT).expect("shortcuts");
    assert_eq!(
        report.created,
        [
            "top_r18_c10_0.900",
            "top_r50_c100_0.800",
            "top_vit_in1k_0.700"
        ]
    );

    let link = report.dir.join("top_r18_c10_0.900");
    let meta = fs::symlink_metadata(&link).expect("link metadata");
    assert!(meta.file_type().is_symlink());
    let resolved = fs::canonicalize(&link).expect("resolved target");
    assert_eq!(
        resolved,
        fs::canonicalize(root.path().join("expA")).expect("experiment path")
    );
}

#[cfg(unix)]
#[test]
fn regeneration_clears_stale_links() {
    let root = tempdir().expect("root");
    write_experiment(
        &root.path().join("expA"),
        json!({"model": "r18", "dataset": "c10"}),
        Some(json!({"best_accuracy": 0.9})),
    );
    let index = build_index(root.path()).expect("build");

    let shortcuts_dir = root.path().join("shortcuts");
    fs::create_dir_all(&shortcuts_dir).expect("shortcuts dir");
    std::os::unix::fs::symlink("/nonexistent/run", shortcuts_dir.join("stale"))
        .expect("stale link");
    fs::write(shortcuts_dir.join("README"), "keep me").expect("regular file");

    let report = create_shortcuts(root.path(), &index, DEFAULT_SHORTCUT_COUNT).expect("shortcuts");
    assert_eq!(report.created, ["top_r18_c10_0.900"]);
    assert!(!shortcuts_dir.join("stale").exists());
    assert!(shortcuts_dir.join("README").is_file());
}

#[test]
fn vanished_selections_are_skipped() {
    let root = tempdir().expect("root");
    write_experiment(
        &root.path().join("gone"),
        json!({"model": "r18", "dataset": "c10"}),
        Some(json!({"best_accuracy": 0.95})),
    );
    write_experiment(
        &root.path().join("kept"),
        json!({"model": "r50", "dataset": "c100"}),
        Some(json!({"best_accuracy": 0.8})),
    );
    let index = build_index(root.path()).expect("build");
    fs::remove_dir_all(root.path().join("gone")).expect("drop experiment");

    let report = create_shortcuts(root.path(), &index, DEFAULT_SHORTCUT_COUNT).expect("shortcuts");
    assert_eq!(report.created, ["top_r50_c100_0.800"]);
}

#[test]
fn colliding_link_names_keep_the_better_run() {
    let root = tempdir().expect("root");
    write_experiment(
        &root.path().join("first"),
        json!({"model": "r18", "dataset": "c10"}),
        Some(json!({"best_accuracy": 0.9})),
    );
    write_experiment(
        &root.path().join("second"),
        json!({"model": "r18", "dataset": "c10"}),
        Some(json!({"best_accuracy": 0.9})),
    );
    let index = build_index(root.path()).expect("build");

    let report = create_shortcuts(root.path(), &index, DEFAULT_SHORTCUT_COUNT).expect("shortcuts");
    assert_eq!(report.created, ["top_r18_c10_0.900"]);
    let resolved = fs::canonicalize(report.dir.join("top_r18_c10_0.900")).expect("target");
    assert_eq!(
        resolved,
        fs::canonicalize(root.path().join("first")).expect("experiment path")
    );
}

#[test]
fn no_metric_column_creates_no_links() {
    let root = tempdir().expect("root");
    write_experiment(&root.path().join("expA"), json!({"model": "r18"}), None);
    let index = build_index(root.path()).expect("build");

    let report = create_shortcuts(root.path(), &index, DEFAULT_SHORTCUT_COUNT).expect("shortcuts");
    assert!(report.created.is_empty());
    assert!(report.dir.is_dir());
}

#[test]
fn missing_metric_fields_are_not_linked() {
    let root = tempdir().expect("root");
    write_experiment(
        &root.path().join("scored"),
        json!({"model": "r18", "dataset": "c10"}),
        Some(json!({"best_accuracy": 0.6})),
    );
    write_experiment(
        &root.path().join("unscored"),
        json!({"model": "r50", "dataset": "c100"}),
        Some(json!({"loss": 1.2})),
    );
    let index = build_index(root.path()).expect("build");

    let report = create_shortcuts(root.path(), &index, DEFAULT_SHORTCUT_COUNT).expect("shortcuts");
    assert_eq!(report.created, ["top_r18_c10_0.600"]);
}
