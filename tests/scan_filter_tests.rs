//! Scan Filter Integration Tests
//!
//! Tests for the scan-input file filter against a real directory, covering:
//! - Size threshold from configuration
//! - Hidden files
//! - Subdirectories, which are never listed
//! - Skipping the filter entirely

use sqlext::config::Config;
use sqlext::scan::{
    list_input_files, CombineFilter, ExecutionContext, LocalContext, MERGE_FILTER_SIZE_KEY,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A table directory with small, large, hidden and nested files.
fn create_table_dir() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(dir.path().join("part-00000.parquet"), vec![0u8; 100]).unwrap();
    fs::write(dir.path().join("part-00001.parquet"), vec![0u8; 5000]).unwrap();
    fs::write(dir.path().join(".part-00000.parquet.crc"), vec![0u8; 8]).unwrap();
    fs::write(dir.path().join("_SUCCESS"), b"").unwrap();
    fs::create_dir(dir.path().join("dt=2024-01-01")).unwrap();
    fs::write(
        dir.path().join("dt=2024-01-01").join("part-00002.parquet"),
        vec![0u8; 200],
    )
    .unwrap();
    dir
}

fn context(threshold: u64, skip: bool) -> LocalContext {
    let mut config = Config::default();
    config.scan.merge_filter_size = threshold;
    config.scan.skip_path_filter = skip;
    LocalContext::new(config)
}

fn names(files: &[PathBuf], root: &Path) -> Vec<String> {
    files
        .iter()
        .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
        .collect()
}

// ============================================================================
// Filtering
// ============================================================================

#[test]
fn test_threshold_and_hidden_files() {
    let dir = create_table_dir();
    let ctx = context(1024, false);
    let files = list_input_files(&ctx, &CombineFilter::new(false), dir.path());
    assert_eq!(
        names(&files, dir.path()),
        vec!["_SUCCESS", "part-00000.parquet"]
    );
}

#[test]
fn test_default_threshold_accepts_everything_small() {
    let dir = create_table_dir();
    let ctx = LocalContext::new(Config::default());
    assert_eq!(
        ctx.conf(MERGE_FILTER_SIZE_KEY).as_deref(),
        Some("134217728")
    );
    let files = list_input_files(&ctx, &CombineFilter::new(false), dir.path());
    assert_eq!(
        names(&files, dir.path()),
        vec!["_SUCCESS", "part-00000.parquet", "part-00001.parquet"]
    );
}

#[test]
fn test_skip_filter_accepts_hidden_and_large() {
    let dir = create_table_dir();
    let ctx = context(10, true);
    let filter = CombineFilter::from_context(&ctx);
    assert!(filter.skips_filtering());
    let files = list_input_files(&ctx, &filter, dir.path());
    assert_eq!(
        names(&files, dir.path()),
        vec![
            ".part-00000.parquet.crc",
            "_SUCCESS",
            "part-00000.parquet",
            "part-00001.parquet",
        ]
    );
}

#[test]
fn test_staging_directories_are_not_listed() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("part-0"), vec![0u8; 10]).unwrap();
    for staging in [".staging", "_temporary"] {
        fs::create_dir(dir.path().join(staging)).unwrap();
        fs::write(dir.path().join(staging).join("part-1"), vec![0u8; 10]).unwrap();
    }

    let ctx = LocalContext::new(Config::default());
    let files = list_input_files(&ctx, &CombineFilter::new(false), dir.path());
    assert_eq!(names(&files, dir.path()), vec!["part-0"]);

    let files = list_input_files(&ctx, &CombineFilter::new(true), dir.path());
    assert_eq!(names(&files, dir.path()), vec!["part-0"]);
}

#[test]
fn test_missing_file_is_excluded() {
    let dir = TempDir::new().unwrap();
    let ctx = context(1024, false);
    let filter = CombineFilter::new(false);
    assert!(!filter.accept(&ctx, &dir.path().join("gone.parquet")));
    assert!(!filter.accept(&ctx, dir.path()));
}

#[test]
fn test_missing_directory_lists_nothing() {
    let dir = TempDir::new().unwrap();
    let ctx = context(1024, false);
    let files = list_input_files(&ctx, &CombineFilter::new(false), &dir.path().join("nope"));
    assert!(files.is_empty());
}
