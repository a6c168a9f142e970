//! Common test utilities

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary directory with a Runfile
pub fn create_test_definition(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("Runfile");
    fs::write(&path, content).unwrap();
    (temp_dir, path)
}

/// Create a Runfile plus an empty subdirectory
pub fn create_test_definition_in_subdir(content: &str) -> (TempDir, PathBuf, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("Runfile");
    let sub_dir = temp_dir.path().join("subdir");

    fs::write(&path, content).unwrap();
    fs::create_dir(&sub_dir).unwrap();

    (temp_dir, path, sub_dir)
}
