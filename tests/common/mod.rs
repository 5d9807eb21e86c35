//! Test case loading utilities for integration tests.
//!
//! For assertion helpers, use `fare_estimator::testing`.

#![allow(dead_code)]

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveTime};
use serde::de::DeserializeOwned;

#[allow(unused_imports)]
pub use fare_estimator::testing::{assert_vector_eq, TestCase, DEFAULT_TOLERANCE};
use fare_estimator::RawInput;

// =============================================================================
// Test Case Loading
// =============================================================================

/// Base directory for test cases.
pub fn test_cases_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/test-cases")
}

/// Directory for end-to-end pipeline cases.
pub fn pipeline_cases_dir() -> PathBuf {
    test_cases_dir().join("pipeline")
}

/// Load a JSON file and deserialize it.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> T {
    let file =
        File::open(path).unwrap_or_else(|e| panic!("Failed to open {}: {e}", path.display()));
    serde_json::from_reader(file)
        .unwrap_or_else(|e| panic!("Failed to parse {}: {e}", path.display()))
}

/// Load `<name>.case.json` from the pipeline directory.
pub fn load_case(name: &str) -> (PathBuf, TestCase) {
    let path = pipeline_cases_dir().join(format!("{name}.case.json"));
    let case = TestCase::load(&path);
    (path, case)
}

// =============================================================================
// Common Inputs
// =============================================================================

/// Form defaults with a pickup at `date` `time`.
pub fn trip(date: &str, time: &str) -> RawInput {
    RawInput::new(
        NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("valid date"),
        NaiveTime::parse_from_str(time, "%H:%M:%S").expect("valid time"),
    )
}
