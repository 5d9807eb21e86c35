//! Test utilities for loading pipeline test cases.
//!
//! A test case is a JSON file next to a model artifact:
//!
//! ```json
//! {
//!   "artifact": "raw_paired.model.json",
//!   "input": {"pickup_date": "2024-01-15", "pickup_time": "09:00:00"},
//!   "expected_vector": [2.5, 10.0],
//!   "expected_message": "Estimated Total Fare: $15.30"
//! }
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::features::RawInput;

/// Default tolerance for floating point comparisons.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// One pipeline test case.
#[derive(Debug, Clone, Deserialize)]
pub struct TestCase {
    /// Artifact file name, relative to the case file.
    pub artifact: String,
    /// Submission to run.
    pub input: RawInput,
    /// Expected feature vector, if the case checks assembly.
    #[serde(default)]
    pub expected_vector: Option<Vec<f64>>,
    /// Expected user-facing message.
    pub expected_message: String,
}

impl TestCase {
    /// Load a case from `path`.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be opened or parsed.
    pub fn load(path: &Path) -> Self {
        let file = File::open(path)
            .unwrap_or_else(|e| panic!("Failed to open {}: {e}", path.display()));
        serde_json::from_reader(file)
            .unwrap_or_else(|e| panic!("Failed to parse {}: {e}", path.display()))
    }

    /// Artifact path resolved against the directory of `case_path`.
    pub fn artifact_path(&self, case_path: &Path) -> PathBuf {
        case_path
            .parent()
            .map(|dir| dir.join(&self.artifact))
            .unwrap_or_else(|| PathBuf::from(&self.artifact))
    }
}

/// Assert that two vectors match element-wise within `tolerance`.
///
/// # Panics
///
/// Panics with every mismatching index if lengths or values differ.
pub fn assert_vector_eq(actual: &[f64], expected: &[f64], tolerance: f64, context: &str) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "{context}: length mismatch - got {}, expected {}",
        actual.len(),
        expected.len()
    );

    let mismatches: Vec<_> = actual
        .iter()
        .zip(expected)
        .enumerate()
        .filter(|(_, (a, e))| (*a - *e).abs() > tolerance)
        .collect();

    if !mismatches.is_empty() {
        let mut msg = format!("{context}: vectors differ\n");
        for (i, (a, e)) in mismatches {
            msg.push_str(&format!("  [{i}]: got {a}, expected {e}\n"));
        }
        panic!("{msg}");
    }
}
