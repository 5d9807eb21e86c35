//! End-to-end tests: artifact file → schema → features → vector → message.

mod common;

use std::io::Write;

use approx::assert_abs_diff_eq;
use rstest::rstest;

use common::{assert_vector_eq, load_case, trip, DEFAULT_TOLERANCE};
use fare_estimator::report::outcome_message;
use fare_estimator::{
    ArtifactShape, Estimator, EstimatorConfig, EstimatorError, LoadError, ModelArtifact,
    PredictError, SchemaError, SchemaFallback, SchemaSource,
};

// =============================================================================
// Fixture cases
// =============================================================================

#[rstest]
#[case::raw_paired("raw_paired", ArtifactShape::Paired, SchemaSource::PairedList)]
#[case::onehot_wednesday("onehot_wednesday", ArtifactShape::SelfDescribing, SchemaSource::ModelMetadata)]
#[case::onehot_monday("onehot_monday", ArtifactShape::SelfDescribing, SchemaSource::ModelMetadata)]
#[case::bare_linear("bare_linear", ArtifactShape::Unknown, SchemaSource::DefaultFallback)]
#[case::paired_tuple("paired_tuple", ArtifactShape::Paired, SchemaSource::PairedList)]
#[case::shape_mismatch("shape_mismatch", ArtifactShape::Paired, SchemaSource::PairedList)]
fn pipeline_case(
    #[case] name: &str,
    #[case] shape: ArtifactShape,
    #[case] source: SchemaSource,
) {
    let (path, case) = load_case(name);
    let estimator = Estimator::load(case.artifact_path(&path), EstimatorConfig::default())
        .unwrap_or_else(|e| panic!("{name}: {e}"));

    assert_eq!(estimator.artifact_shape(), shape, "{name}");
    assert_eq!(estimator.schema_source(), source, "{name}");

    if let Some(expected) = &case.expected_vector {
        let vector = estimator.feature_vector(&case.input);
        assert_vector_eq(vector.as_slice(), expected, DEFAULT_TOLERANCE, name);
    }

    let message = outcome_message(&estimator.estimate(&case.input));
    assert_eq!(message, case.expected_message, "{name}");
}

// =============================================================================
// Scenarios
// =============================================================================

/// Raw-feature schema with form defaults: vector follows the schema exactly.
#[test]
fn scenario_raw_schema_defaults() {
    let (path, case) = load_case("raw_paired");
    let estimator =
        Estimator::load(case.artifact_path(&path), EstimatorConfig::default()).unwrap();

    let vector = estimator.feature_vector(&trip("2024-01-15", "09:00:00"));
    assert_eq!(
        vector.into_vec(),
        vec![2.5, 10.0, 0.0, 0.5, 2.0, 0.0, 0.3, 2.5, 15.0, 1.0]
    );
}

/// One-hot schema: exactly one indicator per family is set.
#[test]
fn scenario_one_hot_wednesday_morning() {
    let (path, case) = load_case("onehot_wednesday");
    let estimator =
        Estimator::load(case.artifact_path(&path), EstimatorConfig::default()).unwrap();

    let features = estimator.build_features(&trip("2024-01-17", "08:30:00"));
    assert_eq!(features["weekday_Wednesday"], 1.0);
    assert_eq!(features["weekday_Monday"], 0.0);
    assert_eq!(features["hour_8"], 1.0);
    assert_eq!(features["hour_of_day"], 8.0);
    assert_eq!(features["RatecodeID_1.0"], 1.0);
    assert_eq!(features["RatecodeID_5.0"], 0.0);
    assert_eq!(features["payment_type_1.0"], 1.0);
    assert_eq!(features["payment_type_2.0"], 0.0);
}

/// A 10-feature model behind a 9-name schema fails the request, not the load.
#[test]
fn scenario_length_mismatch_reported() {
    let json = r#"{
        "model": {"kind": "linear", "weights": [1, 1, 1, 1, 1, 1, 1, 1, 1, 1]},
        "feature_names": ["trip_distance", "fare_amount", "extra", "mta_tax",
                          "tip_amount", "tolls_amount", "improvement_surcharge",
                          "congestion_surcharge", "trip_duration"]
    }"#;
    let estimator = Estimator::from_artifact(
        ModelArtifact::from_json_str(json).unwrap(),
        EstimatorConfig::default(),
    )
    .unwrap();

    let outcome = estimator.estimate(&trip("2024-01-15", "09:00:00"));
    assert_eq!(
        outcome,
        Err(PredictError::ShapeMismatch {
            expected: 10,
            got: 9
        })
    );
    assert!(outcome_message(&outcome).starts_with("Prediction failed: "));
}

/// A bare model without names gets the ten default features.
#[test]
fn scenario_bare_model_uses_defaults() {
    let (path, case) = load_case("bare_linear");
    let estimator =
        Estimator::load(case.artifact_path(&path), EstimatorConfig::default()).unwrap();

    assert_eq!(estimator.schema().len(), 10);
    assert_eq!(estimator.schema().names()[8], "trip_duration");
    let prediction = estimator.estimate(&case.input).unwrap();
    assert_abs_diff_eq!(prediction.amount(), 33.8, epsilon = 1e-9);
}

// =============================================================================
// Loading failures
// =============================================================================

#[test]
fn strict_schema_rejects_bare_model() {
    let (path, case) = load_case("bare_linear");
    let config = EstimatorConfig::builder()
        .schema_fallback(SchemaFallback::Strict)
        .build()
        .unwrap();

    let err = Estimator::load(case.artifact_path(&path), config).unwrap_err();
    assert!(matches!(
        err,
        EstimatorError::Schema(SchemaError::Unresolved)
    ));
}

#[test]
fn missing_artifact_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Estimator::load(dir.path().join("model.json"), EstimatorConfig::default())
        .unwrap_err();
    assert!(matches!(err, EstimatorError::Load(LoadError::Io(_))));
}

#[test]
fn malformed_artifact_is_json_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{\"kind\": \"linear\", ").unwrap();

    let err = Estimator::load(file.path(), EstimatorConfig::default()).unwrap_err();
    assert!(matches!(err, EstimatorError::Load(LoadError::Json(_))));
}

#[test]
fn duplicate_feature_names_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"model": {{"kind": "linear", "weights": [1, 1]}},
            "feature_names": ["fare_amount", "fare_amount"]}}"#
    )
    .unwrap();

    let err = Estimator::load(file.path(), EstimatorConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        EstimatorError::Schema(SchemaError::Duplicate { .. })
    ));
}

// =============================================================================
// Serving
// =============================================================================

#[test]
fn estimator_serves_many_requests() {
    let (path, _) = load_case("onehot_wednesday");
    let estimator = Estimator::load(
        path.with_file_name("onehot_tree.model.json"),
        EstimatorConfig::default(),
    )
    .unwrap();

    let wednesday = trip("2024-01-17", "08:30:00");
    let monday = trip("2024-01-15", "09:00:00");

    let first = estimator.estimate(&wednesday).unwrap();
    assert_abs_diff_eq!(estimator.estimate(&monday).unwrap().amount(), 14.0);
    assert_eq!(estimator.estimate(&wednesday).unwrap(), first);
    assert_abs_diff_eq!(first.amount(), 15.5);
}

#[test]
fn estimator_shared_across_threads() {
    let (path, case) = load_case("raw_paired");
    let estimator =
        Estimator::load(case.artifact_path(&path), EstimatorConfig::default()).unwrap();

    let messages: Vec<String> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| outcome_message(&estimator.estimate(&case.input))))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(messages.iter().all(|m| m == &case.expected_message));
}
