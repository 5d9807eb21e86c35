//! Loaded-once estimation pipeline.
//!
//! [`Estimator`] owns the model and its resolved schema. It is built once
//! at startup and only borrowed afterwards; every call to
//! [`Estimator::estimate`] runs builder → assembler → predictor on its own
//! data.

use std::path::Path;

use crate::artifact::{ArtifactShape, LoadError, ModelArtifact};
use crate::assemble::{assemble, FeatureVector};
use crate::config::EstimatorConfig;
use crate::features::{FeatureBuilder, FeatureMap, RawInput};
use crate::model::Regressor;
use crate::predict::{PredictError, Prediction, Predictor};
use crate::schema::{Schema, SchemaError, SchemaResolver, SchemaSource};

/// Errors that prevent an estimator from being constructed.
#[derive(Debug, thiserror::Error)]
pub enum EstimatorError {
    #[error("failed to load model artifact: {0}")]
    Load(#[from] LoadError),

    #[error("cannot determine model feature schema: {0}")]
    Schema(#[from] SchemaError),
}

/// Model, schema and configuration for serving estimates.
#[derive(Debug)]
pub struct Estimator {
    model: Regressor,
    schema: Schema,
    schema_source: SchemaSource,
    artifact_shape: ArtifactShape,
    config: EstimatorConfig,
}

impl Estimator {
    /// Load an artifact from `path` and resolve its schema.
    pub fn load(path: impl AsRef<Path>, config: EstimatorConfig) -> Result<Self, EstimatorError> {
        let artifact = ModelArtifact::load(path)?;
        Ok(Self::from_artifact(artifact, config)?)
    }

    /// Resolve the schema of an already-loaded artifact.
    pub fn from_artifact(
        artifact: ModelArtifact,
        config: EstimatorConfig,
    ) -> Result<Self, SchemaError> {
        let resolved = SchemaResolver::new(config.schema_fallback).resolve(&artifact)?;
        let artifact_shape = artifact.shape();

        Ok(Self {
            model: artifact.into_model(),
            schema: resolved.schema,
            schema_source: resolved.source,
            artifact_shape,
            config,
        })
    }

    /// The inference object.
    pub fn model(&self) -> &Regressor {
        &self.model
    }

    /// Resolved schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Where the schema came from.
    pub fn schema_source(&self) -> SchemaSource {
        self.schema_source
    }

    /// Layout of the loaded artifact.
    pub fn artifact_shape(&self) -> ArtifactShape {
        self.artifact_shape
    }

    /// Pipeline configuration.
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Values for every schema column.
    pub fn build_features(&self, input: &RawInput) -> FeatureMap {
        FeatureBuilder::new(&self.config.registry, self.config.fill_value)
            .build(input, &self.schema)
    }

    /// Model-ready vector in schema order.
    pub fn feature_vector(&self, input: &RawInput) -> FeatureVector {
        let features = self.build_features(input);
        assemble(&features, &self.schema, self.config.fill_value)
    }

    /// Estimate the total fare for one submission.
    ///
    /// Input that fails [`RawInput::validate`] is reported as
    /// [`PredictError::InvalidInput`].
    pub fn estimate(&self, input: &RawInput) -> Result<Prediction, PredictError> {
        input.validate()?;
        let vector = self.feature_vector(input);
        Predictor::new(&self.model, &self.schema).predict(&vector)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::{NaiveDate, NaiveTime};
    use ndarray::Array1;

    use super::*;
    use crate::features::InputError;
    use crate::model::LinearModel;
    use crate::schema::SchemaFallback;

    fn input() -> RawInput {
        RawInput::new(
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        )
    }

    #[test]
    fn estimates_with_default_schema() {
        let model = LinearModel::new(Array1::ones(10), 0.0);
        let estimator =
            Estimator::from_artifact(ModelArtifact::bare(model.into()), EstimatorConfig::default())
                .unwrap();

        assert_eq!(estimator.schema_source(), SchemaSource::DefaultFallback);
        assert_eq!(estimator.artifact_shape(), ArtifactShape::Unknown);

        // 2.5 + 10 + 0 + 0.5 + 2 + 0 + 0.3 + 2.5 + 15 + 1
        let prediction = estimator.estimate(&input()).unwrap();
        assert_abs_diff_eq!(prediction.amount(), 33.8, epsilon = 1e-9);
    }

    #[test]
    fn strict_config_refuses_unknown_artifact() {
        let model = LinearModel::new(Array1::ones(10), 0.0);
        let config = EstimatorConfig::builder()
            .schema_fallback(SchemaFallback::Strict)
            .build()
            .unwrap();
        let err = Estimator::from_artifact(ModelArtifact::bare(model.into()), config).unwrap_err();
        assert_eq!(err, SchemaError::Unresolved);
    }

    #[test]
    fn schema_model_mismatch_fails_per_request() {
        let model = LinearModel::new(Array1::ones(3), 0.0);
        let estimator =
            Estimator::from_artifact(ModelArtifact::bare(model.into()), EstimatorConfig::default())
                .unwrap();

        let err = estimator.estimate(&input()).unwrap_err();
        assert_eq!(err, PredictError::ShapeMismatch { expected: 3, got: 10 });
    }

    #[test]
    fn invalid_input_fails_the_request() {
        let model = LinearModel::new(Array1::ones(10), 0.0);
        let estimator =
            Estimator::from_artifact(ModelArtifact::bare(model.into()), EstimatorConfig::default())
                .unwrap();

        let mut trip = input();
        trip.fare_amount = f64::INFINITY;
        let err = estimator.estimate(&trip).unwrap_err();
        assert_eq!(
            err,
            PredictError::InvalidInput(InputError::NonFinite {
                field: "fare_amount",
                value: f64::INFINITY
            })
        );
        assert_eq!(err.to_string(), "fare_amount must be a finite number, got inf");
    }

    #[test]
    fn estimator_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Estimator>();
    }
}
