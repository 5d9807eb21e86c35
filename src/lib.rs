//! fare-estimator: schema-aligned fare estimation for NYC green taxi trips.
//!
//! Raw trip attributes are aligned to whatever feature schema the loaded
//! regression model expects, then passed to the model for a point estimate
//! of the total fare.
//!
//! # Pipeline
//!
//! 1. [`schema::SchemaResolver`] - feature names from the model artifact
//! 2. [`features::FeatureBuilder`] - derived fields and one-hot expansion
//! 3. [`assemble::assemble`] - vector in schema order
//! 4. [`predict::Predictor`] - model invocation
//!
//! [`Estimator`] ties the stages together around a model loaded once.
//!
//! # Example
//!
//! ```
//! use chrono::{NaiveDate, NaiveTime};
//! use fare_estimator::{Estimator, EstimatorConfig, ModelArtifact, RawInput};
//!
//! let artifact = ModelArtifact::from_json_str(
//!     r#"{"model": {"kind": "linear", "weights": [1.0, 1.0], "bias": 0.0},
//!         "feature_names": ["fare_amount", "tip_amount"]}"#,
//! )?;
//! let estimator = Estimator::from_artifact(artifact, EstimatorConfig::default())?;
//!
//! let input = RawInput::new(
//!     NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
//!     NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
//! );
//! let prediction = estimator.estimate(&input)?;
//! assert_eq!(prediction.to_string(), "$12.00");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export approx traits for users who want to compare predictions
pub use approx;

pub mod artifact;
pub mod assemble;
pub mod batch;
pub mod config;
pub mod estimator;
pub mod features;
pub mod model;
pub mod predict;
pub mod report;
pub mod schema;
pub mod testing;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use artifact::{ArtifactShape, LoadError, ModelArtifact};
pub use assemble::{assemble, FeatureVector};
pub use config::{ConfigError, EstimatorConfig};
pub use estimator::{Estimator, EstimatorError};
pub use features::{CategoricalRegistry, FeatureBuilder, FeatureMap, RawInput};
pub use model::{LinearModel, Predict, Regressor, TreeEnsemble};
pub use predict::{PredictError, Prediction, Predictor};
pub use schema::{Schema, SchemaError, SchemaFallback, SchemaResolver, SchemaSource};
