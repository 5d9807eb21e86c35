//! Predictor invocation.
//!
//! [`Predictor`] checks an assembled vector against the model before
//! calling it, so a bad vector becomes a [`PredictError`] the caller can
//! show instead of a panic inside the model.

use std::fmt;

use crate::assemble::FeatureVector;
use crate::features::InputError;
use crate::model::Predict;
use crate::schema::Schema;

/// Reasons a model rejects a feature vector.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictError {
    #[error("model expects {expected} features but received {got}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("feature {column:?} has unsupported value {value}")]
    NonFinite { column: String, value: f64 },

    #[error("model produced a non-finite estimate ({0})")]
    InvalidOutput(f64),

    #[error(transparent)]
    InvalidInput(#[from] InputError),
}

/// A successful point estimate of the total fare, in dollars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction(f64);

impl Prediction {
    /// Estimated amount.
    pub fn amount(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Prediction {
    /// Currency with two decimals, e.g. `$15.30`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

/// Invokes a model on vectors assembled for `schema`.
pub struct Predictor<'a, M: Predict> {
    model: &'a M,
    schema: &'a Schema,
}

impl<'a, M: Predict> Predictor<'a, M> {
    pub fn new(model: &'a M, schema: &'a Schema) -> Self {
        Self { model, schema }
    }

    /// Predict a single vector.
    ///
    /// # Errors
    ///
    /// - [`PredictError::ShapeMismatch`] if the vector length differs from
    ///   the model's feature count
    /// - [`PredictError::NonFinite`] if any value is NaN or infinite
    /// - [`PredictError::InvalidOutput`] if the model output is not finite
    pub fn predict(&self, vector: &FeatureVector) -> Result<Prediction, PredictError> {
        let expected = self.model.n_features();
        if vector.len() != expected {
            return Err(PredictError::ShapeMismatch {
                expected,
                got: vector.len(),
            });
        }

        if let Some((i, &value)) = vector
            .as_slice()
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite())
        {
            let column = self
                .schema
                .names()
                .get(i)
                .cloned()
                .unwrap_or_else(|| format!("#{i}"));
            return Err(PredictError::NonFinite { column, value });
        }

        let output = self.model.predict_row(vector.view());
        if !output.is_finite() {
            return Err(PredictError::InvalidOutput(output));
        }

        tracing::debug!(estimate = output, "prediction succeeded");
        Ok(Prediction(output))
    }
}
