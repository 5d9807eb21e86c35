//! Linear regression model.

use ndarray::{Array1, ArrayView1};

use super::{ModelError, Predict};
use super::payload::LinearPayload;

/// Linear model (weights + bias).
///
/// Prediction is a single dot product:
///
/// ```text
/// output = features · weights + bias
/// ```
///
/// # Example
///
/// ```
/// use fare_estimator::model::{LinearModel, Predict};
/// use ndarray::array;
///
/// let model = LinearModel::new(array![0.5, 1.5, -1.0], 0.25);
/// let y = model.predict_row(array![2.0, -1.0, 0.5].view());
///
/// assert!((y - (-0.75)).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct LinearModel {
    weights: Array1<f64>,
    bias: f64,
    feature_names: Option<Vec<String>>,
}

impl LinearModel {
    /// Create a linear model from coefficients and an intercept.
    pub fn new(weights: Array1<f64>, bias: f64) -> Self {
        Self {
            weights,
            bias,
            feature_names: None,
        }
    }

    /// Set feature names.
    pub fn with_feature_names(mut self, names: Vec<String>) -> Self {
        self.feature_names = Some(names);
        self
    }

    /// Coefficient for a feature, `None` past the last feature.
    #[inline]
    pub fn weight(&self, feature: usize) -> Option<f64> {
        self.weights.get(feature).copied()
    }

    /// All coefficients.
    pub fn weights(&self) -> ArrayView1<'_, f64> {
        self.weights.view()
    }

    /// Intercept.
    #[inline]
    pub fn bias(&self) -> f64 {
        self.bias
    }
}

impl Predict for LinearModel {
    fn n_features(&self) -> usize {
        self.weights.len()
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn predict_row(&self, features: ArrayView1<'_, f64>) -> f64 {
        self.weights.dot(&features) + self.bias
    }
}

impl TryFrom<LinearPayload> for LinearModel {
    type Error = ModelError;

    fn try_from(payload: LinearPayload) -> Result<Self, Self::Error> {
        if payload.weights.is_empty() {
            return Err(ModelError::EmptyLinearWeights);
        }
        if let Some(i) = payload.weights.iter().position(|w| !w.is_finite()) {
            return Err(ModelError::NonFiniteParameter {
                what: format!("weight {i}"),
            });
        }
        if !payload.bias.is_finite() {
            return Err(ModelError::NonFiniteParameter {
                what: "bias".to_string(),
            });
        }

        Ok(Self {
            weights: Array1::from(payload.weights),
            bias: payload.bias,
            feature_names: payload.feature_names,
        })
    }
}
