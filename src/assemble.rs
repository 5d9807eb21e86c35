//! Vector assembly: feature map → model-ready vector in schema order.

use ndarray::{Array1, ArrayView1};

use crate::features::FeatureMap;
use crate::schema::Schema;

/// Ordered feature values, one per schema column.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Array1<f64>,
}

impl FeatureVector {
    /// Wrap raw values. Callers are responsible for matching a schema.
    pub fn from_vec(values: Vec<f64>) -> Self {
        Self {
            values: Array1::from(values),
        }
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the vector is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at `index`.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// View for inference.
    pub fn view(&self) -> ArrayView1<'_, f64> {
        self.values.view()
    }

    /// Values as a contiguous slice.
    pub fn as_slice(&self) -> &[f64] {
        self.values
            .as_slice()
            .expect("owned 1-D arrays are contiguous")
    }

    /// Consume into a plain vector.
    pub fn into_vec(self) -> Vec<f64> {
        self.values.to_vec()
    }
}

/// Reorder `features` into `schema` order.
///
/// Columns missing from `features` take `fill_value`, so the result always
/// has exactly `schema.len()` elements.
pub fn assemble(features: &FeatureMap, schema: &Schema, fill_value: f64) -> FeatureVector {
    let values = schema
        .iter()
        .map(|column| match features.get(column) {
            Some(&value) => value,
            None => {
                tracing::debug!(column, fill = fill_value, "column missing from feature map");
                fill_value
            }
        })
        .collect::<Vec<f64>>();

    FeatureVector::from_vec(values)
}
