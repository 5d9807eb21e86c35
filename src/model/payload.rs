//! Payload structures for the JSON model artifact.
//!
//! These structs mirror the runtime model types but keep the on-disk layout
//! (flat arrays, optional metadata). Conversion into runtime types validates
//! structure, see [`super::Regressor::try_from`].

use serde::{Deserialize, Serialize};

/// Model-specific payload, tagged by `"kind"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelPayload {
    /// Linear regression: `y = w · x + b`.
    Linear(LinearPayload),
    /// Additive ensemble of regression trees.
    TreeEnsemble(TreeEnsemblePayload),
}

/// Linear model payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearPayload {
    /// One coefficient per input feature.
    pub weights: Vec<f64>,
    /// Intercept.
    #[serde(default)]
    pub bias: f64,
    /// Feature names (optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
}

/// Tree ensemble payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsemblePayload {
    /// Constant added to the sum of tree outputs.
    #[serde(default)]
    pub base_score: f64,
    /// Number of input features.
    pub n_features: usize,
    /// Individual tree payloads.
    pub trees: Vec<TreePayload>,
    /// Feature names (optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
}

/// Single regression tree payload (one entry per node in every array).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreePayload {
    /// Split feature indices (ignored for leaves).
    pub split_features: Vec<u32>,
    /// Split thresholds: go left when `value < threshold`.
    pub thresholds: Vec<f64>,
    /// Left child indices (ignored for leaves).
    pub left_children: Vec<u32>,
    /// Right child indices (ignored for leaves).
    pub right_children: Vec<u32>,
    /// Leaf values (ignored for internal nodes).
    pub leaf_values: Vec<f64>,
    /// Whether each node is a leaf.
    pub is_leaf: Vec<bool>,
}
