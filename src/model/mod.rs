//! Inference objects loaded from a model artifact.
//!
//! # Overview
//!
//! - [`Predict`]: the read-only inference interface the pipeline calls
//! - [`Regressor`]: the concrete model held by a loaded artifact
//! - [`LinearModel`] / [`TreeEnsemble`]: supported model kinds
//!
//! Models are immutable after construction and safe to share across
//! requests by reference.

mod linear;
pub mod payload;
mod tree;

use ndarray::ArrayView1;

pub use linear::LinearModel;
pub use payload::{LinearPayload, ModelPayload, TreeEnsemblePayload, TreePayload};
pub use tree::{NodeId, RegressionTree, TreeEnsemble};

/// Read-only inference interface.
///
/// `predict_row` assumes the caller already checked that
/// `features.len() == self.n_features()` and that every value is finite;
/// [`crate::predict::Predictor`] performs those checks.
pub trait Predict {
    /// Number of input features the model was trained on.
    fn n_features(&self) -> usize;

    /// Input feature names exposed by the model, in training order.
    fn feature_names(&self) -> Option<&[String]>;

    /// Predict a single row.
    fn predict_row(&self, features: ArrayView1<'_, f64>) -> f64;
}

/// Structural errors found while converting a payload into a model.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("linear model has no weights")]
    EmptyLinearWeights,
    #[error("tree ensemble declares zero input features")]
    NoFeatures,
    #[error("tree {0} has no nodes")]
    EmptyTree(usize),
    #[error("tree {tree}: {field} has {len} entries but the tree has {n_nodes} nodes")]
    TreeArrayLength {
        tree: usize,
        field: &'static str,
        len: usize,
        n_nodes: usize,
    },
    #[error(
        "invalid child index in tree {tree}: node {node} references child {child} but tree has {n_nodes} nodes"
    )]
    InvalidChild {
        tree: usize,
        node: usize,
        child: u32,
        n_nodes: usize,
    },
    #[error("tree {tree}: node {node} splits on feature {feature} but the model has {n_features} features")]
    SplitFeatureOutOfRange {
        tree: usize,
        node: usize,
        feature: usize,
        n_features: usize,
    },
    #[error("model parameter {what} is not finite")]
    NonFiniteParameter { what: String },
}

/// A loaded regression model.
#[derive(Debug, Clone)]
pub enum Regressor {
    /// Linear model.
    Linear(LinearModel),
    /// Regression tree ensemble.
    TreeEnsemble(TreeEnsemble),
}

impl Regressor {
    /// Short name of the model kind, for logs and CLI output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Linear(_) => "linear",
            Self::TreeEnsemble(_) => "tree_ensemble",
        }
    }
}

impl Predict for Regressor {
    fn n_features(&self) -> usize {
        match self {
            Self::Linear(m) => m.n_features(),
            Self::TreeEnsemble(m) => m.n_features(),
        }
    }

    fn feature_names(&self) -> Option<&[String]> {
        match self {
            Self::Linear(m) => m.feature_names(),
            Self::TreeEnsemble(m) => m.feature_names(),
        }
    }

    fn predict_row(&self, features: ArrayView1<'_, f64>) -> f64 {
        match self {
            Self::Linear(m) => m.predict_row(features),
            Self::TreeEnsemble(m) => m.predict_row(features),
        }
    }
}

impl From<LinearModel> for Regressor {
    fn from(model: LinearModel) -> Self {
        Self::Linear(model)
    }
}

impl From<TreeEnsemble> for Regressor {
    fn from(model: TreeEnsemble) -> Self {
        Self::TreeEnsemble(model)
    }
}

impl TryFrom<ModelPayload> for Regressor {
    type Error = ModelError;

    fn try_from(payload: ModelPayload) -> Result<Self, Self::Error> {
        match payload {
            ModelPayload::Linear(p) => LinearModel::try_from(p).map(Self::Linear),
            ModelPayload::TreeEnsemble(p) => TreeEnsemble::try_from(p).map(Self::TreeEnsemble),
        }
    }
}
