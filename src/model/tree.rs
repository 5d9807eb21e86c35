//! Regression tree ensemble (SoA layout).

use ndarray::ArrayView1;

use super::payload::{TreeEnsemblePayload, TreePayload};
use super::{ModelError, Predict};

/// Node index within a tree.
pub type NodeId = u32;

/// Immutable regression tree stored as parallel arrays.
///
/// Node 0 is the root. Numeric splits send a row left when
/// `features[split_index] < threshold`. Children always have a larger
/// index than their parent, so traversal terminates.
#[derive(Debug, Clone)]
pub struct RegressionTree {
    split_indices: Box<[u32]>,
    thresholds: Box<[f64]>,
    left_children: Box<[NodeId]>,
    right_children: Box<[NodeId]>,
    leaf_values: Box<[f64]>,
    is_leaf: Box<[bool]>,
}

impl RegressionTree {
    /// Number of nodes in the tree.
    pub fn n_nodes(&self) -> usize {
        self.is_leaf.len()
    }

    /// Traverse from the root to the leaf for `features`.
    pub fn traverse_to_leaf(&self, features: ArrayView1<'_, f64>) -> NodeId {
        let mut node: NodeId = 0;
        while !self.is_leaf[node as usize] {
            let i = node as usize;
            let value = features[self.split_indices[i] as usize];
            node = if value < self.thresholds[i] {
                self.left_children[i]
            } else {
                self.right_children[i]
            };
        }
        node
    }

    /// Leaf value reached by `features`.
    pub fn predict_row(&self, features: ArrayView1<'_, f64>) -> f64 {
        self.leaf_values[self.traverse_to_leaf(features) as usize]
    }

    fn from_payload(
        tree: usize,
        payload: TreePayload,
        n_features: usize,
    ) -> Result<Self, ModelError> {
        let n_nodes = payload.is_leaf.len();
        if n_nodes == 0 {
            return Err(ModelError::EmptyTree(tree));
        }

        let lengths = [
            ("split_features", payload.split_features.len()),
            ("thresholds", payload.thresholds.len()),
            ("left_children", payload.left_children.len()),
            ("right_children", payload.right_children.len()),
            ("leaf_values", payload.leaf_values.len()),
        ];
        if let Some(&(field, len)) = lengths.iter().find(|(_, len)| *len != n_nodes) {
            return Err(ModelError::TreeArrayLength {
                tree,
                field,
                len,
                n_nodes,
            });
        }

        for node in 0..n_nodes {
            if payload.is_leaf[node] {
                if !payload.leaf_values[node].is_finite() {
                    return Err(ModelError::NonFiniteParameter {
                        what: format!("leaf value of tree {tree} node {node}"),
                    });
                }
                continue;
            }

            let feature = payload.split_features[node] as usize;
            if feature >= n_features {
                return Err(ModelError::SplitFeatureOutOfRange {
                    tree,
                    node,
                    feature,
                    n_features,
                });
            }
            if payload.thresholds[node].is_nan() {
                return Err(ModelError::NonFiniteParameter {
                    what: format!("threshold of tree {tree} node {node}"),
                });
            }
            for child in [payload.left_children[node], payload.right_children[node]] {
                let c = child as usize;
                if c <= node || c >= n_nodes {
                    return Err(ModelError::InvalidChild {
                        tree,
                        node,
                        child,
                        n_nodes,
                    });
                }
            }
        }

        Ok(Self {
            split_indices: payload.split_features.into_boxed_slice(),
            thresholds: payload.thresholds.into_boxed_slice(),
            left_children: payload.left_children.into_boxed_slice(),
            right_children: payload.right_children.into_boxed_slice(),
            leaf_values: payload.leaf_values.into_boxed_slice(),
            is_leaf: payload.is_leaf.into_boxed_slice(),
        })
    }
}

/// Additive ensemble of regression trees.
///
/// `output = base_score + Σ tree.predict_row(features)`
#[derive(Debug, Clone)]
pub struct TreeEnsemble {
    trees: Vec<RegressionTree>,
    base_score: f64,
    n_features: usize,
    feature_names: Option<Vec<String>>,
}

impl TreeEnsemble {
    /// Number of trees.
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Individual trees.
    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }

    /// Base score.
    pub fn base_score(&self) -> f64 {
        self.base_score
    }
}

impl Predict for TreeEnsemble {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn predict_row(&self, features: ArrayView1<'_, f64>) -> f64 {
        self.trees
            .iter()
            .fold(self.base_score, |acc, tree| acc + tree.predict_row(features))
    }
}

impl TryFrom<TreeEnsemblePayload> for TreeEnsemble {
    type Error = ModelError;

    fn try_from(payload: TreeEnsemblePayload) -> Result<Self, Self::Error> {
        if payload.n_features == 0 {
            return Err(ModelError::NoFeatures);
        }
        if !payload.base_score.is_finite() {
            return Err(ModelError::NonFiniteParameter {
                what: "base_score".to_string(),
            });
        }

        let n_features = payload.n_features;
        let trees = payload
            .trees
            .into_iter()
            .enumerate()
            .map(|(i, tree)| RegressionTree::from_payload(i, tree, n_features))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            trees,
            base_score: payload.base_score,
            n_features,
            feature_names: payload.feature_names,
        })
    }
}
