//! Decision-forest evaluation over exported tree arrays.
//!
//! Trees arrive in the flat layout fitted estimators export: parallel
//! `children_left`, `children_right`, `feature`, `threshold` and `value`
//! arrays indexed by node id, where a child id of `-1` marks a leaf. They are
//! checked once and converted into [`Node`]s so that prediction never has to
//! bounds-check.

use super::domain::ScaledVector;
use serde::{Deserialize, Serialize};

/// Seam between the pipeline and the fitted model.
pub trait GradeClassifier: Send + Sync {
    /// Returns the encoded grade class for a scaled feature vector.
    fn predict_class(&self, features: &ScaledVector) -> i64;
}

const LEAF: i64 = -1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeArrays {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestArrays {
    pub classes: Vec<i64>,
    pub trees: Vec<TreeArrays>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ForestError {
    #[error("forest has no trees")]
    NoTrees,
    #[error("forest has no classes")]
    NoClasses,
    #[error("tree {tree}: node arrays have inconsistent lengths")]
    RaggedArrays { tree: usize },
    #[error("tree {tree} has no nodes")]
    EmptyTree { tree: usize },
    #[error("tree {tree}, node {node}: child {child} does not exist")]
    BadChild { tree: usize, node: usize, child: i64 },
    #[error("tree {tree}, node {node}: splits on feature {feature} but the forest expects {n_features}")]
    BadFeature {
        tree: usize,
        node: usize,
        feature: i64,
        n_features: usize,
    },
    #[error("tree {tree}, node {node}: threshold is not finite")]
    BadThreshold { tree: usize, node: usize },
    #[error("tree {tree}, node {node}: leaf has {found} class weights, expected {expected}")]
    BadLeaf {
        tree: usize,
        node: usize,
        found: usize,
        expected: usize,
    },
    #[error("tree {tree} is not a tree: node {node} is reachable twice or forms a cycle")]
    NotATree { tree: usize, node: usize },
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        probabilities: Vec<f64>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    fn from_arrays(
        index: usize,
        arrays: &TreeArrays,
        n_classes: usize,
        n_features: usize,
    ) -> Result<Self, ForestError> {
        let len = arrays.children_left.len();
        if len == 0 {
            return Err(ForestError::EmptyTree { tree: index });
        }
        if [
            arrays.children_right.len(),
            arrays.feature.len(),
            arrays.threshold.len(),
            arrays.value.len(),
        ]
        .iter()
        .any(|other| *other != len)
        {
            return Err(ForestError::RaggedArrays { tree: index });
        }

        let child = |node: usize, raw: i64| -> Result<usize, ForestError> {
            usize::try_from(raw)
                .ok()
                .filter(|child| *child < len && *child != node)
                .ok_or(ForestError::BadChild {
                    tree: index,
                    node,
                    child: raw,
                })
        };

        let mut nodes = Vec::with_capacity(len);
        for node in 0..len {
            let left = arrays.children_left[node];
            let right = arrays.children_right[node];
            if left == LEAF && right == LEAF {
                let weights = &arrays.value[node];
                if weights.len() != n_classes {
                    return Err(ForestError::BadLeaf {
                        tree: index,
                        node,
                        found: weights.len(),
                        expected: n_classes,
                    });
                }
                nodes.push(Node::Leaf {
                    probabilities: normalize(weights),
                });
                continue;
            }

            let feature = arrays.feature[node];
            let feature_index = usize::try_from(feature)
                .ok()
                .filter(|feature| *feature < n_features)
                .ok_or(ForestError::BadFeature {
                    tree: index,
                    node,
                    feature,
                    n_features,
                })?;
            let threshold = arrays.threshold[node];
            if !threshold.is_finite() {
                return Err(ForestError::BadThreshold { tree: index, node });
            }
            nodes.push(Node::Split {
                feature: feature_index,
                threshold,
                left: child(node, left)?,
                right: child(node, right)?,
            });
        }

        ensure_acyclic(index, &nodes)?;
        Ok(Self { nodes })
    }

    /// Walks from the root and returns the reached leaf's class probabilities.
    fn leaf_probabilities(&self, features: &[f64]) -> &[f64] {
        let mut current = 0;
        loop {
            match &self.nodes[current] {
                Node::Leaf { probabilities } => return probabilities,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = features.get(*feature).copied().unwrap_or(f64::NAN);
                    // NaN goes right, as in the fitted estimator.
                    current = if value <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

fn normalize(weights: &[f64]) -> Vec<f64> {
    let total: f64 = weights.iter().sum();
    if total > 0.0 && total.is_finite() {
        weights.iter().map(|weight| weight / total).collect()
    } else {
        vec![0.0; weights.len()]
    }
}

/// Every node must be reached at most once from the root.
fn ensure_acyclic(tree: usize, nodes: &[Node]) -> Result<(), ForestError> {
    let mut seen = vec![false; nodes.len()];
    let mut stack = vec![0usize];
    while let Some(node) = stack.pop() {
        if std::mem::replace(&mut seen[node], true) {
            return Err(ForestError::NotATree { tree, node });
        }
        if let Node::Split { left, right, .. } = &nodes[node] {
            stack.push(*left);
            stack.push(*right);
        }
    }
    Ok(())
}

/// Ensemble of trees voting with averaged class probabilities.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionForest {
    classes: Vec<i64>,
    trees: Vec<DecisionTree>,
    n_features: usize,
}

impl DecisionForest {
    pub fn from_arrays(arrays: &ForestArrays, n_features: usize) -> Result<Self, ForestError> {
        if arrays.classes.is_empty() {
            return Err(ForestError::NoClasses);
        }
        if arrays.trees.is_empty() {
            return Err(ForestError::NoTrees);
        }
        let trees = arrays
            .trees
            .iter()
            .enumerate()
            .map(|(index, tree)| {
                DecisionTree::from_arrays(index, tree, arrays.classes.len(), n_features)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            classes: arrays.classes.clone(),
            trees,
            n_features,
        })
    }

    pub fn classes(&self) -> &[i64] {
        &self.classes
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Mean of the per-tree leaf probabilities.
    pub fn predict_proba(&self, features: &ScaledVector) -> Vec<f64> {
        let mut totals = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            for (total, probability) in totals
                .iter_mut()
                .zip(tree.leaf_probabilities(features.values()))
            {
                *total += probability;
            }
        }
        let count = self.trees.len() as f64;
        totals.iter_mut().for_each(|total| *total /= count);
        totals
    }
}

impl GradeClassifier for DecisionForest {
    fn predict_class(&self, features: &ScaledVector) -> i64 {
        let probabilities = self.predict_proba(features);
        // First maximum wins ties.
        let best = probabilities
            .iter()
            .enumerate()
            .fold(0, |best, (index, probability)| {
                if *probability > probabilities[best] {
                    index
                } else {
                    best
                }
            });
        self.classes[best]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(feature: i64, threshold: f64, left: Vec<f64>, right: Vec<f64>) -> TreeArrays {
        let root: Vec<f64> = left.iter().zip(&right).map(|(l, r)| l + r).collect();
        TreeArrays {
            children_left: vec![1, -1, -1],
            children_right: vec![2, -1, -1],
            feature: vec![feature, -2, -2],
            threshold: vec![threshold, -2.0, -2.0],
            value: vec![root, left, right],
        }
    }

    fn forest(trees: Vec<TreeArrays>) -> DecisionForest {
        DecisionForest::from_arrays(
            &ForestArrays {
                classes: vec![0, 1, 2],
                trees,
            },
            2,
        )
        .expect("valid forest")
    }

    #[test]
    fn threshold_is_inclusive_on_the_left() {
        let forest = forest(vec![stump(1, 0.5, vec![9.0, 1.0, 0.0], vec![0.0, 1.0, 9.0])]);
        assert_eq!(forest.predict_class(&ScaledVector::new(vec![0.0, 0.5])), 0);
        assert_eq!(forest.predict_class(&ScaledVector::new(vec![0.0, 0.51])), 2);
    }

    #[test]
    fn averages_probabilities_across_trees() {
        let forest = forest(vec![
            stump(0, 0.0, vec![6.0, 4.0, 0.0], vec![0.0, 0.0, 1.0]),
            stump(0, 0.0, vec![0.0, 8.0, 2.0], vec![1.0, 0.0, 0.0]),
        ]);
        let sample = ScaledVector::new(vec![-1.0, 0.0]);
        let proba = forest.predict_proba(&sample);
        assert!((proba[0] - 0.3).abs() < 1e-12);
        assert!((proba[1] - 0.6).abs() < 1e-12);
        assert!((proba[2] - 0.1).abs() < 1e-12);
        assert_eq!(forest.predict_class(&sample), 1);
    }

    #[test]
    fn ties_resolve_to_first_class() {
        let forest = forest(vec![stump(0, 0.0, vec![1.0, 1.0, 0.0], vec![0.0, 1.0, 1.0])]);
        assert_eq!(forest.predict_class(&ScaledVector::new(vec![-1.0, 0.0])), 0);
        assert_eq!(forest.predict_class(&ScaledVector::new(vec![1.0, 0.0])), 1);
    }

    #[test]
    fn returns_class_labels_not_indices() {
        let forest = DecisionForest::from_arrays(
            &ForestArrays {
                classes: vec![3, 5],
                trees: vec![stump(0, 0.0, vec![1.0, 0.0], vec![0.0, 1.0])],
            },
            1,
        )
        .expect("valid forest");
        assert_eq!(forest.predict_class(&ScaledVector::new(vec![1.0])), 5);
    }

    #[test]
    fn rejects_out_of_range_references() {
        let mut tree = stump(0, 0.0, vec![1.0, 0.0, 0.0], vec![0.0, 0.0, 1.0]);
        tree.children_right[0] = 7;
        let err = DecisionForest::from_arrays(
            &ForestArrays {
                classes: vec![0, 1, 2],
                trees: vec![tree],
            },
            2,
        )
        .expect_err("dangling child");
        assert_eq!(
            err,
            ForestError::BadChild {
                tree: 0,
                node: 0,
                child: 7
            }
        );

        let tree = stump(4, 0.0, vec![1.0, 0.0, 0.0], vec![0.0, 0.0, 1.0]);
        let err = DecisionForest::from_arrays(
            &ForestArrays {
                classes: vec![0, 1, 2],
                trees: vec![tree],
            },
            2,
        )
        .expect_err("feature out of range");
        assert!(matches!(err, ForestError::BadFeature { feature: 4, .. }));
    }

    #[test]
    fn rejects_cycles_and_bad_leaves() {
        let mut tree = stump(0, 0.0, vec![1.0, 0.0, 0.0], vec![0.0, 0.0, 1.0]);
        tree.children_left[2] = 1;
        tree.children_right[2] = 2;
        tree.feature[2] = 0;
        tree.threshold[2] = 0.0;
        let err = DecisionForest::from_arrays(
            &ForestArrays {
                classes: vec![0, 1, 2],
                trees: vec![tree],
            },
            2,
        )
        .expect_err("self reference");
        assert!(matches!(err, ForestError::BadChild { node: 2, .. }));

        let tree = stump(0, 0.0, vec![1.0, 0.0], vec![0.0, 0.0, 1.0]);
        let err = DecisionForest::from_arrays(
            &ForestArrays {
                classes: vec![0, 1, 2],
                trees: vec![tree],
            },
            2,
        )
        .expect_err("short leaf");
        assert!(matches!(
            err,
            ForestError::BadLeaf {
                node: 1,
                found: 2,
                expected: 3,
                ..
            }
        ));
    }

    #[test]
    fn rejects_empty_forest() {
        assert_eq!(
            DecisionForest::from_arrays(
                &ForestArrays {
                    classes: vec![0],
                    trees: vec![],
                },
                1
            )
            .expect_err("no trees"),
            ForestError::NoTrees
        );
    }
}
