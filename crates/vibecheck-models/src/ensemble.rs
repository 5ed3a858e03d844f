//! Decision-tree ensemble inference over exported model artifacts.
//!
//! Both pre-trained classifiers ship in the same node-array layout the
//! training job exports: parallel per-node arrays with `feature == -1`
//! marking a leaf. A tagged `kind` selects how per-tree outputs combine.

use std::path::Path;

use serde::Deserialize;

use crate::error::ModelError;

/// One decision tree in node-array form.
///
/// Parallel arrays are indexed by node id, with node 0 as the root. `value`
/// holds per-node class scores: full class distributions for averaging
/// ensembles, a single margin for boosting ensembles.
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionTree {
    feature: Vec<i64>,
    threshold: Vec<f64>,
    children_left: Vec<i64>,
    children_right: Vec<i64>,
    value: Vec<Vec<f64>>,
}

impl DecisionTree {
    /// Walk the tree for one sample and return the leaf node id.
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    fn leaf_for(&self, features: &[f64]) -> usize {
        let mut node = 0_usize;
        while self.feature[node] >= 0 {
            let feature = self.feature[node] as usize;
            node = if features[feature] <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        node
    }

    #[allow(clippy::cast_possible_wrap)]
    fn validate(&self, index: usize, n_features: usize, value_width: usize) -> Result<(), String> {
        let nodes = self.feature.len();
        if nodes == 0 {
            return Err(format!("tree {index} has no nodes"));
        }
        if self.threshold.len() != nodes
            || self.children_left.len() != nodes
            || self.children_right.len() != nodes
            || self.value.len() != nodes
        {
            return Err(format!("tree {index} node arrays disagree on length"));
        }
        for node in 0..nodes {
            let feature = self.feature[node];
            if feature >= 0 {
                if feature >= n_features as i64 {
                    return Err(format!(
                        "tree {index} node {node} splits on feature {feature}, model has {n_features}"
                    ));
                }
                for child in [self.children_left[node], self.children_right[node]] {
                    // Children must point forward so traversal terminates.
                    if child <= node as i64 || child >= nodes as i64 {
                        return Err(format!(
                            "tree {index} node {node} has out-of-order child {child}"
                        ));
                    }
                }
            } else if self.value[node].len() < value_width {
                return Err(format!(
                    "tree {index} leaf {node} carries {} scores, expected at least {value_width}",
                    self.value[node].len()
                ));
            }
        }
        Ok(())
    }
}

/// How per-tree outputs combine into a single prediction.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EnsembleKind {
    /// Gradient boosting: trees are assigned round-robin to classes and
    /// their leaf margins summed per class on top of `base_score`.
    Boosting { base_score: f64 },
    /// Random-forest averaging: leaf class distributions are normalized and
    /// averaged across trees.
    Averaging,
}

/// A pre-trained tree-ensemble classifier.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeEnsemble {
    n_classes: usize,
    n_features: usize,
    #[serde(flatten)]
    kind: EnsembleKind,
    trees: Vec<DecisionTree>,
}

impl TreeEnsemble {
    /// Load an ensemble export from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Io`] if the file cannot be read,
    /// [`ModelError::Parse`] if it is not a valid export, and
    /// [`ModelError::Invalid`] if the node arrays are inconsistent.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let ensemble: Self = serde_json::from_str(&raw).map_err(|source| ModelError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        ensemble.validate().map_err(|reason| ModelError::Invalid {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(ensemble)
    }

    fn validate(&self) -> Result<(), String> {
        if self.n_classes == 0 {
            return Err("n_classes must be positive".to_string());
        }
        if self.n_features == 0 {
            return Err("n_features must be positive".to_string());
        }
        if self.trees.is_empty() {
            return Err("ensemble contains no trees".to_string());
        }
        if matches!(self.kind, EnsembleKind::Boosting { .. })
            && self.trees.len() % self.n_classes != 0
        {
            return Err(format!(
                "{} trees cannot round-robin over {} classes",
                self.trees.len(),
                self.n_classes
            ));
        }
        let value_width = match self.kind {
            EnsembleKind::Boosting { .. } => 1,
            EnsembleKind::Averaging => self.n_classes,
        };
        for (index, tree) in self.trees.iter().enumerate() {
            tree.validate(index, self.n_features, value_width)?;
        }
        Ok(())
    }

    /// Number of classes this ensemble scores.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Input width the ensemble expects.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Predicted class code for one feature vector. Ties go to the lowest
    /// class code.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::FeatureShape`] if `features` does not match the
    /// model's input width.
    pub fn predict(&self, features: &[f64]) -> Result<usize, ModelError> {
        if features.len() != self.n_features {
            return Err(ModelError::FeatureShape {
                expected: self.n_features,
                got: features.len(),
            });
        }
        let scores = match self.kind {
            EnsembleKind::Boosting { base_score } => self.boosted_scores(features, base_score),
            EnsembleKind::Averaging => self.averaged_scores(features),
        };
        Ok(argmax(&scores))
    }

    fn boosted_scores(&self, features: &[f64], base_score: f64) -> Vec<f64> {
        let mut scores = vec![base_score; self.n_classes];
        for (index, tree) in self.trees.iter().enumerate() {
            let leaf = tree.leaf_for(features);
            scores[index % self.n_classes] += tree.value[leaf][0];
        }
        scores
    }

    fn averaged_scores(&self, features: &[f64]) -> Vec<f64> {
        let mut scores = vec![0.0_f64; self.n_classes];
        for tree in &self.trees {
            let leaf = tree.leaf_for(features);
            let distribution = &tree.value[leaf];
            let total: f64 = distribution.iter().take(self.n_classes).sum();
            if total <= 0.0 {
                continue;
            }
            for (class, weight) in distribution.iter().take(self.n_classes).enumerate() {
                scores[class] += weight / total;
            }
        }
        scores
    }
}

/// Index of the largest score; ties go to the lowest index.
fn argmax(scores: &[f64]) -> usize {
    let mut best = 0_usize;
    for (index, &score) in scores.iter().enumerate() {
        if score > scores[best] {
            best = index;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Depth-1 stump: `low` when `features[feature] <= threshold`, else `high`.
    fn stump(feature: i64, threshold: f64, low: Vec<f64>, high: Vec<f64>) -> serde_json::Value {
        json!({
            "feature": [feature, -1, -1],
            "threshold": [threshold, 0.0, 0.0],
            "children_left": [1, -1, -1],
            "children_right": [2, -1, -1],
            "value": [[0.0], low, high],
        })
    }

    fn leaf(value: Vec<f64>) -> serde_json::Value {
        json!({
            "feature": [-1],
            "threshold": [0.0],
            "children_left": [-1],
            "children_right": [-1],
            "value": [value],
        })
    }

    fn boosting_three_class() -> TreeEnsemble {
        // Tree per class: class 1 keyed on feature 0, class 2 on feature 1,
        // class 0 gets a flat margin.
        serde_json::from_value(json!({
            "n_classes": 3,
            "n_features": 2,
            "kind": "boosting",
            "base_score": 0.0,
            "trees": [
                leaf(vec![0.5]),
                stump(0, 0.5, vec![0.0], vec![2.0]),
                stump(1, 0.5, vec![0.0], vec![2.0]),
            ],
        }))
        .unwrap()
    }

    #[test]
    fn boosting_sums_margins_per_class() {
        let model = boosting_three_class();
        assert_eq!(model.predict(&[1.0, 0.0]).unwrap(), 1);
        assert_eq!(model.predict(&[0.0, 1.0]).unwrap(), 2);
        assert_eq!(model.predict(&[0.0, 0.0]).unwrap(), 0);
    }

    #[test]
    fn averaging_votes_with_leaf_distributions() {
        let model: TreeEnsemble = serde_json::from_value(json!({
            "n_classes": 2,
            "n_features": 1,
            "kind": "averaging",
            "trees": [
                stump(0, 0.5, vec![3.0, 1.0], vec![0.0, 4.0]),
                stump(0, 1.5, vec![1.0, 1.0], vec![0.0, 1.0]),
            ],
        }))
        .unwrap();
        assert_eq!(model.predict(&[0.0]).unwrap(), 0);
        assert_eq!(model.predict(&[2.0]).unwrap(), 1);
    }

    #[test]
    fn predict_rejects_wrong_feature_width() {
        let model = boosting_three_class();
        let err = model.predict(&[1.0]).unwrap_err();
        assert!(
            matches!(err, ModelError::FeatureShape { expected: 2, got: 1 }),
            "got {err:?}"
        );
    }

    #[test]
    fn ties_go_to_the_lowest_class_code() {
        let model: TreeEnsemble = serde_json::from_value(json!({
            "n_classes": 2,
            "n_features": 1,
            "kind": "averaging",
            "trees": [leaf(vec![1.0, 1.0])],
        }))
        .unwrap();
        assert_eq!(model.predict(&[0.0]).unwrap(), 0);
    }

    #[test]
    fn load_rejects_mismatched_node_arrays() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let broken = json!({
            "n_classes": 2,
            "n_features": 1,
            "kind": "averaging",
            "trees": [{
                "feature": [-1],
                "threshold": [],
                "children_left": [-1],
                "children_right": [-1],
                "value": [[1.0, 1.0]],
            }],
        });
        std::fs::write(&path, broken.to_string()).unwrap();
        let err = TreeEnsemble::load(&path).unwrap_err();
        assert!(matches!(err, ModelError::Invalid { .. }), "got {err:?}");
    }

    #[test]
    fn load_rejects_backward_child_pointers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let cyclic = json!({
            "n_classes": 2,
            "n_features": 1,
            "kind": "averaging",
            "trees": [{
                "feature": [0, -1],
                "threshold": [0.5, 0.0],
                "children_left": [0, -1],
                "children_right": [1, -1],
                "value": [[0.0], [1.0, 1.0]],
            }],
        });
        std::fs::write(&path, cyclic.to_string()).unwrap();
        let err = TreeEnsemble::load(&path).unwrap_err();
        assert!(matches!(err, ModelError::Invalid { .. }), "got {err:?}");
    }

    #[test]
    fn load_rejects_boosting_tree_count_not_divisible_by_classes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let lopsided = json!({
            "n_classes": 3,
            "n_features": 1,
            "kind": "boosting",
            "base_score": 0.0,
            "trees": [leaf(vec![0.5]), leaf(vec![0.5])],
        });
        std::fs::write(&path, lopsided.to_string()).unwrap();
        let err = TreeEnsemble::load(&path).unwrap_err();
        assert!(matches!(err, ModelError::Invalid { .. }), "got {err:?}");
    }
}
