//! Single classification tree stored as a flat node array.
//!
//! Node 0 is the root. A split sends a row left when its feature value is
//! strictly below the threshold, right otherwise; NaN follows `default_left`.

use serde::{Deserialize, Serialize};

use super::features::{encode_rows, Feature};
use super::{Label, ModelError, Predictor};
use crate::data::Dataset;

fn default_left() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        /// Index into [`DecisionTree::features`].
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        #[serde(default = "default_left")]
        default_left: bool,
    },
    Leaf {
        label: Label,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub features: Vec<Feature>,
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Check node references. Children must point forward, which rules out
    /// cycles and guarantees every traversal ends at a leaf.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::InvalidTree("tree has no nodes".into()));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    left,
                    right,
                    ..
                } => {
                    if *feature >= self.features.len() {
                        return Err(ModelError::InvalidTree(format!(
                            "node {i} splits on feature {feature} but only {} are declared",
                            self.features.len()
                        )));
                    }
                    for &child in [left, right] {
                        if child <= i || child >= self.nodes.len() {
                            return Err(ModelError::InvalidTree(format!(
                                "node {i} has invalid child {child}"
                            )));
                        }
                    }
                }
                TreeNode::Leaf { label } => {
                    if *label > 1 {
                        return Err(ModelError::InvalidTree(format!(
                            "leaf {i} has label {label}"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    fn traverse(&self, x: &[f64]) -> Label {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { label } => return *label,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    default_left,
                } => {
                    let value = x[*feature];
                    let go_left = if value.is_nan() {
                        *default_left
                    } else {
                        value < *threshold
                    };
                    idx = if go_left { *left } else { *right };
                }
            }
        }
    }
}

impl Predictor for DecisionTree {
    fn name(&self) -> &'static str {
        "decision_tree"
    }

    fn predict(&self, dataset: &Dataset) -> Result<Vec<Label>, ModelError> {
        self.validate()?;
        let rows = encode_rows(&self.features, dataset)?;
        Ok(rows.iter().map(|x| self.traverse(x)).collect())
    }
}
