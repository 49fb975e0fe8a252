//! Gradient-boosted tree ensemble (multi-class softprob)
//!
//! Each tree contributes a leaf value to the margin of one class. Class
//! margins start at `base_score`; probabilities are the softmax of the
//! margins and the predicted class is the arg-max margin.
//!
//! ## File format
//!
//! ```json
//! {
//!   "num_class": 3,
//!   "num_features": 9,
//!   "base_score": 0.5,
//!   "trees": [
//!     { "class": 1, "nodes": [
//!         { "split": { "feature": 2, "threshold": 0.5, "yes": 1, "no": 2, "missing": 1 } },
//!         { "leaf": -0.4 },
//!         { "leaf": 0.7 }
//!     ] }
//!   ]
//! }
//! ```
//!
//! Routing follows `x < threshold → yes`, otherwise `no`. NaN takes `missing`.

use std::path::Path;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use super::{Classifier, ModelError};
use crate::types::{FeatureVector, NUM_FEATURES};

/// Largest class count the triage labels can represent.
const MAX_CLASSES: usize = 3;

/// Internal split node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Split {
    pub feature: usize,
    pub threshold: f64,
    pub yes: usize,
    pub no: usize,
    pub missing: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Node {
    Split(Split),
    Leaf(f64),
}

/// One regression tree. `nodes[0]` is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub class: usize,
    pub nodes: Vec<Node>,
}

impl Tree {
    /// Leaf value reached by `features`.
    ///
    /// Relies on `validate()` having checked child indices point forward, so
    /// the walk always terminates.
    fn score(&self, features: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes.get(idx) {
                Some(Node::Leaf(value)) => return *value,
                Some(Node::Split(split)) => {
                    let x = features.get(split.feature).copied().unwrap_or(f64::NAN);
                    idx = if x.is_nan() {
                        split.missing
                    } else if x < split.threshold {
                        split.yes
                    } else {
                        split.no
                    };
                }
                None => return 0.0,
            }
        }
    }

    fn validate(&self, index: usize, num_class: usize, num_features: usize) -> Vec<String> {
        let mut errors = Vec::new();
        if self.class >= num_class {
            errors.push(format!(
                "trees[{index}].class = {} must be < num_class ({num_class})",
                self.class
            ));
        }
        if self.nodes.is_empty() {
            errors.push(format!("trees[{index}] has no nodes"));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            let Node::Split(split) = node else { continue };
            if split.feature >= num_features {
                errors.push(format!(
                    "trees[{index}].nodes[{i}].feature = {} must be < num_features ({num_features})",
                    split.feature
                ));
            }
            if !split.threshold.is_finite() {
                errors.push(format!("trees[{index}].nodes[{i}].threshold must be finite"));
            }
            for (edge, child) in [("yes", split.yes), ("no", split.no), ("missing", split.missing)] {
                if child <= i || child >= self.nodes.len() {
                    errors.push(format!(
                        "trees[{index}].nodes[{i}].{edge} = {child} must point forward within the tree"
                    ));
                }
            }
        }
        errors
    }
}

/// Boosted tree classifier over the nine triage features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostedTreeModel {
    pub num_class: usize,
    pub num_features: usize,
    #[serde(default)]
    pub base_score: f64,
    pub trees: Vec<Tree>,
}

impl BoostedTreeModel {
    /// Load and validate a model from a JSON file.
    pub fn load_from_file(path: &Path) -> Result<Self, ModelError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let model: Self = serde_json::from_str(&contents).map_err(|source| ModelError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        model.validate()?;
        Ok(model)
    }

    /// Structural checks: class and feature bounds, acyclic trees.
    pub fn validate(&self) -> Result<(), ModelError> {
        let mut errors = Vec::new();

        if self.num_class == 0 || self.num_class > MAX_CLASSES {
            errors.push(format!(
                "num_class = {} must be between 1 and {MAX_CLASSES}",
                self.num_class
            ));
        }
        if self.num_features != NUM_FEATURES {
            errors.push(format!(
                "num_features = {} must be {NUM_FEATURES}",
                self.num_features
            ));
        }
        if !self.base_score.is_finite() {
            errors.push("base_score must be finite".to_string());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            errors.extend(tree.validate(i, self.num_class, self.num_features));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ModelError::Invalid(errors.join("; ")))
        }
    }

    /// Raw per-class margins.
    pub fn margins(&self, features: &FeatureVector) -> Result<Vec<f64>> {
        if self.num_features != NUM_FEATURES {
            bail!(
                "feature count mismatch: model expects {}, got {NUM_FEATURES}",
                self.num_features
            );
        }
        let mut margins = vec![self.base_score; self.num_class];
        for tree in &self.trees {
            if let Some(m) = margins.get_mut(tree.class) {
                *m += tree.score(features.as_slice());
            }
        }
        Ok(margins)
    }
}

fn softmax(margins: &[f64]) -> Vec<f64> {
    let max = margins.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = margins.iter().map(|m| (m - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

impl Classifier for BoostedTreeModel {
    fn name(&self) -> &str {
        "boosted-trees"
    }

    fn predict(&self, features: &FeatureVector) -> Result<usize> {
        let margins = self.margins(features)?;
        let mut best = 0;
        for (i, m) in margins.iter().enumerate() {
            if *m > margins[best] {
                best = i;
            }
        }
        Ok(best)
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>> {
        Ok(softmax(&self.margins(features)?))
    }
}
