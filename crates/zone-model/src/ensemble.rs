//! Gradient-boosted tree ensemble
//!
//! Multi-class boosting model exported from the training notebook as JSON.
//! Each boosting stage holds one regression tree per class; a class score is
//! its prior plus the learning-rate-scaled sum of its trees, and the
//! predicted label is the class with the highest score.
//!
//! ```text
//! score[k] = init[k] + η · Σ_stage tree[stage][k](x)
//! label    = classes[argmax_k score[k]]
//! ```

use crate::{Features, ModelError, Predictor, Result, FEATURE_COUNT};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info};

/// One node of a flattened decision tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    /// Go to `left` when `x[feature] <= threshold`, else `right`
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// Regression tree stored depth-first; node 0 is the root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    /// Walk from the root to a leaf.
    ///
    /// Bounds are checked on every step so an unvalidated tree yields an
    /// error instead of a panic. A walk that visits more nodes than the tree
    /// holds is a cycle.
    fn evaluate(&self, features: &Features) -> Result<f64> {
        let mut idx = 0;
        for _ in 0..=self.nodes.len() {
            match self.nodes.get(idx) {
                Some(Node::Leaf { value }) => return Ok(*value),
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let x = features.get(*feature).ok_or_else(|| {
                        ModelError::Inference(format!(
                            "node {} splits on unknown feature {}",
                            idx, feature
                        ))
                    })?;
                    idx = if (*x as f64) <= *threshold { *left } else { *right };
                }
                None => {
                    return Err(ModelError::Inference(format!("tree has no node {}", idx)));
                }
            }
        }
        Err(ModelError::Inference("tree walk did not reach a leaf".to_string()))
    }

    fn validate(&self, n_features: usize) -> std::result::Result<(), String> {
        if self.nodes.is_empty() {
            return Err("empty tree".to_string());
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(format!("node {} has non-finite leaf value", idx));
                    }
                }
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(format!(
                            "node {} splits on feature {} (model has {})",
                            idx, feature, n_features
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {} has non-finite threshold", idx));
                    }
                    // Children must come after their parent, which rules out cycles
                    for child in [*left, *right] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(format!(
                                "node {} points to invalid child {}",
                                idx, child
                            ));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// Pre-trained multi-class gradient boosting classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostedModel {
    pub n_features: usize,
    /// Raw labels emitted for each class position
    pub classes: Vec<i64>,
    /// Prior score per class
    pub init: Vec<f64>,
    pub learning_rate: f64,
    /// `stages[s][k]` is the tree for class `k` in boosting stage `s`
    pub stages: Vec<Vec<Tree>>,
}

impl GradientBoostedModel {
    /// Load and validate a model artifact from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading model from {:?}", path);

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let model: GradientBoostedModel = serde_json::from_reader(reader)?;
        model.validate()?;

        info!(
            "Loaded model: {} classes, {} stages, learning rate {}",
            model.classes.len(),
            model.stages.len(),
            model.learning_rate
        );

        Ok(model)
    }

    /// Parse and validate a model artifact from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let model: GradientBoostedModel = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    /// Check the artifact is structurally sound before it serves any query
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(ModelError::InvalidArtifact(msg));

        if self.n_features != FEATURE_COUNT {
            return invalid(format!(
                "expected {} features, artifact declares {}",
                FEATURE_COUNT, self.n_features
            ));
        }
        if self.classes.is_empty() {
            return invalid("no classes".to_string());
        }
        if self.init.len() != self.classes.len() {
            return invalid(format!(
                "{} priors for {} classes",
                self.init.len(),
                self.classes.len()
            ));
        }
        if self.init.iter().any(|v| !v.is_finite()) || !self.learning_rate.is_finite() {
            return invalid("non-finite prior or learning rate".to_string());
        }

        for (s, stage) in self.stages.iter().enumerate() {
            if stage.len() != self.classes.len() {
                return invalid(format!(
                    "stage {} has {} trees for {} classes",
                    s,
                    stage.len(),
                    self.classes.len()
                ));
            }
            for (k, tree) in stage.iter().enumerate() {
                tree.validate(self.n_features)
                    .or_else(|msg| invalid(format!("stage {} class {}: {}", s, k, msg)))?;
            }
        }

        Ok(())
    }

    /// Per-class scores for one feature vector
    pub fn decision_scores(&self, features: &Features) -> Result<Vec<f64>> {
        let mut scores = self.init.clone();
        for (s, stage) in self.stages.iter().enumerate() {
            if stage.len() != scores.len() {
                return Err(ModelError::Inference(format!(
                    "stage {} has {} trees for {} classes",
                    s,
                    stage.len(),
                    scores.len()
                )));
            }
            for (score, tree) in scores.iter_mut().zip(stage) {
                *score += self.learning_rate * tree.evaluate(features)?;
            }
        }
        Ok(scores)
    }
}

impl Predictor for GradientBoostedModel {
    fn predict(&self, features: &Features) -> Result<i64> {
        let scores = self.decision_scores(features)?;

        // First class wins ties
        let mut best = 0;
        for (k, score) in scores.iter().enumerate().skip(1) {
            if *score > scores[best] {
                best = k;
            }
        }

        let class = *self.classes.get(best).ok_or_else(|| {
            ModelError::Inference(format!(
                "no label for class position {} ({} labels)",
                best,
                self.classes.len()
            ))
        })?;

        debug!("Features {:?} -> scores {:?} -> class {}", features, scores, class);

        Ok(class)
    }
}
