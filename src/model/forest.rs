//! Random-forest artifact loading and evaluation.
//!
//! The trained forest is exported to a JSON artifact: one node list per
//! tree, with split nodes and leaf class distributions. Scoring walks
//! every tree and averages the leaf distributions.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::model::{ModelError, Scored, ScoringModel};

#[derive(Debug, Deserialize)]
struct ForestArtifact {
    name: String,
    n_features: usize,
    classes: Vec<i64>,
    trees: Vec<Tree>,
}

#[derive(Debug, Deserialize)]
struct Tree {
    nodes: Vec<Node>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        distribution: Vec<f64>,
    },
}

/// Classifier backed by a JSON forest export.
pub struct ForestModel {
    artifact: ForestArtifact,
}

impl ForestModel {
    /// Load and validate an artifact. Any failure here aborts startup.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ModelError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let artifact: ForestArtifact =
            serde_json::from_str(&content).map_err(|source| ModelError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_artifact(artifact)
    }

    fn from_artifact(artifact: ForestArtifact) -> Result<Self, ModelError> {
        if artifact.classes.is_empty() {
            return Err(ModelError::Malformed("artifact lists no classes".into()));
        }
        if artifact.trees.is_empty() {
            return Err(ModelError::Malformed("artifact contains no trees".into()));
        }
        for (t, tree) in artifact.trees.iter().enumerate() {
            for (n, node) in tree.nodes.iter().enumerate() {
                match node {
                    Node::Split {
                        feature,
                        left,
                        right,
                        ..
                    } => {
                        if *feature >= artifact.n_features {
                            return Err(ModelError::Malformed(format!(
                                "tree {t} node {n} references feature {feature}, artifact has {}",
                                artifact.n_features
                            )));
                        }
                        if *left >= tree.nodes.len() || *right >= tree.nodes.len() {
                            return Err(ModelError::Malformed(format!(
                                "tree {t} node {n} has a child out of range"
                            )));
                        }
                    }
                    Node::Leaf { distribution } => {
                        if distribution.len() != artifact.classes.len() {
                            return Err(ModelError::Malformed(format!(
                                "tree {t} node {n} distribution width does not match class count"
                            )));
                        }
                    }
                }
            }
        }
        Ok(Self { artifact })
    }

    fn walk<'a>(tree: &'a Tree, features: &[f64]) -> Result<&'a [f64], ModelError> {
        let mut index = 0;
        // The node count bounds the walk; a longer path means a cycle.
        for _ in 0..tree.nodes.len() {
            match &tree.nodes[index] {
                Node::Leaf { distribution } => return Ok(distribution),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
        Err(ModelError::Malformed(
            "tree walk did not reach a leaf".into(),
        ))
    }
}

impl ScoringModel for ForestModel {
    fn name(&self) -> &str {
        &self.artifact.name
    }

    fn score(&self, features: &[f64]) -> Result<Scored, ModelError> {
        if features.len() != self.artifact.n_features {
            return Err(ModelError::FeatureLength {
                expected: self.artifact.n_features,
                actual: features.len(),
            });
        }

        let mut sums = vec![0.0; self.artifact.classes.len()];
        for tree in &self.artifact.trees {
            let distribution = Self::walk(tree, features)?;
            let total: f64 = distribution.iter().sum();
            if total <= 0.0 {
                return Err(ModelError::Malformed(
                    "leaf distribution sums to zero".into(),
                ));
            }
            for (sum, value) in sums.iter_mut().zip(distribution) {
                *sum += value / total;
            }
        }

        let tree_count = self.artifact.trees.len() as f64;
        let probabilities: Vec<f64> = sums.into_iter().map(|sum| sum / tree_count).collect();
        let best = probabilities
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(index, _)| index)
            .unwrap_or(0);

        Ok(Scored {
            class: self.artifact.classes[best],
            probabilities,
        })
    }
}
