//! Combining per-tree outputs of a tree ensemble

use serde::{Deserialize, Serialize};

/// How the outputs of an ensemble's trees are combined into one prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    /// Average of the trees (random forest, extra trees)
    #[default]
    Mean,
    /// Sum of the trees (gradient boosting; leaf values already carry the learning rate)
    Sum,
}

impl Aggregation {
    /// Combine tree outputs on top of `base_score`.
    pub fn combine(&self, base_score: f64, tree_outputs: &[f64]) -> f64 {
        let total: f64 = tree_outputs.iter().sum();

        match self {
            Aggregation::Sum => base_score + total,
            Aggregation::Mean if tree_outputs.is_empty() => base_score,
            Aggregation::Mean => base_score + total / tree_outputs.len() as f64,
        }
    }
}
