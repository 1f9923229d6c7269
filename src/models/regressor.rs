//! Serialized regression models

use crate::models::aggregator::Aggregation;
use crate::models::artifact::{check_width, Regressor};
use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};

/// Marker scikit-learn uses for "no child" in flattened trees
pub const TREE_LEAF: i64 = -1;

/// Model variants an artifact file may contain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegressorKind {
    /// `intercept + Σ coefficients[i] * x[i]`
    Linear { coefficients: Vec<f64>, intercept: f64 },
    /// Regression trees combined by `aggregation` on top of `base_score`
    TreeEnsemble {
        trees: Vec<RegressionTree>,
        #[serde(default)]
        aggregation: Aggregation,
        #[serde(default)]
        base_score: f64,
    },
}

impl RegressorKind {
    /// Minimum number of columns a row must have, if the model constrains width.
    ///
    /// Exact for linear models; for trees it is one past the highest split feature.
    pub fn width(&self) -> usize {
        match self {
            RegressorKind::Linear { coefficients, .. } => coefficients.len(),
            RegressorKind::TreeEnsemble { trees, .. } => trees
                .iter()
                .filter_map(RegressionTree::max_feature)
                .max()
                .map_or(0, |f| f + 1),
        }
    }

    /// Structural checks run once at load time
    pub fn validate(&self) -> Result<(), String> {
        match self {
            RegressorKind::Linear {
                coefficients,
                intercept,
            } => {
                if coefficients.is_empty() {
                    return Err("linear model has no coefficients".to_string());
                }
                if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
                    return Err("linear model has non-finite parameters".to_string());
                }
                Ok(())
            }
            RegressorKind::TreeEnsemble {
                trees, base_score, ..
            } => {
                if trees.is_empty() {
                    return Err("tree ensemble has no trees".to_string());
                }
                if !base_score.is_finite() {
                    return Err("tree ensemble has a non-finite base score".to_string());
                }
                for (i, tree) in trees.iter().enumerate() {
                    tree.validate().map_err(|e| format!("tree {}: {}", i, e))?;
                }
                Ok(())
            }
        }
    }
}

impl Regressor for RegressorKind {
    fn predict(&self, rows: &[Vec<f64>]) -> anyhow::Result<Vec<f64>> {
        match self {
            RegressorKind::Linear {
                coefficients,
                intercept,
            } => {
                check_width(rows, coefficients.len(), "linear model")?;
                Ok(rows
                    .iter()
                    .map(|row| {
                        intercept
                            + row
                                .iter()
                                .zip(coefficients)
                                .map(|(x, c)| x * c)
                                .sum::<f64>()
                    })
                    .collect())
            }
            RegressorKind::TreeEnsemble {
                trees,
                aggregation,
                base_score,
            } => {
                let width = self.width();
                let mut predictions = Vec::with_capacity(rows.len());
                let mut outputs = Vec::with_capacity(trees.len());

                for (i, row) in rows.iter().enumerate() {
                    if row.len() < width {
                        anyhow::bail!(
                            "tree ensemble splits on feature {}, row {} has {} features",
                            width - 1,
                            i,
                            row.len()
                        );
                    }
                    outputs.clear();
                    for (t, tree) in trees.iter().enumerate() {
                        outputs.push(tree.evaluate(row).with_context(|| format!("tree {}", t))?);
                    }
                    predictions.push(aggregation.combine(*base_score, &outputs));
                }

                Ok(predictions)
            }
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            RegressorKind::Linear { .. } => "linear",
            RegressorKind::TreeEnsemble { .. } => "tree_ensemble",
        }
    }
}

/// A regression tree in scikit-learn's flattened array layout.
///
/// Node 0 is the root. An internal node sends a row left when
/// `row[feature] <= threshold`. Leaves have both children set to
/// [`TREE_LEAF`] and predict `value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<f64>,
}

impl RegressionTree {
    /// Checks that every walk from the root ends at a leaf.
    ///
    /// Children must point strictly forward, which rules out cycles.
    pub fn validate(&self) -> Result<(), String> {
        let n = self.children_left.len();
        if n == 0 {
            return Err("tree has no nodes".to_string());
        }
        if [
            self.children_right.len(),
            self.feature.len(),
            self.threshold.len(),
            self.value.len(),
        ]
        .iter()
        .any(|&len| len != n)
        {
            return Err("tree arrays differ in length".to_string());
        }

        for node in 0..n {
            let (left, right) = (self.children_left[node], self.children_right[node]);

            if left == TREE_LEAF || right == TREE_LEAF {
                if left != right {
                    return Err(format!("node {} has exactly one child", node));
                }
                if !self.value[node].is_finite() {
                    return Err(format!("leaf {} has a non-finite value", node));
                }
                continue;
            }

            for child in [left, right] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(format!("node {} has invalid child index {}", node, child));
                }
            }
            if self.feature[node] < 0 {
                return Err(format!("node {} splits on negative feature", node));
            }
            if !self.threshold[node].is_finite() {
                return Err(format!("node {} has a non-finite threshold", node));
            }
        }

        Ok(())
    }

    /// Highest feature index used by a split, if any
    pub fn max_feature(&self) -> Option<usize> {
        self.children_left
            .iter()
            .zip(&self.feature)
            .filter(|(&left, _)| left != TREE_LEAF)
            .filter_map(|(_, &f)| usize::try_from(f).ok())
            .max()
    }

    /// Walk from the root to a leaf.
    ///
    /// Every index is bounds-checked and each step must move forward, so a
    /// tree that skipped [`validate`](Self::validate) fails instead of
    /// panicking or looping.
    pub fn evaluate(&self, row: &[f64]) -> anyhow::Result<f64> {
        let mut node = 0usize;
        loop {
            let (Some(&left), Some(&right)) =
                (self.children_left.get(node), self.children_right.get(node))
            else {
                anyhow::bail!(
                    "node {} is outside a tree of {} nodes",
                    node,
                    self.children_left.len()
                );
            };

            if left == TREE_LEAF {
                return self
                    .value
                    .get(node)
                    .copied()
                    .ok_or_else(|| anyhow!("leaf {} has no value", node));
            }

            let feature = self
                .feature
                .get(node)
                .and_then(|&f| usize::try_from(f).ok())
                .ok_or_else(|| anyhow!("node {} has no valid split feature", node))?;
            let x = row.get(feature).ok_or_else(|| {
                anyhow!(
                    "node {} splits on feature {}, row has {} features",
                    node,
                    feature,
                    row.len()
                )
            })?;
            let threshold = self
                .threshold
                .get(node)
                .ok_or_else(|| anyhow!("node {} has no threshold", node))?;

            let next = if x <= threshold { left } else { right };
            if next <= node as i64 {
                anyhow::bail!("node {} points back to node {}", node, next);
            }
            node = next as usize;
        }
    }
}
