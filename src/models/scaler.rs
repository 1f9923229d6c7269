//! Serialized feature scalers

use crate::models::artifact::{check_width, Scaler};
use serde::{Deserialize, Serialize};

/// Scaler variants an artifact file may contain.
///
/// Parameters follow scikit-learn's fitted attributes (`mean_`/`scale_` for
/// `StandardScaler`, `min_`/`scale_` for `MinMaxScaler`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerKind {
    /// Rows pass through unchanged
    Identity,
    /// `(x - mean) / scale`
    Standard { mean: Vec<f64>, scale: Vec<f64> },
    /// `x * scale + min`
    MinMax { min: Vec<f64>, scale: Vec<f64> },
}

impl ScalerKind {
    /// Number of columns the scaler was fitted on, if it constrains width
    pub fn width(&self) -> Option<usize> {
        match self {
            ScalerKind::Identity => None,
            ScalerKind::Standard { mean, .. } => Some(mean.len()),
            ScalerKind::MinMax { min, .. } => Some(min.len()),
        }
    }

    /// Structural checks run once at load time
    pub fn validate(&self) -> Result<(), String> {
        match self {
            ScalerKind::Identity => Ok(()),
            ScalerKind::Standard { mean, scale } => {
                check_params("standard", "mean", mean, "scale", scale)?;
                if let Some(i) = scale.iter().position(|&s| s == 0.0) {
                    return Err(format!("standard scaler has zero scale at column {}", i));
                }
                Ok(())
            }
            ScalerKind::MinMax { min, scale } => check_params("min_max", "min", min, "scale", scale),
        }
    }
}

fn check_params(
    kind: &str,
    a_name: &str,
    a: &[f64],
    b_name: &str,
    b: &[f64],
) -> Result<(), String> {
    if a.is_empty() {
        return Err(format!("{} scaler has no columns", kind));
    }
    if a.len() != b.len() {
        return Err(format!(
            "{} scaler has {} {} values but {} {} values",
            kind,
            a.len(),
            a_name,
            b.len(),
            b_name
        ));
    }
    if a.iter().chain(b).any(|v| !v.is_finite()) {
        return Err(format!("{} scaler has non-finite parameters", kind));
    }
    Ok(())
}

impl Scaler for ScalerKind {
    fn transform(&self, rows: &[Vec<f64>]) -> anyhow::Result<Vec<Vec<f64>>> {
        match self {
            ScalerKind::Identity => Ok(rows.to_vec()),
            ScalerKind::Standard { mean, scale } => {
                check_width(rows, mean.len(), "standard scaler")?;
                Ok(rows
                    .iter()
                    .map(|row| {
                        row.iter()
                            .zip(mean.iter().zip(scale))
                            .map(|(x, (m, s))| (x - m) / s)
                            .collect()
                    })
                    .collect())
            }
            ScalerKind::MinMax { min, scale } => {
                check_width(rows, min.len(), "min_max scaler")?;
                Ok(rows
                    .iter()
                    .map(|row| {
                        row.iter()
                            .zip(min.iter().zip(scale))
                            .map(|(x, (m, s))| x * s + m)
                            .collect()
                    })
                    .collect())
            }
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ScalerKind::Identity => "identity",
            ScalerKind::Standard { .. } => "standard",
            ScalerKind::MinMax { .. } => "min_max",
        }
    }
}
