//! Capability traits for the fitted scaler and model, and the loaded pair

use std::fmt;

/// Normalizes raw feature rows into the range the model was trained on.
pub trait Scaler: Send + Sync {
    /// Transform each row; the output has one row per input row
    fn transform(&self, rows: &[Vec<f64>]) -> anyhow::Result<Vec<Vec<f64>>>;

    /// Short name used in logs
    fn kind(&self) -> &'static str {
        "custom"
    }
}

/// Produces one prediction per scaled row.
pub trait Regressor: Send + Sync {
    fn predict(&self, rows: &[Vec<f64>]) -> anyhow::Result<Vec<f64>>;

    /// Short name used in logs
    fn kind(&self) -> &'static str {
        "custom"
    }
}

/// A fitted `{scaler, model}` pair, immutable once built.
pub struct ModelArtifact {
    scaler: Box<dyn Scaler>,
    model: Box<dyn Regressor>,
    /// Column names seen at fit time, when the artifact records them
    feature_names: Option<Vec<String>>,
}

impl ModelArtifact {
    /// Wrap an already-constructed scaler and model
    pub fn new(scaler: impl Scaler + 'static, model: impl Regressor + 'static) -> Self {
        Self {
            scaler: Box::new(scaler),
            model: Box::new(model),
            feature_names: None,
        }
    }

    /// Record the fit-time feature names
    pub fn with_feature_names(mut self, names: Vec<String>) -> Self {
        self.feature_names = Some(names);
        self
    }

    pub fn scaler(&self) -> &dyn Scaler {
        self.scaler.as_ref()
    }

    pub fn model(&self) -> &dyn Regressor {
        self.model.as_ref()
    }

    pub fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }
}

impl fmt::Debug for ModelArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelArtifact")
            .field("scaler", &self.scaler.kind())
            .field("model", &self.model.kind())
            .field("feature_names", &self.feature_names)
            .finish()
    }
}

/// Fail unless every row has `expected` columns.
pub(crate) fn check_width(rows: &[Vec<f64>], expected: usize, what: &str) -> anyhow::Result<()> {
    for (i, row) in rows.iter().enumerate() {
        if row.len() != expected {
            anyhow::bail!(
                "{} expects {} features, row {} has {}",
                what,
                expected,
                i,
                row.len()
            );
        }
    }
    Ok(())
}
