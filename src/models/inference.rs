//! Scale-then-predict inference over the feature schema

use crate::config::AppConfig;
use crate::error::{PredictorError, Result};
use crate::feature_schema::FeatureSchema;
use crate::models::artifact::ModelArtifact;
use crate::models::loader::ArtifactLoader;
use crate::types::inputs::InputValues;
use crate::types::prediction::PredictionResult;
use anyhow::anyhow;
use std::sync::Arc;
use tracing::{debug, info};

/// What to do with input keys the schema does not define
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputPolicy {
    /// Extra keys are left out of the vector
    #[default]
    IgnoreUnknown,
    /// Extra keys fail with [`PredictorError::UnknownFeature`]
    RejectUnknown,
}

/// Run one prediction, ignoring input keys outside the schema.
///
/// The vector is assembled in schema order and validated before the scaler
/// is called, so a missing key never reaches the artifact.
pub fn predict(
    artifact: &ModelArtifact,
    schema: &FeatureSchema,
    inputs: &InputValues,
) -> Result<PredictionResult> {
    predict_with_policy(artifact, schema, inputs, InputPolicy::IgnoreUnknown)
}

/// [`predict`] with an explicit policy for unknown input keys
pub fn predict_with_policy(
    artifact: &ModelArtifact,
    schema: &FeatureSchema,
    inputs: &InputValues,
    policy: InputPolicy,
) -> Result<PredictionResult> {
    let unknown = schema.unknown_keys(inputs);
    if !unknown.is_empty() {
        match policy {
            InputPolicy::RejectUnknown => {
                return Err(PredictorError::UnknownFeature(unknown[0].clone()));
            }
            InputPolicy::IgnoreUnknown => {
                debug!(ignored = ?unknown, "Ignoring inputs outside the feature schema");
            }
        }
    }

    let vector = schema.assemble(inputs)?;

    let scaled = artifact
        .scaler()
        .transform(&[vector])
        .map_err(PredictorError::Inference)?;

    let predictions = artifact
        .model()
        .predict(&scaled)
        .map_err(PredictorError::Inference)?;

    let value = *predictions
        .first()
        .ok_or_else(|| PredictorError::Inference(anyhow!("model returned no predictions")))?;

    if !value.is_finite() {
        return Err(PredictorError::Inference(anyhow!(
            "model returned a non-finite prediction ({})",
            value
        )));
    }

    debug!(prediction_kw = value, "Inference complete");

    Ok(PredictionResult::new(value, inputs.clone()))
}

/// Loaded artifact and schema, shared read-only across predictions
#[derive(Debug, Clone)]
pub struct InferenceEngine {
    artifact: Arc<ModelArtifact>,
    schema: Arc<FeatureSchema>,
    policy: InputPolicy,
}

impl InferenceEngine {
    /// Create an engine over an already-loaded artifact
    pub fn new(artifact: Arc<ModelArtifact>, schema: Arc<FeatureSchema>) -> Self {
        Self {
            artifact,
            schema,
            policy: InputPolicy::default(),
        }
    }

    /// Set the policy for unknown input keys
    pub fn with_policy(mut self, policy: InputPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Load the configured artifact for the solar schema and check that they match.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let artifact = ArtifactLoader::new().load(&config.artifact.path)?;

        let engine = Self::new(Arc::new(artifact), Arc::new(FeatureSchema::solar()))
            .with_policy(config.artifact.input_policy());
        engine.check_artifact_schema()?;

        info!(
            features = engine.schema.len(),
            policy = ?engine.policy,
            "Inference engine initialized"
        );

        Ok(engine)
    }

    /// Verify the artifact's fit-time feature names equal the schema's key order.
    ///
    /// Artifacts that do not record names pass unchecked.
    pub fn check_artifact_schema(&self) -> Result<()> {
        let Some(found) = self.artifact.feature_names() else {
            debug!("Artifact does not record feature names; skipping schema check");
            return Ok(());
        };

        let expected = self.schema.keys_in_order();
        if found.iter().map(String::as_str).ne(expected.iter().copied()) {
            return Err(PredictorError::SchemaMismatch {
                expected: expected.into_iter().map(str::to_string).collect(),
                found: found.to_vec(),
            });
        }

        Ok(())
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Shared handle to the schema, for the form that feeds this engine
    pub fn shared_schema(&self) -> Arc<FeatureSchema> {
        Arc::clone(&self.schema)
    }

    pub fn policy(&self) -> InputPolicy {
        self.policy
    }

    /// Run inference on one set of inputs
    pub fn predict(&self, inputs: &InputValues) -> Result<PredictionResult> {
        predict_with_policy(&self.artifact, &self.schema, inputs, self.policy)
    }

    /// Run inference on each set of inputs independently
    pub fn predict_batch(&self, batch: &[InputValues]) -> Vec<Result<PredictionResult>> {
        batch.iter().map(|inputs| self.predict(inputs)).collect()
    }
}
