//! Error types for the solar power predictor

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for predictor operations
pub type Result<T> = std::result::Result<T, PredictorError>;

/// Errors raised while loading the artifact, validating inputs or running inference
#[derive(Error, Debug)]
pub enum PredictorError {
    /// Nothing exists at the configured artifact path
    #[error("model artifact not found at {}", .path.display())]
    ArtifactNotFound { path: PathBuf },

    /// The artifact path exists but could not be read
    #[error("model artifact at {} could not be read: {source}", .path.display())]
    ArtifactUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The artifact was read but is not a valid `{scaler, model}` pair
    #[error("model artifact at {} is corrupt: {reason}", .path.display())]
    ArtifactCorrupt { path: PathBuf, reason: String },

    /// The feature names recorded at fit time differ from the form's schema
    #[error("artifact was fitted on features {found:?}, but the form provides {expected:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// Lookup of a key the schema does not define
    #[error("unknown feature: {0}")]
    UnknownFeature(String),

    /// Input values lack a key the schema requires
    #[error("missing feature: {0}")]
    MissingFeature(String),

    /// Two schema entries share a key
    #[error("duplicate feature in schema: {0}")]
    DuplicateFeature(String),

    /// A schema must describe at least one feature
    #[error("feature schema is empty")]
    EmptySchema,

    /// NaN or infinite value supplied for a feature
    #[error("feature {key} must be a finite number, got {value}")]
    NonFiniteFeature { key: String, value: f64 },

    /// Text entered into a form field is not a number
    #[error("invalid number for {key}: {text:?}")]
    InvalidNumber { key: String, text: String },

    /// The scaler or the model failed on the assembled vector
    #[error("inference failed: {0:#}")]
    Inference(#[source] anyhow::Error),
}

impl PredictorError {
    /// Whether the error leaves the host unable to serve any prediction
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ArtifactNotFound { .. }
                | Self::ArtifactUnreadable { .. }
                | Self::ArtifactCorrupt { .. }
                | Self::SchemaMismatch { .. }
        )
    }

    /// User-facing hint shown next to the error message
    pub fn hint(&self) -> &'static str {
        match self {
            Self::ArtifactNotFound { .. } => {
                "Please ensure you have run your training script to generate a valid model artifact."
            }
            Self::ArtifactUnreadable { .. } => {
                "Check that the configured artifact path points to a readable file."
            }
            Self::ArtifactCorrupt { .. } => {
                "The model artifact might be corrupted or in an incorrect format."
            }
            Self::SchemaMismatch { .. } => {
                "The artifact was trained on different feature names; retrain or update the form schema."
            }
            Self::UnknownFeature(_)
            | Self::MissingFeature(_)
            | Self::DuplicateFeature(_)
            | Self::EmptySchema => {
                "Please verify the column names used in your model training script."
            }
            Self::NonFiniteFeature { .. } | Self::InvalidNumber { .. } => {
                "Enter a finite number for every parameter."
            }
            Self::Inference(_) => "Check your inputs and the training pipeline that produced the artifact.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_errors_are_fatal() {
        let not_found = PredictorError::ArtifactNotFound {
            path: PathBuf::from("model.json"),
        };
        let corrupt = PredictorError::ArtifactCorrupt {
            path: PathBuf::from("model.json"),
            reason: "missing `model` member".to_string(),
        };

        assert!(not_found.is_fatal());
        assert!(corrupt.is_fatal());
        assert!(!PredictorError::MissingFeature("humidity".to_string()).is_fatal());
        assert!(!PredictorError::Inference(anyhow::anyhow!("shape mismatch")).is_fatal());
    }

    #[test]
    fn test_messages_name_the_feature() {
        let err = PredictorError::MissingFeature("sky-cover".to_string());
        assert_eq!(err.to_string(), "missing feature: sky-cover");

        let err = PredictorError::NonFiniteFeature {
            key: "humidity".to_string(),
            value: f64::NAN,
        };
        assert!(err.to_string().contains("humidity"));
    }

    #[test]
    fn test_inference_error_keeps_source() {
        use std::error::Error as _;

        let err = PredictorError::Inference(anyhow::anyhow!("expected 9 columns, got 8"));
        assert!(err.to_string().contains("expected 9 columns, got 8"));
        assert!(err.source().is_some());
    }
}
