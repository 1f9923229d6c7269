//! Solar Power Predictor Library
//!
//! Collects nine weather parameters, scales them with a pre-fitted scaler and
//! runs a pre-trained regression model to predict solar power generated (kW).
//! The feature schema's declaration order is the column order the artifact
//! was fitted on.

pub mod config;
pub mod console;
pub mod error;
pub mod feature_schema;
pub mod form;
pub mod models;
pub mod types;

pub use config::AppConfig;
pub use console::Console;
pub use error::{PredictorError, Result};
pub use feature_schema::{FeatureSchema, FeatureSpec};
pub use form::FormState;
pub use models::inference::{predict, InferenceEngine};
pub use models::loader::ArtifactLoader;
pub use models::{ModelArtifact, Regressor, Scaler};
pub use types::{inputs::InputValues, prediction::PredictionResult};
