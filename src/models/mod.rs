//! Model artifact: capability traits, serialized adapters, loading and inference

pub mod aggregator;
pub mod artifact;
pub mod inference;
pub mod loader;
pub mod regressor;
pub mod scaler;

pub use aggregator::Aggregation;
pub use artifact::{ModelArtifact, Regressor, Scaler};
pub use inference::{predict, predict_with_policy, InferenceEngine, InputPolicy};
pub use loader::{ArtifactFile, ArtifactLoader};
pub use regressor::{RegressionTree, RegressorKind};
pub use scaler::ScalerKind;
