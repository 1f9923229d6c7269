//! Type definitions shared by the form and the inference contract

pub mod inputs;
pub mod prediction;

pub use inputs::InputValues;
pub use prediction::PredictionResult;
