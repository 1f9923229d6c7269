//! Ordered catalog of the model's input features.
//!
//! The declaration order here is the column order the scaler and model were
//! fitted on. Vectors handed to the artifact are assembled by walking this
//! sequence, never by iterating an input map.

use crate::error::{PredictorError, Result};
use crate::types::inputs::InputValues;
use std::collections::HashSet;

/// One numeric input to the model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureSpec {
    /// Name the model and scaler were fitted with
    pub key: &'static str,
    /// Value shown before any user interaction
    pub default: f64,
    /// Increment/decrement granularity in the form
    pub step: f64,
    /// Label shown to the user; no effect on inference
    pub display_label: &'static str,
}

impl FeatureSpec {
    pub const fn new(
        key: &'static str,
        default: f64,
        step: f64,
        display_label: &'static str,
    ) -> Self {
        Self {
            key,
            default,
            step,
            display_label,
        }
    }
}

/// Weather features of the solar generation model, in training column order.
pub const SOLAR_FEATURES: [FeatureSpec; 9] = [
    FeatureSpec::new("distance-to-solar-noon", 0.50, 0.01, "Distance to Solar Noon [0-1]"),
    FeatureSpec::new("temperature", 70.0, 1.0, "Temperature (°F)"),
    FeatureSpec::new("wind-direction", 90.0, 1.0, "Wind Direction (deg)"),
    FeatureSpec::new("wind-speed", 5.00, 0.1, "Wind Speed (mph)"),
    FeatureSpec::new("sky-cover", 2.0, 1.0, "Sky Cover [0-10]"),
    FeatureSpec::new("visibility", 10.00, 0.01, "Visibility (miles)"),
    FeatureSpec::new("humidity", 50.0, 1.0, "Humidity (%)"),
    FeatureSpec::new("average-wind-speed-(period)", 5.00, 0.01, "Average Wind Speed (period)"),
    FeatureSpec::new("average-pressure-(period)", 29.80, 0.01, "Average Pressure (period)"),
];

/// Ordered sequence of feature specs, unique by key.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSchema {
    features: Vec<FeatureSpec>,
}

impl FeatureSchema {
    /// Build a schema, rejecting empty lists and duplicate keys.
    pub fn new(features: Vec<FeatureSpec>) -> Result<Self> {
        if features.is_empty() {
            return Err(PredictorError::EmptySchema);
        }

        let mut seen = HashSet::with_capacity(features.len());
        for spec in &features {
            if !seen.insert(spec.key) {
                return Err(PredictorError::DuplicateFeature(spec.key.to_string()));
            }
        }

        Ok(Self { features })
    }

    /// The nine-feature schema of the solar generation model
    pub fn solar() -> Self {
        Self {
            features: SOLAR_FEATURES.to_vec(),
        }
    }

    /// Feature keys in declaration order
    pub fn keys_in_order(&self) -> Vec<&'static str> {
        self.features.iter().map(|spec| spec.key).collect()
    }

    /// Spec for a feature key
    pub fn spec_for(&self, key: &str) -> Result<&FeatureSpec> {
        self.features
            .iter()
            .find(|spec| spec.key == key)
            .ok_or_else(|| PredictorError::UnknownFeature(key.to_string()))
    }

    /// Position of a feature key in the assembled vector
    pub fn position(&self, key: &str) -> Option<usize> {
        self.features.iter().position(|spec| spec.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureSpec> {
        self.features.iter()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Every feature mapped to its default value
    pub fn defaults(&self) -> InputValues {
        self.features
            .iter()
            .map(|spec| (spec.key, spec.default))
            .collect()
    }

    /// Assemble the model input vector in schema order.
    ///
    /// Fails on the first missing key (in schema order) or non-finite value.
    /// Keys in `inputs` that the schema does not define are not looked at.
    pub fn assemble(&self, inputs: &InputValues) -> Result<Vec<f64>> {
        let mut vector = Vec::with_capacity(self.features.len());

        for spec in &self.features {
            let value = inputs
                .get(spec.key)
                .ok_or_else(|| PredictorError::MissingFeature(spec.key.to_string()))?;

            if !value.is_finite() {
                return Err(PredictorError::NonFiniteFeature {
                    key: spec.key.to_string(),
                    value,
                });
            }

            vector.push(value);
        }

        Ok(vector)
    }

    /// Input keys the schema does not define, sorted
    pub fn unknown_keys(&self, inputs: &InputValues) -> Vec<String> {
        let mut unknown: Vec<String> = inputs
            .keys()
            .filter(|key| self.position(key).is_none())
            .map(str::to_string)
            .collect();
        unknown.sort();
        unknown
    }
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::solar()
    }
}
