//! Widget state of the input form.
//!
//! One numeric value per schema feature, seeded with the feature's default
//! and stepped by its granularity. Values are collected by schema key, never
//! by display label.

use crate::error::{PredictorError, Result};
use crate::feature_schema::{FeatureSchema, FeatureSpec};
use crate::types::inputs::InputValues;
use std::sync::Arc;

/// Current values of the form's numeric inputs, in schema order
#[derive(Debug, Clone)]
pub struct FormState {
    schema: Arc<FeatureSchema>,
    values: Vec<f64>,
}

impl FormState {
    /// A form with every widget at its default
    pub fn new(schema: Arc<FeatureSchema>) -> Self {
        let values = schema.iter().map(|spec| spec.default).collect();
        Self { schema, values }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    fn index_of(&self, key: &str) -> Result<usize> {
        self.schema
            .position(key)
            .ok_or_else(|| PredictorError::UnknownFeature(key.to_string()))
    }

    /// Current value of a widget
    pub fn value(&self, key: &str) -> Result<f64> {
        Ok(self.values[self.index_of(key)?])
    }

    /// Set a widget value
    pub fn set(&mut self, key: &str, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(PredictorError::NonFiniteFeature {
                key: key.to_string(),
                value,
            });
        }
        let index = self.index_of(key)?;
        self.values[index] = value;
        Ok(())
    }

    /// Parse user text into a widget value; non-numeric text is rejected
    pub fn set_from_str(&mut self, key: &str, text: &str) -> Result<()> {
        let index = self.index_of(key)?;
        let value = text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| PredictorError::InvalidNumber {
                key: key.to_string(),
                text: text.to_string(),
            })?;
        self.values[index] = value;
        Ok(())
    }

    /// Raise a widget by its step, returning the new value
    pub fn increment(&mut self, key: &str) -> Result<f64> {
        self.step_by(key, 1.0)
    }

    /// Lower a widget by its step, returning the new value
    pub fn decrement(&mut self, key: &str) -> Result<f64> {
        self.step_by(key, -1.0)
    }

    fn step_by(&mut self, key: &str, direction: f64) -> Result<f64> {
        let index = self.index_of(key)?;
        let step = self.schema.spec_for(key)?.step;
        let stepped = step_value(self.values[index], step, direction);
        self.values[index] = stepped;
        Ok(stepped)
    }

    /// Restore every widget to its default
    pub fn reset(&mut self) {
        for (value, spec) in self.values.iter_mut().zip(self.schema.iter()) {
            *value = spec.default;
        }
    }

    /// Widgets in schema order with their current values
    pub fn entries(&self) -> impl Iterator<Item = (&FeatureSpec, f64)> {
        self.schema.iter().zip(self.values.iter().copied())
    }

    /// Current values keyed by schema key
    pub fn collect(&self) -> InputValues {
        self.entries().map(|(spec, value)| (spec.key, value)).collect()
    }
}

/// Move `current` by one `step` in `direction`, trimming float noise,
/// e.g. `0.5 + 0.01` to `0.51`.
///
/// Keeps as many decimals as the step or the current value has (at most 10),
/// so off-grid values move by exactly one step.
fn step_value(current: f64, step: f64, direction: f64) -> f64 {
    let decimals = decimal_places(step).max(decimal_places(current));
    let factor = 10f64.powi(decimals);
    ((current + direction * step) * factor).round() / factor
}

fn decimal_places(value: f64) -> i32 {
    let mut decimals = 0;
    let mut scaled = value.abs();
    while decimals < 10 && (scaled - scaled.round()).abs() > 1e-9 {
        scaled *= 10.0;
        decimals += 1;
    }
    decimals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> FormState {
        FormState::new(Arc::new(FeatureSchema::solar()))
    }

    #[test]
    fn test_new_form_holds_defaults() {
        let form = form();
        assert_eq!(form.collect(), FeatureSchema::solar().defaults());
        assert_eq!(form.value("temperature").unwrap(), 70.0);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut form = form();
        form.set("temperature", 95.0).unwrap();
        form.set_from_str("humidity", "12.5").unwrap();
        form.increment("distance-to-solar-noon").unwrap();
        form.decrement("average-pressure-(period)").unwrap();

        form.reset();

        for (spec, value) in form.entries() {
            assert_eq!(value, spec.default, "{} not reset", spec.key);
        }
    }

    #[test]
    fn test_step_uses_feature_granularity() {
        let mut form = form();

        assert_eq!(form.increment("distance-to-solar-noon").unwrap(), 0.51);
        assert_eq!(form.increment("wind-speed").unwrap(), 5.1);
        assert_eq!(form.decrement("sky-cover").unwrap(), 1.0);
        assert_eq!(form.decrement("average-pressure-(period)").unwrap(), 29.79);
    }

    #[test]
    fn test_repeated_steps_stay_clean() {
        let mut form = form();
        for _ in 0..30 {
            form.increment("wind-speed").unwrap();
        }
        assert_eq!(form.value("wind-speed").unwrap(), 8.0);
    }

    #[test]
    fn test_set_from_str_rejects_non_numeric() {
        let mut form = form();

        for text in ["warm", "", "NaN", "inf"] {
            assert!(matches!(
                form.set_from_str("temperature", text),
                Err(PredictorError::InvalidNumber { .. })
            ));
        }
        assert_eq!(form.value("temperature").unwrap(), 70.0);

        form.set_from_str("temperature", " 81.5 ").unwrap();
        assert_eq!(form.value("temperature").unwrap(), 81.5);
    }

    #[test]
    fn test_unknown_key() {
        let mut form = form();
        assert!(matches!(
            form.set("Temperature (°F)", 1.0),
            Err(PredictorError::UnknownFeature(_))
        ));
        assert!(form.increment("irradiance").is_err());
        assert!(form.value("irradiance").is_err());
    }

    #[test]
    fn test_collect_uses_schema_keys() {
        let mut form = form();
        form.set("visibility", 3.25).unwrap();

        let inputs = form.collect();
        assert_eq!(inputs.len(), 9);
        assert_eq!(inputs.get("visibility"), Some(3.25));
        assert_eq!(inputs.get("Visibility (miles)"), None);
    }

    #[test]
    fn test_off_grid_values_move_by_one_step() {
        let mut form = form();

        form.set("temperature", 81.5).unwrap();
        assert_eq!(form.increment("temperature").unwrap(), 82.5);
        assert_eq!(form.decrement("temperature").unwrap(), 81.5);

        form.set("wind-speed", 5.123).unwrap();
        assert_eq!(form.increment("wind-speed").unwrap(), 5.223);
        assert_eq!(form.decrement("wind-speed").unwrap(), 5.123);
    }

    #[test]
    fn test_step_value() {
        assert_eq!(step_value(0.2, 0.1, 1.0), 0.3);
        assert_eq!(step_value(70.0, 1.0, 1.0), 71.0);
        assert_eq!(step_value(29.8, 0.01, -1.0), 29.79);
        assert_eq!(step_value(81.5, 1.0, 1.0), 82.5);
        assert_eq!(decimal_places(5.123), 3);
        assert_eq!(decimal_places(70.0), 0);
    }
}
