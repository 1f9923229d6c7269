//! Prediction output shown to the user

use crate::feature_schema::FeatureSchema;
use crate::types::inputs::InputValues;
use serde::{Deserialize, Serialize};

/// Result of one inference call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Predicted solar power generated (kW)
    pub value: f64,
    /// Inputs the prediction was computed from
    pub inputs_used: InputValues,
}

impl PredictionResult {
    pub fn new(value: f64, inputs_used: InputValues) -> Self {
        Self { value, inputs_used }
    }

    /// Predicted value rendered for display, e.g. `1,234.57`
    pub fn formatted_value(&self) -> String {
        format_kw(self.value)
    }

    /// `(display label, value)` rows in schema order for the inputs table.
    ///
    /// Keys absent from `inputs_used` are skipped.
    pub fn rows<'a>(&self, schema: &'a FeatureSchema) -> Vec<(&'a str, f64)> {
        schema
            .iter()
            .filter_map(|spec| {
                self.inputs_used
                    .get(spec.key)
                    .map(|value| (spec.display_label, value))
            })
            .collect()
    }
}

/// Format a number with two decimals and comma thousands separators.
pub fn format_kw(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = format!("{:.2}", value.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    // -0.001 rounds to 0.00 and should not print a sign
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_kw() {
        assert_eq!(format_kw(0.0), "0.00");
        assert_eq!(format_kw(241.8), "241.80");
        assert_eq!(format_kw(1234.567), "1,234.57");
        assert_eq!(format_kw(30_303.0), "30,303.00");
        assert_eq!(format_kw(1_000_000.0), "1,000,000.00");
        assert_eq!(format_kw(-4521.5), "-4,521.50");
        assert_eq!(format_kw(-0.001), "0.00");
    }

    #[test]
    fn test_rows_follow_schema_order() {
        let schema = FeatureSchema::solar();
        let result = PredictionResult::new(12.5, schema.defaults());

        let rows = result.rows(&schema);
        assert_eq!(rows.len(), 9);
        assert_eq!(rows[0], ("Distance to Solar Noon [0-1]", 0.5));
        assert_eq!(rows[8], ("Average Pressure (period)", 29.8));
    }

    #[test]
    fn test_prediction_result_serialization() {
        let inputs = InputValues::new().with("temperature", 70.0);
        let result = PredictionResult::new(1520.25, inputs);

        let json = serde_json::to_string(&result).unwrap();
        let deserialized: PredictionResult = serde_json::from_str(&json).unwrap();

        assert_eq!(result, deserialized);
        assert!(json.contains("\"inputs_used\""));
    }
}
