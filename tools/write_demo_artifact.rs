//! Demo Artifact Writer
//!
//! Writes a small standard-scaler + linear-model artifact over the solar
//! feature schema, so the predictor can be run without a training pipeline.
//! The parameters are illustrative, not fitted on real measurements.

use anyhow::Context;
use solar_power_predictor::models::{ArtifactFile, RegressorKind, ScalerKind};
use solar_power_predictor::FeatureSchema;
use std::path::PathBuf;
use tracing::info;

/// Column means and standard deviations, in schema order
const MEAN: [f64; 9] = [0.50, 58.47, 24.95, 10.10, 1.99, 9.56, 73.51, 10.13, 30.02];
const SCALE: [f64; 9] = [0.30, 6.84, 6.92, 4.84, 1.41, 1.38, 15.08, 7.26, 0.14];

/// kW per standard deviation of each feature
const COEFFICIENTS: [f64; 9] = [
    -9800.0, 900.0, 150.0, 300.0, -1200.0, 400.0, -2100.0, 100.0, 200.0,
];
const INTERCEPT: f64 = 6980.0;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("write_demo_artifact=info".parse()?),
        )
        .init();

    let (path, force) = parse_args(std::env::args().skip(1))?;

    if path.exists() && !force {
        anyhow::bail!("{} already exists; pass --force to overwrite it", path.display());
    }

    let schema = FeatureSchema::solar();
    let artifact = ArtifactFile {
        feature_names: Some(schema.keys_in_order().iter().map(|k| k.to_string()).collect()),
        scaler: ScalerKind::Standard {
            mean: MEAN.to_vec(),
            scale: SCALE.to_vec(),
        },
        model: RegressorKind::Linear {
            coefficients: COEFFICIENTS.to_vec(),
            intercept: INTERCEPT,
        },
    };
    artifact
        .validate()
        .map_err(|reason| anyhow::anyhow!("demo artifact is invalid: {}", reason))?;

    let json = serde_json::to_string_pretty(&artifact)?;
    std::fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;

    info!(
        path = %path.display(),
        features = schema.len(),
        "Demo artifact written"
    );

    Ok(())
}

/// `[path] [--force]` in any order; the path defaults to `model.json`
fn parse_args(args: impl IntoIterator<Item = String>) -> anyhow::Result<(PathBuf, bool)> {
    let mut path = None;
    let mut force = false;

    for arg in args {
        if arg == "--force" {
            force = true;
        } else if arg.starts_with('-') {
            anyhow::bail!("unknown option {}; usage: write-demo-artifact [path] [--force]", arg);
        } else if path.replace(PathBuf::from(&arg)).is_some() {
            anyhow::bail!("unexpected argument {}; only one path may be given", arg);
        }
    }

    Ok((path.unwrap_or_else(|| PathBuf::from("model.json")), force))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args_defaults() {
        let (path, force) = parse_args(args(&[])).unwrap();
        assert_eq!(path, PathBuf::from("model.json"));
        assert!(!force);
    }

    #[test]
    fn test_force_is_recognised_in_any_position() {
        let (path, force) = parse_args(args(&["--force"])).unwrap();
        assert_eq!(path, PathBuf::from("model.json"));
        assert!(force);

        let (path, force) = parse_args(args(&["--force", "out.json"])).unwrap();
        assert_eq!(path, PathBuf::from("out.json"));
        assert!(force);

        let (path, force) = parse_args(args(&["out.json", "--force"])).unwrap();
        assert_eq!(path, PathBuf::from("out.json"));
        assert!(force);
    }

    #[test]
    fn test_unknown_options_and_extra_paths_are_rejected() {
        assert!(parse_args(args(&["-f"])).is_err());
        assert!(parse_args(args(&["a.json", "b.json"])).is_err());
    }
}
