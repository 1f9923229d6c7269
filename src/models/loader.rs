//! Model artifact loader

use crate::error::{PredictorError, Result};
use crate::models::artifact::{ModelArtifact, Regressor, Scaler};
use crate::models::regressor::RegressorKind;
use crate::models::scaler::ScalerKind;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// On-disk layout of a model artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactFile {
    /// Column names the scaler and model were fitted on, in order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    pub scaler: ScalerKind,
    pub model: RegressorKind,
}

impl ArtifactFile {
    /// Check parameters and that scaler, model and feature names agree on width
    pub fn validate(&self) -> std::result::Result<(), String> {
        self.scaler.validate().map_err(|e| format!("scaler: {}", e))?;
        self.model.validate().map_err(|e| format!("model: {}", e))?;

        let declared = match &self.feature_names {
            Some(names) => {
                if names.is_empty() {
                    return Err("feature_names is empty".to_string());
                }
                let mut seen = HashSet::new();
                if let Some(dup) = names.iter().find(|name| !seen.insert(name.as_str())) {
                    return Err(format!("feature_names lists {:?} twice", dup));
                }
                Some(names.len())
            }
            None => None,
        };

        let scaler_width = self.scaler.width();
        if let (Some(names), Some(scaler)) = (declared, scaler_width) {
            if names != scaler {
                return Err(format!(
                    "{} feature names but the scaler was fitted on {} columns",
                    names, scaler
                ));
            }
        }

        if let Some(columns) = declared.or(scaler_width) {
            match &self.model {
                RegressorKind::Linear { coefficients, .. } if coefficients.len() != columns => {
                    return Err(format!(
                        "linear model has {} coefficients for {} columns",
                        coefficients.len(),
                        columns
                    ));
                }
                model if model.width() > columns => {
                    return Err(format!(
                        "model splits on feature {} but only {} columns exist",
                        model.width() - 1,
                        columns
                    ));
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Turn the parsed file into a ready-to-use artifact
    pub fn into_artifact(self) -> ModelArtifact {
        let artifact = ModelArtifact::new(self.scaler, self.model);
        match self.feature_names {
            Some(names) => artifact.with_feature_names(names),
            None => artifact,
        }
    }
}

/// Loader for `{scaler, model}` artifacts stored as JSON
#[derive(Debug, Default, Clone, Copy)]
pub struct ArtifactLoader;

impl ArtifactLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load and validate the artifact at `path`.
    ///
    /// A missing path is reported as [`PredictorError::ArtifactNotFound`]
    /// before any read is attempted.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<ModelArtifact> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(PredictorError::ArtifactNotFound {
                path: path.to_path_buf(),
            });
        }

        info!(path = %path.display(), "Loading model artifact");

        let contents =
            fs::read_to_string(path).map_err(|source| PredictorError::ArtifactUnreadable {
                path: path.to_path_buf(),
                source,
            })?;

        let file = self.parse(path, &contents)?;

        let artifact = file.into_artifact();
        info!(
            path = %path.display(),
            scaler = artifact.scaler().kind(),
            model = artifact.model().kind(),
            features = ?artifact.feature_names().map(|names| names.len()),
            "Model and scaler loaded"
        );

        Ok(artifact)
    }

    /// Parse and validate artifact JSON; `path` is only used in error messages.
    pub fn parse(&self, path: &Path, contents: &str) -> Result<ArtifactFile> {
        let corrupt = |reason: String| PredictorError::ArtifactCorrupt {
            path: PathBuf::from(path),
            reason,
        };

        let value: serde_json::Value = serde_json::from_str(contents)
            .map_err(|e| corrupt(format!("not valid JSON: {}", e)))?;

        let members = value
            .as_object()
            .ok_or_else(|| corrupt("top level is not an object".to_string()))?;
        for member in ["scaler", "model"] {
            if !members.contains_key(member) {
                return Err(corrupt(format!("missing `{}` member", member)));
            }
        }

        let file: ArtifactFile =
            serde_json::from_value(value).map_err(|e| corrupt(e.to_string()))?;
        file.validate().map_err(corrupt)?;

        debug!(
            scaler = file.scaler.kind(),
            model = file.model.kind(),
            "Artifact parsed"
        );

        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn write_artifact(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write artifact");
        file
    }

    fn valid_artifact() -> serde_json::Value {
        json!({
            "feature_names": ["a", "b"],
            "scaler": { "kind": "standard", "mean": [1.0, 2.0], "scale": [1.0, 2.0] },
            "model": { "kind": "linear", "coefficients": [1.0, 1.0], "intercept": 0.5 }
        })
    }

    #[test]
    fn test_load_valid_artifact() {
        let file = write_artifact(&valid_artifact().to_string());
        let artifact = ArtifactLoader::new().load(file.path()).unwrap();

        assert_eq!(artifact.scaler().kind(), "standard");
        assert_eq!(artifact.model().kind(), "linear");
        assert_eq!(
            artifact.feature_names(),
            Some(&["a".to_string(), "b".to_string()][..])
        );

        let scaled = artifact.scaler().transform(&[vec![2.0, 6.0]]).unwrap();
        assert_eq!(artifact.model().predict(&scaled).unwrap(), vec![3.5]);
    }

    #[test]
    fn test_missing_path_is_not_found() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("model.json");

        match ArtifactLoader::new().load(&path) {
            Err(PredictorError::ArtifactNotFound { path: reported }) => assert_eq!(reported, path),
            other => panic!("expected ArtifactNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_directory_is_unreadable() {
        let dir = tempfile::tempdir().expect("temp dir");
        assert!(matches!(
            ArtifactLoader::new().load(dir.path()),
            Err(PredictorError::ArtifactUnreadable { .. })
        ));
    }

    #[test]
    fn test_missing_members_are_corrupt() {
        for member in ["model", "scaler"] {
            let mut value = valid_artifact();
            value.as_object_mut().unwrap().remove(member);
            let file = write_artifact(&value.to_string());

            match ArtifactLoader::new().load(file.path()) {
                Err(PredictorError::ArtifactCorrupt { reason, .. }) => {
                    assert!(reason.contains(member), "reason: {}", reason)
                }
                other => panic!("expected ArtifactCorrupt, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_garbage_is_corrupt() {
        for contents in ["\u{80}\u{4}\u{95}pickle", "[1, 2, 3]", ""] {
            let file = write_artifact(contents);
            assert!(matches!(
                ArtifactLoader::new().load(file.path()),
                Err(PredictorError::ArtifactCorrupt { .. })
            ));
        }
    }

    #[test]
    fn test_unknown_kind_is_corrupt() {
        let mut value = valid_artifact();
        value["model"] = json!({ "kind": "neural_net", "layers": [] });
        let file = write_artifact(&value.to_string());

        assert!(matches!(
            ArtifactLoader::new().load(file.path()),
            Err(PredictorError::ArtifactCorrupt { .. })
        ));
    }

    #[test]
    fn test_width_disagreement_is_corrupt() {
        let path = Path::new("model.json");
        let loader = ArtifactLoader::new();

        let mut value = valid_artifact();
        value["model"]["coefficients"] = json!([1.0, 1.0, 1.0]);
        let err = loader.parse(path, &value.to_string()).unwrap_err();
        assert!(err.to_string().contains("3 coefficients for 2 columns"));

        let mut value = valid_artifact();
        value["feature_names"] = json!(["a", "b", "c"]);
        assert!(loader.parse(path, &value.to_string()).is_err());

        let mut value = valid_artifact();
        value["feature_names"] = json!(["a", "a"]);
        let err = loader.parse(path, &value.to_string()).unwrap_err();
        assert!(err.to_string().contains("twice"));
    }

    #[test]
    fn test_feature_names_are_optional() {
        let value = json!({
            "scaler": { "kind": "identity" },
            "model": { "kind": "linear", "coefficients": [2.0], "intercept": 0.0 }
        });
        let file = ArtifactLoader::new()
            .parse(Path::new("model.json"), &value.to_string())
            .unwrap();

        assert!(file.feature_names.is_none());
        assert!(file.into_artifact().feature_names().is_none());
    }
}
