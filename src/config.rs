//! Configuration management for the solar power predictor

use crate::models::inference::InputPolicy;
use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat, FileSourceFile};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Optional configuration file, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config/config.toml";

/// Prefix of environment overrides, e.g. `SOLAR__ARTIFACT__PATH`
pub const ENV_PREFIX: &str = "SOLAR";

/// How prediction results are printed
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Headline value followed by the inputs table
    #[default]
    Table,
    /// The prediction result as one JSON line
    Json,
}

/// Log line format
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub artifact: ArtifactConfig,
    #[serde(default)]
    pub form: FormConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Model artifact configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactConfig {
    /// JSON file holding the fitted scaler and model
    #[serde(default = "default_artifact_path")]
    pub path: PathBuf,
    /// Reject input keys the feature schema does not define
    #[serde(default)]
    pub strict_inputs: bool,
}

fn default_artifact_path() -> PathBuf {
    PathBuf::from("model.json")
}

impl ArtifactConfig {
    pub fn input_policy(&self) -> InputPolicy {
        if self.strict_inputs {
            InputPolicy::RejectUnknown
        } else {
            InputPolicy::IgnoreUnknown
        }
    }
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            path: default_artifact_path(),
            strict_inputs: false,
        }
    }
}

/// Form rendering configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct FormConfig {
    #[serde(default)]
    pub output: OutputFormat,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (json, pretty)
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the optional config file and the environment
    pub fn load() -> Result<Self> {
        let file = File::with_name(DEFAULT_CONFIG_FILE).required(false);
        Self::build(Some(file), env_source())
    }

    /// Load configuration from a specific path, which must exist
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::build(Some(File::from(path.as_ref())), env_source())
    }

    fn build(
        file: Option<File<FileSourceFile, FileFormat>>,
        env: Environment,
    ) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(file) = file {
            builder = builder.add_source(file);
        }

        let config = builder
            .add_source(env)
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
