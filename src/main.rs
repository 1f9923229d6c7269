//! Solar Power Predictor - Main Entry Point
//!
//! Loads the fitted scaler and model once, then serves the prediction form
//! on the terminal until the user quits.

use anyhow::Result;
use solar_power_predictor::{
    config::{AppConfig, LogFormat, LoggingConfig},
    console::Console,
    error::PredictorError,
    models::inference::InferenceEngine,
};
use std::io;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            if let Some(err) = e.downcast_ref::<PredictorError>() {
                eprintln!("hint: {}", err.hint());
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    // Logging settings live in the configuration, so it is loaded first
    let config = AppConfig::load()?;
    init_tracing(&config.logging)?;

    info!("Starting Solar Power Predictor");
    info!(
        artifact = %config.artifact.path.display(),
        strict_inputs = config.artifact.strict_inputs,
        output = ?config.form.output,
        "Configuration loaded"
    );

    // Without a valid artifact no prediction is possible; stop here
    let engine = InferenceEngine::from_config(&config).map_err(|e| {
        error!(error = %e, fatal = e.is_fatal(), "Failed to initialize inference engine");
        e
    })?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut console = Console::new(engine, config.form.output, stdin.lock(), stdout.lock());
    console.run()?;

    info!("Solar Power Predictor shutting down");
    Ok(())
}

/// Structured logs go to stderr so they never interleave with the form.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("warn")
            .add_directive(format!("solar_power_predictor={}", logging.level).parse()?),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);

    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }

    Ok(())
}
