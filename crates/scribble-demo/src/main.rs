//! Scribble Demo — headless digit drawing pad.
//!
//! Replays a recorded input script through the sketchpad, classifies the
//! drawing when a model is available, and prints a JSON summary.
//!
//! Usage: `scribble-demo <script.json>`; see [`config::AppConfig`] for the
//! environment variables.

mod config;
#[cfg(feature = "onnx")]
mod onnx;
mod script;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use scribble_core::{CanvasConfig, Classifier, ClassifyError, ConfigError, Sketchpad};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::script::{Script, ScriptError};

/// Errors that can end a demo run.
#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error("usage: scribble-demo <script.json>")]
    Usage,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error(transparent)]
    Classify(#[from] ClassifyError),
    #[error(transparent)]
    Snapshot(#[from] scribble_core::image::SnapshotError),
    #[error("failed to encode summary: {0}")]
    Summary(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "onnx")]
    #[error("failed to load model: {0}")]
    Model(#[from] ort::Error),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), DemoError> {
    let app = AppConfig::from_env();
    let script_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .ok_or(DemoError::Usage)?;

    let mut canvas_config = match &app.canvas_config {
        Some(path) => CanvasConfig::load(path)?,
        None => CanvasConfig::default(),
    };
    if app.classify_every_frame {
        canvas_config.classify_every_frame = true;
    }
    let num_classes = canvas_config.num_classes;

    let mut pad = match &app.seed_image {
        Some(path) => Sketchpad::with_canvas(canvas_config, scribble_core::image::load(path)?)?,
        None => Sketchpad::new(canvas_config)?,
    };
    let mut classifier = load_classifier(&app, num_classes)?;

    let script = Script::load(&script_path)?;
    let summary = script::replay(&script, &mut pad, &mut classifier)?;

    if let Some(dir) = &app.export_dir {
        export_snapshots(&pad, dir)?;
    }

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

#[cfg(feature = "onnx")]
fn load_classifier(app: &AppConfig, num_classes: usize) -> Result<Classifier, DemoError> {
    match &app.model_path {
        Some(path) => Ok(Classifier::new(onnx::OnnxBackend::load(path)?, num_classes)),
        None => {
            tracing::warn!("SCRIBBLE_MODEL not set; running without a classifier");
            Ok(Classifier::unloaded(num_classes))
        }
    }
}

#[cfg(not(feature = "onnx"))]
fn load_classifier(app: &AppConfig, num_classes: usize) -> Result<Classifier, DemoError> {
    if app.model_path.is_some() {
        tracing::warn!("built without the `onnx` feature; SCRIBBLE_MODEL ignored");
    }
    Ok(Classifier::unloaded(num_classes))
}

/// Write the full canvas, the model input, and the raw input tensor.
fn export_snapshots(pad: &Sketchpad, dir: &Path) -> Result<(), DemoError> {
    std::fs::create_dir_all(dir)?;
    scribble_core::image::save_png(pad.canvas(), &dir.join("canvas.png"))?;
    scribble_core::image::save_intensity_png(pad.model_input(), &dir.join("model_input.png"))?;

    let tensor = scribble_core::InputTensor::from_buffer(pad.model_input());
    std::fs::write(dir.join("model_input.f32"), tensor.as_bytes())?;

    tracing::info!(dir = %dir.display(), "snapshots exported");
    Ok(())
}
