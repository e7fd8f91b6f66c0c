//! Recorded input scripts and their frame-by-frame replay.
//!
//! A script is the host-side record of a drawing session: one entry per
//! frame with the cursor position and the input events seen that frame.

use std::path::Path;

use scribble_core::{Classifier, ClassifyError, Frame, Prediction, Sketchpad};
use serde::{Deserialize, Serialize};

/// A recorded drawing session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Script {
    pub frames: Vec<Frame>,
}

/// Errors that can occur while loading a script.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("failed to read script: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse script: {0}")]
    Parse(#[from] serde_json::Error),
}

impl Script {
    pub fn from_json_str(json: &str) -> Result<Self, ScriptError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

/// A prediction produced while replaying, tagged with its frame index.
#[derive(Debug, Clone, Serialize)]
pub struct FramePrediction {
    pub frame: usize,
    #[serde(flatten)]
    pub prediction: Prediction,
}

/// What happened during a replay.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplaySummary {
    pub frames: usize,
    pub strokes: usize,
    pub predictions: Vec<FramePrediction>,
    /// Classification of the final canvas, when a model is loaded.
    pub final_prediction: Option<Prediction>,
}

/// Drive `pad` through every frame of `script`.
///
/// Per-frame classification is switched off up front when no model is
/// loaded, so drawing still replays in full.
pub fn replay(
    script: &Script,
    pad: &mut Sketchpad,
    classifier: &mut Classifier,
) -> Result<ReplaySummary, ClassifyError> {
    if pad.config().classify_every_frame && !classifier.is_ready() {
        tracing::warn!("no model loaded; per-frame classification disabled");
        pad.set_classify_every_frame(false);
    }

    let mut summary = ReplaySummary::default();
    for (index, frame) in script.frames.iter().enumerate() {
        let report = pad.tick(frame, classifier)?;
        summary.frames += 1;
        summary.strokes += report.strokes_drawn;
        if let Some(prediction) = report.prediction {
            tracing::info!(
                frame = index,
                digit = prediction.digit,
                confidence = prediction.confidence(),
                "frame classified"
            );
            summary.predictions.push(FramePrediction { frame: index, prediction });
        }
    }

    if classifier.is_ready() {
        summary.final_prediction = Some(pad.classify(classifier)?);
    }

    tracing::info!(frames = summary.frames, strokes = summary.strokes, "replay finished");
    Ok(summary)
}
