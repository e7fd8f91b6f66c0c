//! Scribble Core — domain layer for the digit drawing pad.
//!
//! This crate contains the rasterizer, the pointer stroke state machine,
//! the per-frame sketchpad driver, and the downsample-and-classify pipeline.
//! No windowing or inference-runtime dependencies; the model sits behind
//! [`classify::InferenceBackend`].

pub mod canvas;
pub mod classify;
pub mod color;
pub mod config;
pub mod image;
pub mod sketchpad;
pub mod stroke;

// Re-exports for convenience.
pub use canvas::{CanvasError, PixelBuffer};
pub use classify::{Classifier, ClassifyError, InferenceBackend, InputTensor, Prediction};
pub use color::Rgba;
pub use config::{CanvasConfig, ConfigError};
pub use sketchpad::{Frame, FrameReport, InputEvent, Sketchpad};
pub use stroke::{PointerButton, Stroke, StrokeSession};
