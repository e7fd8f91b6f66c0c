//! Drawing surface and classifier configuration.
//!
//! `CanvasConfig` is the single source of truth for brush, colors, surface
//! size, and model input shape. Loaded from JSON; every field has a default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::canvas::CanvasError;
use crate::color::Rgba;

/// Default brush radius in surface pixels.
pub const DEFAULT_BRUSH_RADIUS: u32 = 7;
/// Default drawing surface edge length in pixels.
pub const DEFAULT_SURFACE_SIZE: u32 = 280;
/// Model input edge length (MNIST-style digits).
pub const DEFAULT_MODEL_INPUT: u32 = 28;
/// Number of digit classes.
pub const DEFAULT_NUM_CLASSES: usize = 10;

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("brush radius {radius} must be between 1 and {max}")]
    InvalidBrushRadius { radius: u32, max: u32 },

    #[error("model input {width}x{height} does not fit surface {surface_width}x{surface_height}")]
    InvalidModelInput {
        width: u32,
        height: u32,
        surface_width: u32,
        surface_height: u32,
    },

    #[error("number of classes must be positive")]
    NoClasses,

    #[error("invalid surface: {0}")]
    Canvas(#[from] CanvasError),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration for the sketchpad and classifier pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Drawing surface width in pixels.
    pub width: u32,
    /// Drawing surface height in pixels.
    pub height: u32,
    /// Brush stamp radius, at most the longer surface edge. Default: 7.
    pub brush_radius: u32,
    /// Color used by the paint button. Default: white.
    pub paint_color: Rgba,
    /// Background color, also used by the erase button. Default: black.
    pub background_color: Rgba,
    /// Run the classifier at the end of every frame.
    pub classify_every_frame: bool,
    /// Model input width. Default: 28.
    pub model_input_width: u32,
    /// Model input height. Default: 28.
    pub model_input_height: u32,
    /// Length of the model's output vector. Default: 10.
    pub num_classes: usize,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_SURFACE_SIZE,
            height: DEFAULT_SURFACE_SIZE,
            brush_radius: DEFAULT_BRUSH_RADIUS,
            paint_color: Rgba::WHITE,
            background_color: Rgba::BLACK,
            classify_every_frame: false,
            model_input_width: DEFAULT_MODEL_INPUT,
            model_input_height: DEFAULT_MODEL_INPUT,
            num_classes: DEFAULT_NUM_CLASSES,
        }
    }
}

impl CanvasConfig {
    /// Parse from a JSON string and validate.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file and validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check that the surface can be created and downsampled to the model input.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(CanvasError::EmptyDimensions {
                width: self.width,
                height: self.height,
            }
            .into());
        }
        let max_radius = self.width.max(self.height);
        if self.brush_radius == 0 || self.brush_radius > max_radius {
            return Err(ConfigError::InvalidBrushRadius {
                radius: self.brush_radius,
                max: max_radius,
            });
        }
        if self.num_classes == 0 {
            return Err(ConfigError::NoClasses);
        }

        let (mw, mh) = (self.model_input_width, self.model_input_height);
        let fits = mw > 0
            && mh > 0
            && mw <= self.width
            && mh <= self.height
            && (mw, mh) != (self.width, self.height);
        if !fits {
            return Err(ConfigError::InvalidModelInput {
                width: mw,
                height: mh,
                surface_width: self.width,
                surface_height: self.height,
            });
        }
        Ok(())
    }
}
