//! Digit classification — downsample, tensorize, infer, normalize.
//!
//! The model itself is opaque: anything implementing [`InferenceBackend`]
//! can sit behind a [`Classifier`]. A classifier without a backend is not
//! ready and refuses to produce results.

pub mod softmax;
pub mod tensor;

use serde::{Deserialize, Serialize};

use crate::canvas::{CanvasError, PixelBuffer};

pub use softmax::{argmax, softmax};
pub use tensor::InputTensor;

/// Errors that can occur during classification.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error("classifier is not ready: no model loaded")]
    NotReady,

    #[error("inference backend error: {0}")]
    Backend(String),

    #[error("model produced an empty output vector")]
    EmptyOutput,

    #[error("model score at index {index} is not finite")]
    NonFiniteScore { index: usize },

    #[error("model produced {actual} scores, expected {expected}")]
    ClassCountMismatch { expected: usize, actual: usize },

    #[error("failed to prepare model input: {0}")]
    Canvas(#[from] CanvasError),
}

/// Capability interface for the external model runtime.
pub trait InferenceBackend {
    /// `(width, height)` of the single-channel image the model expects.
    fn input_size(&self) -> (u32, u32);

    /// Run the model once and return its raw class scores.
    fn infer(&mut self, input: &InputTensor) -> Result<Vec<f32>, ClassifyError>;
}

/// Result of one classification.
///
/// `digit` is always the arg-max of `probabilities`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Index of the most probable class.
    pub digit: usize,
    /// Softmax probabilities, rounded to four decimal places.
    pub probabilities: Vec<f32>,
}

impl Prediction {
    /// Build from a normalized probability vector.
    pub fn from_probabilities(probabilities: Vec<f32>) -> Result<Self, ClassifyError> {
        let digit = argmax(&probabilities).ok_or(ClassifyError::EmptyOutput)?;
        Ok(Self { digit, probabilities })
    }

    /// Probability of the predicted digit, `None` if `digit` is out of range.
    pub fn confidence(&self) -> Option<f32> {
        self.probabilities.get(self.digit).copied()
    }
}

/// Downsample-and-classify pipeline around an optional model backend.
pub struct Classifier {
    backend: Option<Box<dyn InferenceBackend>>,
    num_classes: usize,
}

impl Classifier {
    /// A classifier with a loaded model.
    pub fn new(backend: impl InferenceBackend + 'static, num_classes: usize) -> Self {
        Self {
            backend: Some(Box::new(backend)),
            num_classes,
        }
    }

    /// A classifier with no model yet. Every call fails with `NotReady`.
    pub fn unloaded(num_classes: usize) -> Self {
        Self {
            backend: None,
            num_classes,
        }
    }

    /// Install (or replace) the model backend.
    pub fn load(&mut self, backend: impl InferenceBackend + 'static) {
        self.backend = Some(Box::new(backend));
    }

    pub fn is_ready(&self) -> bool {
        self.backend.is_some()
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// `(width, height)` of the model input, if a model is loaded.
    pub fn input_size(&self) -> Option<(u32, u32)> {
        self.backend.as_ref().map(|b| b.input_size())
    }

    /// Downsample `buffer` to the model input size, run the model once, and
    /// return its raw scores.
    ///
    /// A buffer already at the model input size is used as-is.
    pub fn infer(&mut self, buffer: &PixelBuffer) -> Result<Vec<f32>, ClassifyError> {
        let backend = self.backend.as_mut().ok_or(ClassifyError::NotReady)?;

        let (w, h) = backend.input_size();
        let tensor = if (buffer.width(), buffer.height()) == (w, h) {
            InputTensor::from_buffer(buffer)
        } else {
            InputTensor::from_buffer(&buffer.downsample(w, h)?)
        };

        let scores = backend.infer(&tensor)?;
        if scores.len() != self.num_classes {
            return Err(ClassifyError::ClassCountMismatch {
                expected: self.num_classes,
                actual: scores.len(),
            });
        }
        Ok(scores)
    }

    /// Infer, normalize with softmax, and pick the arg-max digit.
    pub fn classify(&mut self, buffer: &PixelBuffer) -> Result<Prediction, ClassifyError> {
        let scores = self.infer(buffer)?;
        let prediction = Prediction::from_probabilities(softmax(&scores)?)?;
        tracing::debug!(
            digit = prediction.digit,
            confidence = prediction.confidence(),
            "classified drawing"
        );
        Ok(prediction)
    }
}

impl std::fmt::Debug for Classifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classifier")
            .field("ready", &self.is_ready())
            .field("num_classes", &self.num_classes)
            .finish()
    }
}
