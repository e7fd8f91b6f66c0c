//! ONNX Runtime backend for the digit classifier.

use std::path::Path;

use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use ort::value::{Tensor, ValueType};
use scribble_core::classify::{ClassifyError, InferenceBackend, InputTensor};

/// Fallback input size when the model leaves its spatial dims symbolic.
const DEFAULT_INPUT_SIZE: (u32, u32) = (28, 28);

/// A loaded ONNX model taking `[1, 1, H, W]` f32 and returning class scores.
pub struct OnnxBackend {
    session: Session,
    input_size: (u32, u32),
}

impl OnnxBackend {
    pub fn load(path: &Path) -> Result<Self, ort::Error> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(path)?;

        let input_size = session
            .inputs
            .first()
            .and_then(|input| match &input.input_type {
                ValueType::Tensor { dimensions, .. } => spatial_size(dimensions),
                _ => None,
            })
            .unwrap_or(DEFAULT_INPUT_SIZE);

        tracing::info!(
            path = %path.display(),
            width = input_size.0,
            height = input_size.1,
            "ONNX model loaded"
        );
        Ok(Self { session, input_size })
    }
}

/// Trailing `[H, W]` of an NCHW shape, when both are concrete.
fn spatial_size(dimensions: &[i64]) -> Option<(u32, u32)> {
    match dimensions {
        [.., h, w] if *h > 0 && *w > 0 => Some((*w as u32, *h as u32)),
        _ => None,
    }
}

fn backend_error(e: ort::Error) -> ClassifyError {
    ClassifyError::Backend(e.to_string())
}

impl InferenceBackend for OnnxBackend {
    fn input_size(&self) -> (u32, u32) {
        self.input_size
    }

    fn infer(&mut self, input: &InputTensor) -> Result<Vec<f32>, ClassifyError> {
        let tensor = Tensor::from_array((input.shape(), input.as_slice().to_vec()))
            .map_err(backend_error)?;
        let outputs = self
            .session
            .run(ort::inputs![tensor].map_err(backend_error)?)
            .map_err(backend_error)?;
        let (_, scores) = outputs[0]
            .try_extract_raw_tensor::<f32>()
            .map_err(backend_error)?;
        Ok(scores.to_vec())
    }
}
