//! Conversion from pixel buffers to the model's input tensor layout.

use crate::canvas::PixelBuffer;

/// Single-channel image tensor in NCHW layout (`[1, 1, height, width]`).
///
/// Values are pixel intensities in `[0, 1]`. Rows run top-down, so the
/// buffer's bottom-left origin is flipped on the way in.
#[derive(Debug, Clone, PartialEq)]
pub struct InputTensor {
    shape: [usize; 4],
    data: Vec<f32>,
}

impl InputTensor {
    /// Build from a (typically already downsampled) pixel buffer.
    pub fn from_buffer(buffer: &PixelBuffer) -> Self {
        let (w, h) = (buffer.width() as usize, buffer.height() as usize);
        let pixels = buffer.pixels();

        let mut data = Vec::with_capacity(w * h);
        for row in pixels.chunks_exact(w).rev() {
            data.extend(row.iter().map(|px| px.intensity()));
        }

        Self {
            shape: [1, 1, h, w],
            data,
        }
    }

    /// `[batch, channels, height, width]`.
    pub fn shape(&self) -> [usize; 4] {
        self.shape
    }

    pub fn width(&self) -> usize {
        self.shape[3]
    }

    pub fn height(&self) -> usize {
        self.shape[2]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Raw native-endian `f32` bytes, for dumping the exact model input.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    /// Intensity at image row `row` (0 = top) and column `col`.
    pub fn at(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.height() || col >= self.width() {
            return None;
        }
        Some(self.data[row * self.width() + col])
    }
}

#[cfg(test)]
mod tests {
    use glam::IVec2;

    use super::*;
    use crate::color::Rgba;

    #[test]
    fn test_shape_is_nchw() {
        let buf = PixelBuffer::new(5, 3, Rgba::BLACK).unwrap();
        let t = InputTensor::from_buffer(&buf);
        assert_eq!(t.shape(), [1, 1, 3, 5]);
        assert_eq!(t.as_slice().len(), 15);
        assert_eq!(t.as_bytes().len(), 60);
    }

    #[test]
    fn test_rows_are_flipped_top_down() {
        let mut buf = PixelBuffer::new(3, 3, Rgba::BLACK).unwrap();
        // Bottom-left of the buffer is the last tensor row.
        buf.set(IVec2::new(0, 0), Rgba::WHITE);
        buf.set(IVec2::new(2, 2), Rgba::rgb(0.5, 0.0, 0.0));
        let t = InputTensor::from_buffer(&buf);
        assert_eq!(t.at(2, 0), Some(1.0));
        assert_eq!(t.at(0, 2), Some(0.5));
        assert_eq!(t.at(0, 0), Some(0.0));
        assert_eq!(t.at(3, 0), None);
    }
}
