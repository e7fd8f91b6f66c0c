//! Drawing surface — pixel storage, brush rasterization, and downsampling.

pub mod buffer;
pub mod raster;

pub use buffer::PixelBuffer;
pub use raster::{draw_line, line_points, stamp_disk, LinePoints};

/// Errors that can occur when creating or resampling a pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CanvasError {
    #[error("pixel buffer dimensions must be non-zero, got {width}x{height}")]
    EmptyDimensions { width: u32, height: u32 },

    #[error(
        "cannot downsample {src_width}x{src_height} to {target_width}x{target_height}: \
         target must be non-zero and no larger than the source"
    )]
    InvalidDownsample {
        src_width: u32,
        src_height: u32,
        target_width: u32,
        target_height: u32,
    },

    #[error("pixel data length {actual} does not match {width}x{height}")]
    LengthMismatch { width: u32, height: u32, actual: usize },
}
