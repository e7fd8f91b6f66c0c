//! PNG snapshots of pixel buffers.
//!
//! Pixel buffers are stored bottom-up; image files are top-down, so rows are
//! flipped in both directions.

use std::path::Path;

use image::{GrayImage, Luma, Rgba as ImageRgba, RgbaImage};

use crate::canvas::{CanvasError, PixelBuffer};
use crate::color::Rgba;

/// Errors that can occur while reading or writing snapshots.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("invalid snapshot: {0}")]
    Canvas(#[from] CanvasError),
}

/// Convert to an 8-bit RGBA image (top row first).
pub fn to_rgba_image(buffer: &PixelBuffer) -> RgbaImage {
    let (w, h) = (buffer.width(), buffer.height());
    RgbaImage::from_fn(w, h, |x, y| {
        let px = buffer.pixels()[((h - 1 - y) * w + x) as usize];
        ImageRgba(px.to_rgba8())
    })
}

/// Convert to the 8-bit single-channel image the model sees.
pub fn to_intensity_image(buffer: &PixelBuffer) -> GrayImage {
    let (w, h) = (buffer.width(), buffer.height());
    GrayImage::from_fn(w, h, |x, y| {
        let px = buffer.pixels()[((h - 1 - y) * w + x) as usize];
        Luma([(px.intensity() * 255.0).round() as u8])
    })
}

/// Build a pixel buffer from an 8-bit RGBA image.
pub fn from_rgba_image(img: &RgbaImage) -> Result<PixelBuffer, CanvasError> {
    let (w, h) = img.dimensions();
    let mut pixels = Vec::with_capacity(w as usize * h as usize);
    for y in (0..h).rev() {
        for x in 0..w {
            pixels.push(Rgba::from_rgba8(img.get_pixel(x, y).0));
        }
    }
    PixelBuffer::from_pixels(w, h, pixels)
}

/// Save as RGBA PNG.
pub fn save_png(buffer: &PixelBuffer, path: &Path) -> Result<(), SnapshotError> {
    to_rgba_image(buffer).save(path)?;
    Ok(())
}

/// Save the single-channel model view as grayscale PNG.
pub fn save_intensity_png(buffer: &PixelBuffer, path: &Path) -> Result<(), SnapshotError> {
    to_intensity_image(buffer).save(path)?;
    Ok(())
}

/// Load any supported image from disk as a pixel buffer.
pub fn load(path: &Path) -> Result<PixelBuffer, SnapshotError> {
    let img = image::open(path)?.to_rgba8();
    Ok(from_rgba_image(&img)?)
}
