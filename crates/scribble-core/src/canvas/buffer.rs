//! Mutable RGBA pixel grid backing the drawing surface.

use glam::IVec2;

use super::CanvasError;
use crate::color::Rgba;

/// Fixed-size RGBA pixel grid.
///
/// Row-major, origin at the bottom-left corner (y grows upward, matching
/// surface-local pointer coordinates). Dimensions never change after
/// creation and are always non-zero.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl PixelBuffer {
    /// Create a buffer with every pixel set to `fill`.
    pub fn new(width: u32, height: u32, fill: Rgba) -> Result<Self, CanvasError> {
        if width == 0 || height == 0 {
            return Err(CanvasError::EmptyDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            pixels: vec![fill; width as usize * height as usize],
        })
    }

    /// Wrap existing row-major pixel data.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgba>) -> Result<Self, CanvasError> {
        if width == 0 || height == 0 {
            return Err(CanvasError::EmptyDimensions { width, height });
        }
        if pixels.len() != width as usize * height as usize {
            return Err(CanvasError::LengthMismatch {
                width,
                height,
                actual: pixels.len(),
            });
        }
        Ok(Self { width, height, pixels })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw pixel data, row-major from the bottom row up.
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Whether `p` lies inside `[0, width) × [0, height)`.
    pub fn contains(&self, p: IVec2) -> bool {
        p.x >= 0 && p.y >= 0 && (p.x as u32) < self.width && (p.y as u32) < self.height
    }

    fn index(&self, p: IVec2) -> Option<usize> {
        self.contains(p)
            .then(|| p.y as usize * self.width as usize + p.x as usize)
    }

    /// Read a pixel. Returns `None` outside the buffer.
    pub fn get(&self, p: IVec2) -> Option<Rgba> {
        self.index(p).map(|i| self.pixels[i])
    }

    /// Write a pixel. Out-of-bounds writes are skipped and return `false`.
    pub fn set(&mut self, p: IVec2, color: Rgba) -> bool {
        match self.index(p) {
            Some(i) => {
                self.pixels[i] = color;
                true
            }
            None => false,
        }
    }

    /// Set every pixel to `color`.
    pub fn clear(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    /// Nearest-neighbor downsample to `target_width × target_height`.
    ///
    /// Each target pixel samples the source at
    /// `floor(tx * src_width / target_width)` (same for y). The target must
    /// be non-zero, no larger than the source on either axis, and smaller on
    /// at least one. Returns an owned copy; `self` is left untouched.
    pub fn downsample(&self, target_width: u32, target_height: u32) -> Result<Self, CanvasError> {
        let invalid = target_width == 0
            || target_height == 0
            || target_width > self.width
            || target_height > self.height
            || (target_width == self.width && target_height == self.height);
        if invalid {
            return Err(CanvasError::InvalidDownsample {
                src_width: self.width,
                src_height: self.height,
                target_width,
                target_height,
            });
        }

        let (sw, sh) = (self.width as u64, self.height as u64);
        let (tw, th) = (target_width as u64, target_height as u64);

        let mut pixels = Vec::with_capacity((tw * th) as usize);
        for ty in 0..th {
            let sy = ty * sh / th;
            let row = (sy * sw) as usize;
            for tx in 0..tw {
                let sx = (tx * sw / tw) as usize;
                pixels.push(self.pixels[row + sx]);
            }
        }

        Ok(Self {
            width: target_width,
            height: target_height,
            pixels,
        })
    }
}
