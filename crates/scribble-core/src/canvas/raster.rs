//! Brush rasterization: Bresenham line stepping with a circular stamp.
//!
//! # Algorithm
//! Integer-only Bresenham. Both deltas are doubled so the half-step bias
//! `major / 2` stays exact; the fraction accumulator decides when the
//! minor axis advances. Deltas and the accumulator are `i64`, so any pair
//! of `i32` endpoints steps without overflow. Every stepped point, including both endpoints,
//! receives a filled disk of radius `r` (`dx² + dy² ≤ r²`).
//!
//! # Complexity
//! - `line_points`: O(max(|dx|, |dy|))
//! - `draw_line`: O(max(|dx|, |dy|) × r²), with each stamp clipped to the
//!   buffer first

use glam::{I64Vec2, IVec2};

use super::PixelBuffer;
use crate::color::Rgba;

/// Iterator over the integer points of a Bresenham line, endpoints included.
#[derive(Debug, Clone)]
pub struct LinePoints {
    current: IVec2,
    end: IVec2,
    step: IVec2,
    /// Doubled absolute deltas.
    delta: I64Vec2,
    fraction: i64,
    x_major: bool,
    started: bool,
    done: bool,
}

/// Walk the line from `p0` to `p1`.
///
/// `p0 == p1` yields the single point.
pub fn line_points(p0: IVec2, p1: IVec2) -> LinePoints {
    let d = p1.as_i64vec2() - p0.as_i64vec2();
    let step = IVec2::new(
        if d.x < 0 { -1 } else { 1 },
        if d.y < 0 { -1 } else { 1 },
    );
    let delta = d.abs() * 2;
    let x_major = delta.x > delta.y;
    let fraction = if x_major {
        delta.y - (delta.x >> 1)
    } else {
        delta.x - (delta.y >> 1)
    };

    LinePoints {
        current: p0,
        end: p1,
        step,
        delta,
        fraction,
        x_major,
        started: false,
        done: false,
    }
}

impl Iterator for LinePoints {
    type Item = IVec2;

    fn next(&mut self) -> Option<IVec2> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            self.done = self.current == self.end;
            return Some(self.current);
        }

        if self.x_major {
            if self.fraction >= 0 {
                self.current.y += self.step.y;
                self.fraction -= self.delta.x;
            }
            self.current.x += self.step.x;
            self.fraction += self.delta.y;
            self.done = self.current.x == self.end.x;
        } else {
            if self.fraction >= 0 {
                self.current.x += self.step.x;
                self.fraction -= self.delta.y;
            }
            self.current.y += self.step.y;
            self.fraction += self.delta.x;
            self.done = self.current.y == self.end.y;
        }

        Some(self.current)
    }
}

/// Fill a disk of `radius` around `center`. Out-of-bounds pixels are skipped.
pub fn stamp_disk(buffer: &mut PixelBuffer, center: IVec2, radius: u32, color: Rgba) {
    let r = i64::from(radius);
    let r2 = u64::from(radius) * u64::from(radius);
    let (cx, cy) = (i64::from(center.x), i64::from(center.y));

    // Visit only the part of the bounding square that lies on the buffer.
    let x0 = (cx - r).max(0);
    let x1 = (cx + r).min(i64::from(buffer.width()) - 1);
    let y0 = (cy - r).max(0);
    let y1 = (cy + r).min(i64::from(buffer.height()) - 1);

    for y in y0..=y1 {
        let dy = (y - cy).unsigned_abs();
        for x in x0..=x1 {
            let dx = (x - cx).unsigned_abs();
            // |dx|, |dy| <= r after clipping, so each square fits in u64.
            if (dx * dx).saturating_add(dy * dy) <= r2 {
                // In range: both coordinates lie within the buffer.
                buffer.set(IVec2::new(x as i32, y as i32), color);
            }
        }
    }
}

/// Draw a brushed segment from `p0` to `p1`.
pub fn draw_line(buffer: &mut PixelBuffer, p0: IVec2, p1: IVec2, color: Rgba, radius: u32) {
    for p in line_points(p0, p1) {
        stamp_disk(buffer, p, radius, color);
    }
}
