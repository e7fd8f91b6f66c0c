//! Pointer stroke session — turns button and position samples into strokes.
//!
//! ```text
//!   Idle ──down(paint)──▶ Painting ──up(paint)──▶ Idle
//!   Idle ──down(erase)──▶ Erasing  ──up(erase)──▶ Idle
//! ```
//!
//! Paint wins while both buttons are held. Every button press forgets the
//! previous sample, so the first sample after a press never draws.
//! Samples are clamped to the surface grown by the brush radius (plus one
//! pixel); anything further out can never put ink on the surface.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::color::Rgba;

/// Logical pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    /// Draws with the paint color (primary button).
    Paint,
    /// Draws with the background color (secondary button).
    Erase,
}

/// Current session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Painting,
    Erasing,
}

/// One segment to rasterize this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub from: IVec2,
    pub to: IVec2,
    pub color: Rgba,
    pub radius: u32,
}

/// Tracks held buttons and the previous sampled position.
#[derive(Debug, Clone)]
pub struct StrokeSession {
    paint_held: bool,
    erase_held: bool,
    previous: Option<IVec2>,
    paint_color: Rgba,
    erase_color: Rgba,
    radius: u32,
    /// Clamp band for samples: `[-(radius + 1), size + radius]`.
    band_min: Vec2,
    band_max: Vec2,
}

impl StrokeSession {
    /// `surface` is the `(width, height)` of the drawing surface.
    pub fn new(paint_color: Rgba, erase_color: Rgba, radius: u32, surface: (u32, u32)) -> Self {
        let margin = radius as f32;
        Self {
            paint_held: false,
            erase_held: false,
            previous: None,
            paint_color,
            erase_color,
            radius,
            band_min: Vec2::splat(-margin - 1.0),
            band_max: Vec2::new(surface.0 as f32, surface.1 as f32) + margin,
        }
    }

    pub fn state(&self) -> SessionState {
        if self.paint_held {
            SessionState::Painting
        } else if self.erase_held {
            SessionState::Erasing
        } else {
            SessionState::Idle
        }
    }

    pub fn pointer_down(&mut self, button: PointerButton) {
        match button {
            PointerButton::Paint => self.paint_held = true,
            PointerButton::Erase => self.erase_held = true,
        }
        self.previous = None;
        tracing::debug!(?button, state = ?self.state(), "pointer down");
    }

    pub fn pointer_up(&mut self, button: PointerButton) {
        match button {
            PointerButton::Paint => self.paint_held = false,
            PointerButton::Erase => self.erase_held = false,
        }
        if self.state() == SessionState::Idle {
            self.previous = None;
        }
        tracing::debug!(?button, state = ?self.state(), "pointer up");
    }

    /// Feed this frame's surface-local pointer position.
    ///
    /// Returns a stroke from the previous sample when dragging and the
    /// integer pixel position changed. Fractional positions are truncated
    /// after clamping to the sampling band.
    pub fn sample(&mut self, position: Vec2) -> Option<Stroke> {
        let color = match self.state() {
            SessionState::Idle => return None,
            SessionState::Painting => self.paint_color,
            SessionState::Erasing => self.erase_color,
        };

        let current = position.clamp(self.band_min, self.band_max).as_ivec2();
        let previous = self.previous.replace(current)?;
        if previous == current {
            return None;
        }

        Some(Stroke {
            from: previous,
            to: current,
            color,
            radius: self.radius,
        })
    }
}
