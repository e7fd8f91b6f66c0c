//! Frame driver tying pointer input, rasterization, and classification.
//!
//! Each call to [`Sketchpad::tick`] is one frame, processed in a fixed order:
//! 1. Apply queued input events (button presses/releases, reset, classify)
//! 2. Sample the cursor into at most one stroke and rasterize it
//! 3. Downsample the canvas to the model input size
//! 4. Classify the snapshot, when per-frame classification is enabled or a
//!    `Classify` event arrived this frame

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::canvas::{draw_line, PixelBuffer};
use crate::classify::{Classifier, ClassifyError, Prediction};
use crate::config::{CanvasConfig, ConfigError};
use crate::stroke::{PointerButton, SessionState, Stroke, StrokeSession};

/// Discrete input signal delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum InputEvent {
    /// A pointer button was pressed over the surface.
    PointerDown { button: PointerButton },
    /// A pointer button was released.
    PointerUp { button: PointerButton },
    /// Clear the canvas to the background color.
    Reset,
    /// Classify this frame's snapshot once, after drawing.
    Classify,
}

/// Everything the host observed during one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Frame {
    /// Surface-local pointer position, `None` when outside the surface.
    pub cursor: Option<Vec2>,
    /// Events in arrival order.
    pub events: Vec<InputEvent>,
}

/// Outcome of one frame.
#[derive(Debug, Clone)]
pub struct FrameReport {
    /// Number of stroke segments rasterized (0 or 1).
    pub strokes_drawn: usize,
    /// Prediction for this frame, when classification ran.
    pub prediction: Option<Prediction>,
}

/// Owns the canvas and the stroke session for one drawing surface.
#[derive(Debug, Clone)]
pub struct Sketchpad {
    config: CanvasConfig,
    canvas: PixelBuffer,
    session: StrokeSession,
    model_input: PixelBuffer,
    classify_requested: bool,
}

impl Sketchpad {
    /// Create a surface cleared to the background color.
    pub fn new(config: CanvasConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let canvas = PixelBuffer::new(config.width, config.height, config.background_color)?;
        Self::from_parts(config, canvas)
    }

    /// Start from an existing canvas; the surface takes its dimensions.
    pub fn with_canvas(mut config: CanvasConfig, canvas: PixelBuffer) -> Result<Self, ConfigError> {
        config.width = canvas.width();
        config.height = canvas.height();
        config.validate()?;
        Self::from_parts(config, canvas)
    }

    fn from_parts(config: CanvasConfig, canvas: PixelBuffer) -> Result<Self, ConfigError> {
        let session = StrokeSession::new(
            config.paint_color,
            config.background_color,
            config.brush_radius,
            (config.width, config.height),
        );
        let model_input = canvas.downsample(config.model_input_width, config.model_input_height)?;
        tracing::info!(
            width = config.width,
            height = config.height,
            brush_radius = config.brush_radius,
            "sketchpad created"
        );
        Ok(Self {
            config,
            canvas,
            session,
            model_input,
            classify_requested: false,
        })
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Full-resolution drawing surface.
    pub fn canvas(&self) -> &PixelBuffer {
        &self.canvas
    }

    /// Latest downsampled snapshot handed to the classifier.
    pub fn model_input(&self) -> &PixelBuffer {
        &self.model_input
    }

    /// Toggle classification at the end of every frame.
    pub fn set_classify_every_frame(&mut self, enabled: bool) {
        self.config.classify_every_frame = enabled;
    }

    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    /// Clear the canvas to the background color.
    pub fn reset(&mut self) {
        self.canvas.clear(self.config.background_color);
        tracing::debug!("canvas reset");
    }

    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { button } => self.session.pointer_down(button),
            InputEvent::PointerUp { button } => self.session.pointer_up(button),
            InputEvent::Reset => self.reset(),
            InputEvent::Classify => self.classify_requested = true,
        }
    }

    /// Rasterize one stroke onto the canvas.
    pub fn draw(&mut self, stroke: &Stroke) {
        draw_line(&mut self.canvas, stroke.from, stroke.to, stroke.color, stroke.radius);
        tracing::debug!(from = %stroke.from, to = %stroke.to, "stroke drawn");
    }

    /// Process one frame.
    ///
    /// Drawing and the downsampled snapshot are always updated, even when
    /// classification then fails (for example `NotReady`). A `Classify`
    /// request without a loaded model is logged and dropped; per-frame
    /// classification without one is an error.
    pub fn tick(
        &mut self,
        frame: &Frame,
        classifier: &mut Classifier,
    ) -> Result<FrameReport, ClassifyError> {
        for &event in &frame.events {
            self.handle_event(event);
        }

        let stroke = frame.cursor.and_then(|pos| self.session.sample(pos));
        if let Some(stroke) = &stroke {
            self.draw(stroke);
        }

        self.model_input = self
            .canvas
            .downsample(self.config.model_input_width, self.config.model_input_height)?;

        let mut wanted = self.config.classify_every_frame;
        if std::mem::take(&mut self.classify_requested) {
            if classifier.is_ready() {
                wanted = true;
            } else {
                tracing::warn!("classify requested but no model is loaded");
            }
        }
        let prediction = if wanted { Some(self.classify(classifier)?) } else { None };

        Ok(FrameReport {
            strokes_drawn: usize::from(stroke.is_some()),
            prediction,
        })
    }

    /// Classify the latest snapshot on demand.
    pub fn classify(&self, classifier: &mut Classifier) -> Result<Prediction, ClassifyError> {
        classifier.classify(&self.model_input)
    }
}

#[cfg(test)]
mod tests {
    use glam::IVec2;

    use super::*;
    use crate::classify::{InferenceBackend, InputTensor};
    use crate::color::Rgba;

    struct ConstantBackend;

    impl InferenceBackend for ConstantBackend {
        fn input_size(&self) -> (u32, u32) {
            (28, 28)
        }

        fn infer(&mut self, _input: &InputTensor) -> Result<Vec<f32>, ClassifyError> {
            Ok(vec![0.0, 0.0, 0.0, 5.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0])
        }
    }

    fn down(button: PointerButton) -> InputEvent {
        InputEvent::PointerDown { button }
    }

    fn up(button: PointerButton) -> InputEvent {
        InputEvent::PointerUp { button }
    }

    fn frame(cursor: (f32, f32), events: Vec<InputEvent>) -> Frame {
        Frame {
            cursor: Some(Vec2::new(cursor.0, cursor.1)),
            events,
        }
    }

    fn lit_pixels(buf: &PixelBuffer) -> usize {
        buf.pixels().iter().filter(|&&p| p == Rgba::WHITE).count()
    }

    #[test]
    fn test_new_canvas_is_background() {
        let pad = Sketchpad::new(CanvasConfig::default()).unwrap();
        assert_eq!(lit_pixels(pad.canvas()), 0);
        assert_eq!((pad.model_input().width(), pad.model_input().height()), (28, 28));
    }

    #[test]
    fn test_press_then_move_draws_one_segment() {
        let mut pad = Sketchpad::new(CanvasConfig::default()).unwrap();
        let mut classifier = Classifier::unloaded(10);

        let r = pad
            .tick(&frame((50.0, 50.0), vec![down(PointerButton::Paint)]), &mut classifier)
            .unwrap();
        assert_eq!(r.strokes_drawn, 0);

        let r = pad.tick(&frame((120.0, 80.0), vec![]), &mut classifier).unwrap();
        assert_eq!(r.strokes_drawn, 1);
        assert_eq!(pad.canvas().get(IVec2::new(50, 50)), Some(Rgba::WHITE));
        assert_eq!(pad.canvas().get(IVec2::new(120, 80)), Some(Rgba::WHITE));
    }

    #[test]
    fn test_press_and_release_without_movement_draws_nothing() {
        let mut pad = Sketchpad::new(CanvasConfig::default()).unwrap();
        let mut classifier = Classifier::unloaded(10);
        pad.tick(&frame((50.0, 50.0), vec![down(PointerButton::Paint)]), &mut classifier)
            .unwrap();
        pad.tick(&frame((50.0, 50.0), vec![up(PointerButton::Paint)]), &mut classifier)
            .unwrap();
        assert_eq!(lit_pixels(pad.canvas()), 0);
        assert_eq!(pad.session_state(), SessionState::Idle);
    }

    #[test]
    fn test_erase_restores_background() {
        let mut pad = Sketchpad::new(CanvasConfig::default()).unwrap();
        let mut classifier = Classifier::unloaded(10);
        let paint = PointerButton::Paint;
        let erase = PointerButton::Erase;

        pad.tick(&frame((20.0, 140.0), vec![down(paint)]), &mut classifier).unwrap();
        pad.tick(&frame((260.0, 140.0), vec![]), &mut classifier).unwrap();
        assert!(lit_pixels(pad.canvas()) > 0);

        pad.tick(&frame((10.0, 140.0), vec![up(paint), down(erase)]), &mut classifier)
            .unwrap();
        pad.tick(&frame((270.0, 140.0), vec![]), &mut classifier).unwrap();
        assert_eq!(lit_pixels(pad.canvas()), 0);
    }

    #[test]
    fn test_reset_event_clears_canvas() {
        let mut pad = Sketchpad::new(CanvasConfig::default()).unwrap();
        let mut classifier = Classifier::unloaded(10);
        pad.tick(&frame((30.0, 30.0), vec![down(PointerButton::Paint)]), &mut classifier)
            .unwrap();
        pad.tick(&frame((90.0, 90.0), vec![]), &mut classifier).unwrap();
        pad.tick(&Frame { cursor: None, events: vec![InputEvent::Reset] }, &mut classifier)
            .unwrap();
        assert_eq!(lit_pixels(pad.canvas()), 0);
        assert_eq!(lit_pixels(pad.model_input()), 0);
    }

    #[test]
    fn test_per_frame_classification() {
        let config = CanvasConfig { classify_every_frame: true, ..Default::default() };
        let mut pad = Sketchpad::new(config).unwrap();

        let mut unloaded = Classifier::unloaded(10);
        let result = pad.tick(&Frame::default(), &mut unloaded);
        assert!(matches!(result, Err(ClassifyError::NotReady)));

        let mut classifier = Classifier::new(ConstantBackend, 10);
        let report = pad.tick(&Frame::default(), &mut classifier).unwrap();
        let prediction = report.prediction.unwrap();
        assert_eq!(prediction.digit, 3);
    }

    #[test]
    fn test_classification_off_by_default() {
        let mut pad = Sketchpad::new(CanvasConfig::default()).unwrap();
        let mut classifier = Classifier::new(ConstantBackend, 10);
        let report = pad.tick(&Frame::default(), &mut classifier).unwrap();
        assert!(report.prediction.is_none());
        assert_eq!(pad.classify(&mut classifier).unwrap().digit, 3);
    }

    #[test]
    fn test_far_off_cursor_clips_instead_of_overflowing() {
        let mut pad = Sketchpad::new(CanvasConfig::default()).unwrap();
        let mut classifier = Classifier::unloaded(10);
        pad.tick(&frame((10.0, 10.0), vec![down(PointerButton::Paint)]), &mut classifier)
            .unwrap();
        let r = pad.tick(&frame((-3.0e9, 10.0), vec![]), &mut classifier).unwrap();
        assert_eq!(r.strokes_drawn, 1);
        assert_eq!(pad.canvas().get(IVec2::new(0, 10)), Some(Rgba::WHITE));

        let r = pad.tick(&frame((4.0e9, -4.0e9), vec![]), &mut classifier).unwrap();
        assert_eq!(r.strokes_drawn, 1);
        assert_eq!(pad.canvas().get(IVec2::new(200, 0)), Some(Rgba::WHITE));
    }

    #[test]
    fn test_classify_event_runs_once() {
        let mut pad = Sketchpad::new(CanvasConfig::default()).unwrap();
        let mut classifier = Classifier::new(ConstantBackend, 10);

        let events = vec![InputEvent::Classify];
        let report = pad.tick(&Frame { cursor: None, events }, &mut classifier).unwrap();
        assert_eq!(report.prediction.map(|p| p.digit), Some(3));

        let report = pad.tick(&Frame::default(), &mut classifier).unwrap();
        assert!(report.prediction.is_none());
    }

    #[test]
    fn test_classify_event_without_model_is_dropped() {
        let mut pad = Sketchpad::new(CanvasConfig::default()).unwrap();
        let mut unloaded = Classifier::unloaded(10);
        let events = vec![InputEvent::Classify];
        let report = pad.tick(&Frame { cursor: None, events }, &mut unloaded).unwrap();
        assert!(report.prediction.is_none());
    }

    #[test]
    fn test_frame_json_shape() {
        let json = r#"{
            "cursor": [12.5, 40.0],
            "events": [
                { "type": "PointerDown", "data": { "button": "paint" } },
                { "type": "Reset" },
                { "type": "Classify" }
            ]
        }"#;
        let frame: Frame = serde_json::from_str(json).unwrap();
        assert_eq!(frame.cursor, Some(Vec2::new(12.5, 40.0)));
        assert_eq!(
            frame.events,
            vec![down(PointerButton::Paint), InputEvent::Reset, InputEvent::Classify]
        );
    }
}
