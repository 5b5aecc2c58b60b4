//! Interactive drawing session.
//!
//! Owns the committed strokes, the stroke being drawn, and the two
//! debounce gates that decide when classification and external
//! suggestions should run. Time is passed in by the caller, so the whole
//! state machine is deterministic under test.

use std::time::{Duration, Instant};

use kurbo::Point as Pos;

use crate::classify::{classify_with, top_predictions, Jitter, Prediction};
use crate::config::{ClassifierConfig, PipelineConfig, SessionConfig};
use crate::stencil::{stencil, Brush};
use crate::stroke::{Drawing, Point, Stroke};

/// Half-extent of a stencil dropped onto the canvas.
const STENCIL_SIZE: f64 = 100.0;

/// What pointer input does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Draw,
    /// Pointer drags orbit a viewer instead of drawing.
    Rotate,
}

/// Trailing-edge debounce: fires once, `delay` after the last trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debounce {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self { delay, deadline: None }
    }

    /// (Re)arm the gate; an earlier pending trigger is superseded.
    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Consume the trigger if it is due.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    strokes: Vec<Stroke>,
    current: Option<Stroke>,
    mode: Mode,
    brush: Brush,
    canvas: (f64, f64),
    classifier: ClassifierConfig,
    classify_gate: Debounce,
    suggest_gate: Debounce,
}

impl Session {
    pub fn new(config: &SessionConfig, classifier: &ClassifierConfig) -> Self {
        Self {
            strokes: Vec::new(),
            current: None,
            mode: Mode::Draw,
            brush: Brush::default(),
            canvas: (800.0, 600.0),
            classifier: classifier.clone(),
            classify_gate: Debounce::new(Duration::from_millis(config.classify_debounce_ms)),
            suggest_gate: Debounce::new(Duration::from_millis(config.suggest_debounce_ms)),
        }
    }

    /// Session sized to the suggestion writing guide.
    pub fn from_config(config: &PipelineConfig) -> Self {
        let mut session = Self::new(&config.session, &config.classifier);
        session.canvas = (
            f64::from(config.suggest.canvas_width),
            f64::from(config.suggest.canvas_height),
        );
        session
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    pub fn set_brush(&mut self, brush: Brush) {
        self.brush = brush;
    }

    pub fn is_drawing(&self) -> bool {
        self.current.is_some()
    }

    /// Start a stroke at `point`. Ignored outside [`Mode::Draw`].
    pub fn begin_stroke(&mut self, point: Point) {
        if self.mode == Mode::Draw {
            self.current = Some(Stroke::new(vec![point]));
        }
    }

    /// Append to the stroke in progress and re-arm the suggestion gate.
    pub fn extend_stroke(&mut self, point: Point, now: Instant) {
        if self.mode != Mode::Draw {
            return;
        }
        if let Some(stroke) = self.current.as_mut() {
            stroke.points.push(point);
            self.suggest_gate.trigger(now);
        }
    }

    /// Finish the stroke in progress.
    ///
    /// Returns whether it was committed: single-point strokes are
    /// discarded. A commit arms both gates.
    pub fn end_stroke(&mut self, now: Instant) -> bool {
        let Some(stroke) = self.current.take() else {
            return false;
        };
        if stroke.len() <= 1 {
            return false;
        }
        self.strokes.push(stroke);
        self.classify_gate.trigger(now);
        self.suggest_gate.trigger(now);
        tracing::debug!(strokes = self.strokes.len(), "stroke committed");
        true
    }

    /// Drop everything drawn, including pending gate triggers.
    pub fn clear(&mut self) {
        self.strokes.clear();
        self.current = None;
        self.classify_gate.cancel();
        self.suggest_gate.cancel();
    }

    /// Committed strokes only.
    pub fn drawing(&self) -> Drawing {
        Drawing::new(self.strokes.clone())
    }

    /// Committed strokes plus the in-progress one when it has > 1 point.
    pub fn drawing_with_pending(&self) -> Drawing {
        let mut drawing = self.drawing();
        if let Some(current) = self.current.as_ref().filter(|s| !s.is_degenerate()) {
            drawing.push(current.clone());
        }
        drawing
    }

    /// Predictions for the committed strokes, once the classify gate fires.
    pub fn poll_classification(
        &mut self,
        now: Instant,
        jitter: &mut impl Jitter,
    ) -> Option<Vec<Prediction>> {
        if !self.classify_gate.fire(now) {
            return None;
        }
        let predictions = classify_with(&self.drawing(), &self.classifier, jitter);
        Some(top_predictions(predictions, &self.classifier))
    }

    /// Strokes to send for suggestions, once the suggestion gate fires.
    ///
    /// Nothing is returned while no stroke has been committed.
    pub fn poll_suggestions(&mut self, now: Instant) -> Option<Vec<Stroke>> {
        if !self.suggest_gate.fire(now) || self.strokes.is_empty() {
            return None;
        }
        Some(self.drawing_with_pending().strokes)
    }

    /// Replace the canvas with the stencil for a chosen suggestion.
    pub fn apply_suggestion(&mut self, name: &str) {
        self.clear();
        let center = Pos::new(self.canvas.0 / 2.0, self.canvas.1 / 2.0);
        self.strokes.push(stencil(name, center, STENCIL_SIZE, &self.brush));
        tracing::debug!(name, "applied stencil");
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&SessionConfig::default(), &ClassifierConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{NoJitter, ShapeLabel};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn draw_line(session: &mut Session, t0: Instant, y: f64) {
        session.begin_stroke(Point::new(0.0, y));
        for i in 1..=10 {
            session.extend_stroke(Point::new(i as f64 * 10.0, y), t0);
        }
    }

    #[test]
    fn debounce_fires_once_after_delay() {
        let t0 = Instant::now();
        let mut gate = Debounce::new(ms(300));
        assert!(!gate.fire(t0));
        gate.trigger(t0);
        assert!(!gate.fire(t0 + ms(299)));
        assert!(gate.fire(t0 + ms(300)));
        assert!(!gate.fire(t0 + ms(900)));
    }

    #[test]
    fn retrigger_postpones_deadline() {
        let t0 = Instant::now();
        let mut gate = Debounce::new(ms(300));
        gate.trigger(t0);
        gate.trigger(t0 + ms(200));
        assert!(!gate.fire(t0 + ms(400)));
        assert!(gate.fire(t0 + ms(500)));
    }

    #[test]
    fn single_point_stroke_is_discarded() {
        let t0 = Instant::now();
        let mut session = Session::default();
        session.begin_stroke(Point::new(1.0, 1.0));
        assert!(!session.end_stroke(t0));
        assert!(session.drawing().is_empty());
        assert!(session.poll_classification(t0 + ms(1000), &mut NoJitter).is_none());
    }

    #[test]
    fn rotate_mode_captures_nothing() {
        let t0 = Instant::now();
        let mut session = Session::default();
        session.set_mode(Mode::Rotate);
        draw_line(&mut session, t0, 0.0);
        assert!(!session.end_stroke(t0));
        assert!(session.drawing().is_empty());
    }

    #[test]
    fn pending_stroke_is_included_only_when_drawable() {
        let t0 = Instant::now();
        let mut session = Session::default();
        draw_line(&mut session, t0, 0.0);
        assert!(session.end_stroke(t0));

        session.begin_stroke(Point::new(0.0, 50.0));
        assert_eq!(session.drawing_with_pending().stroke_count(), 1);
        session.extend_stroke(Point::new(5.0, 50.0), t0);
        assert_eq!(session.drawing_with_pending().stroke_count(), 2);
        assert_eq!(session.drawing().stroke_count(), 1);
    }

    #[test]
    fn classification_waits_for_the_gate() {
        let t0 = Instant::now();
        let mut session = Session::default();
        draw_line(&mut session, t0, 0.0);
        session.end_stroke(t0);
        draw_line(&mut session, t0, 50.0);
        session.end_stroke(t0 + ms(100));

        assert!(session.poll_classification(t0 + ms(300), &mut NoJitter).is_none());
        let predictions = session
            .poll_classification(t0 + ms(400), &mut NoJitter)
            .unwrap();
        // Two horizontal strokes, 100 wide and 50 tall.
        assert!(predictions.iter().any(|p| p.label == ShapeLabel::Fish));
        assert!(predictions.len() <= 5);
        assert!(session.poll_classification(t0 + ms(800), &mut NoJitter).is_none());
    }

    #[test]
    fn suggestions_need_a_committed_stroke() {
        let t0 = Instant::now();
        let mut session = Session::default();
        draw_line(&mut session, t0, 0.0);
        assert!(session.poll_suggestions(t0 + ms(800)).is_none());

        draw_line(&mut session, t0, 0.0);
        session.end_stroke(t0);
        draw_line(&mut session, t0 + ms(100), 40.0);
        assert!(session.poll_suggestions(t0 + ms(800)).is_none());
        let strokes = session.poll_suggestions(t0 + ms(900)).unwrap();
        assert_eq!(strokes.len(), 2);
    }

    #[test]
    fn clear_cancels_pending_work() {
        let t0 = Instant::now();
        let mut session = Session::default();
        draw_line(&mut session, t0, 0.0);
        session.end_stroke(t0);
        session.clear();
        assert!(session.drawing().is_empty());
        assert!(session.poll_classification(t0 + ms(5000), &mut NoJitter).is_none());
        assert!(session.poll_suggestions(t0 + ms(5000)).is_none());
    }

    #[test]
    fn applying_a_suggestion_replaces_the_canvas() {
        let t0 = Instant::now();
        let mut session = Session::default();
        draw_line(&mut session, t0, 0.0);
        session.end_stroke(t0);
        session.apply_suggestion("square");
        let drawing = session.drawing();
        assert_eq!(drawing.stroke_count(), 1);
        let first = drawing.strokes[0].first().unwrap();
        assert_eq!((first.x, first.y), (300.0, 200.0));
    }
}
