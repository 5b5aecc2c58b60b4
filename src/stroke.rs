//! Stroke data model shared by every stage.

use serde::{Deserialize, Serialize};

/// A captured pen sample.
///
/// Only `x`/`y` take part in geometry. The metadata rides along so that
/// simplified strokes keep their colour, brush size and capture time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    /// Capture timestamp in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            color: None,
            size: None,
            time: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_time(mut self, time: f64) -> Self {
        self.time = Some(time);
        self
    }

    /// Position as a kurbo point for geometry.
    #[inline]
    pub fn pos(&self) -> kurbo::Point {
        kurbo::Point::new(self.x, self.y)
    }
}

/// One pen-down to pen-up path. Point order is the drawn order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stroke {
    pub points: Vec<Point>,
}

impl Stroke {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Fewer than two points: no direction, no segment.
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 2
    }

    pub fn first(&self) -> Option<&Point> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Point> {
        self.points.last()
    }
}

impl From<Vec<Point>> for Stroke {
    fn from(points: Vec<Point>) -> Self {
        Self { points }
    }
}

impl FromIterator<Point> for Stroke {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// A whole sketch: strokes in drawing order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Drawing {
    pub strokes: Vec<Stroke>,
}

impl Drawing {
    pub fn new(strokes: Vec<Stroke>) -> Self {
        Self { strokes }
    }

    pub fn push(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    pub fn total_points(&self) -> usize {
        self.strokes.iter().map(Stroke::len).sum()
    }

    /// Every point of every stroke, in order.
    pub fn points(&self) -> impl Iterator<Item = &Point> + '_ {
        self.strokes.iter().flat_map(|s| s.points.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.iter().all(Stroke::is_empty)
    }

    /// Parse a drawing from its JSON form: an array of strokes, each an
    /// array of `{x, y, color?, size?, time?}` objects.
    pub fn from_json(text: &str) -> Result<Self, crate::InkError> {
        Ok(serde_json::from_str(text)?)
    }
}

impl From<Vec<Stroke>> for Drawing {
    fn from(strokes: Vec<Stroke>) -> Self {
        Self { strokes }
    }
}
