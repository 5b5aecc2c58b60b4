//! Geometric descriptor of a whole drawing.

use kurbo::Rect;
use serde::Serialize;

use crate::geom::{bounding_box, path_length};
use crate::stroke::Drawing;

/// Fewest points (across all strokes) worth describing.
const MIN_POINTS: usize = 3;

/// Fixed-shape summary of a drawing's geometry.
///
/// Recomputed from scratch on every call; nothing is cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Descriptor {
    pub bounds: Rect,
    pub width: f64,
    pub height: f64,
    /// `width / height`. `+inf` for a zero-height drawing with some width,
    /// `NaN` when both are zero. Threshold checks against either are false
    /// except `> x`, which `+inf` satisfies.
    pub aspect_ratio: f64,
    pub center_x: f64,
    pub center_y: f64,
    pub stroke_count: usize,
    pub total_points: usize,
    /// Mean distance from each point to the bounding-box centre.
    pub avg_distance_from_center: f64,
    /// Population variance of those distances.
    pub variance: f64,
    /// Drawn length, summed per stroke (no segment between strokes).
    pub path_length: f64,
}

/// Describe a drawing. `None` when it holds fewer than three points.
///
/// Statistics use the bounding-box centre, not the centre of mass.
pub fn extract_features(drawing: &Drawing) -> Option<Descriptor> {
    let total_points = drawing.total_points();
    if total_points < MIN_POINTS {
        return None;
    }

    let bounds = bounding_box(drawing.points())?;
    let center = bounds.center();
    let (width, height) = (bounds.width(), bounds.height());

    let distances: Vec<f64> = drawing
        .points()
        .map(|p| p.pos().distance(center))
        .collect();
    let count = distances.len() as f64;
    let avg_distance_from_center = distances.iter().sum::<f64>() / count;
    let variance = distances
        .iter()
        .map(|d| (d - avg_distance_from_center).powi(2))
        .sum::<f64>()
        / count;

    let path_length = drawing
        .strokes
        .iter()
        .map(|s| path_length(&s.points))
        .sum();

    Some(Descriptor {
        bounds,
        width,
        height,
        aspect_ratio: width / height,
        center_x: center.x,
        center_y: center.y,
        stroke_count: drawing.stroke_count(),
        total_points,
        avg_distance_from_center,
        variance,
        path_length,
    })
}
