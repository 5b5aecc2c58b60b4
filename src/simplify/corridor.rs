//! Corridor simplification (Douglas-Peucker family).
//!
//! Keeps the first and last point, then repeatedly splits a range at the
//! point farthest from its chord while that distance exceeds epsilon.
//! `geo` does the splitting on coordinates and hands back the kept
//! indices, so per-point metadata survives untouched.

use geo::{LineString, SimplifyIdx};

use crate::Point;

use super::Tolerance;

/// Simplify an open polyline.
///
/// Returns a subsequence of `points` that always includes both endpoints.
/// Inputs of two or fewer points, and a zero epsilon, return everything.
pub fn simplify(points: &[Point], epsilon: Tolerance) -> Vec<Point> {
    kept_indices(points, epsilon)
        .into_iter()
        .map(|i| points[i].clone())
        .collect()
}

/// Indices of the points that survive, ascending.
fn kept_indices(points: &[Point], epsilon: Tolerance) -> Vec<usize> {
    if points.len() <= 2 {
        return (0..points.len()).collect();
    }
    let line: LineString<f64> = points.iter().map(|p| (p.x, p.y)).collect();
    line.simplify_idx(&epsilon.get())
}
