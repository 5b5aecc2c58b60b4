//! Polyline simplification: dense freehand strokes → sparse polylines.
//!
//! Two geometric algorithms and one index-based fallback:
//! 1. Corridor (Douglas-Peucker) with a clamped point-to-segment distance
//! 2. Minimum area (Visvalingam-Whyatt) with lazy neighbour updates
//! 3. Decimate: keep every third point
//!
//! Every function returns new strokes; inputs are never mutated.

pub mod corridor;
pub mod min_area;

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::InkError;
use crate::stroke::{Drawing, Stroke};

/// Strokes shorter than this come back unchanged from [`simplify`].
const MIN_SIMPLIFY_POINTS: usize = 3;

/// Keep one point out of this many in [`Algorithm::Decimate`].
const DECIMATE_STRIDE: usize = 3;

/// A validated, finite, non-negative tolerance.
///
/// Used as the corridor half-width (epsilon) or the minimum triangle area.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Tolerance(f64);

impl Tolerance {
    pub fn new(value: f64) -> Result<Self, InkError> {
        if value.is_finite() && value >= 0.0 {
            Ok(Self(value))
        } else {
            Err(InkError::InvalidTolerance(value))
        }
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

/// Which simplifier to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    #[default]
    #[serde(alias = "douglas-peucker")]
    Corridor,
    #[serde(alias = "visvalingam")]
    MinArea,
    #[serde(alias = "none")]
    Decimate,
}

impl Algorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Corridor => "corridor",
            Algorithm::MinArea => "min-area",
            Algorithm::Decimate => "decimate",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "corridor" | "douglas-peucker" => Ok(Algorithm::Corridor),
            "min-area" | "visvalingam" => Ok(Algorithm::MinArea),
            "decimate" | "none" => Ok(Algorithm::Decimate),
            other => Err(format!(
                "unknown algorithm '{other}' (expected corridor, min-area or decimate)"
            )),
        }
    }
}

/// Preset tolerance pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QualityTier {
    High,
    #[default]
    Medium,
    Low,
}

/// The (epsilon, min_area) pair a tier stands for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub epsilon: Tolerance,
    pub min_area: Tolerance,
}

impl QualityTier {
    pub fn tolerances(self) -> Tolerances {
        let (epsilon, min_area) = match self {
            QualityTier::High => (2.0, 4.0),
            QualityTier::Medium => (5.0, 15.0),
            QualityTier::Low => (10.0, 30.0),
        };
        Tolerances {
            epsilon: Tolerance(epsilon),
            min_area: Tolerance(min_area),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QualityTier::High => "high",
            QualityTier::Medium => "medium",
            QualityTier::Low => "low",
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QualityTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "high" => Ok(QualityTier::High),
            "medium" => Ok(QualityTier::Medium),
            "low" => Ok(QualityTier::Low),
            other => Err(format!(
                "unknown quality '{other}' (expected high, medium or low)"
            )),
        }
    }
}

/// Simplify one stroke with a preset tier.
///
/// Strokes of fewer than three points are returned unchanged for every
/// algorithm.
pub fn simplify(stroke: &Stroke, algorithm: Algorithm, quality: QualityTier) -> Stroke {
    if stroke.len() < MIN_SIMPLIFY_POINTS {
        return stroke.clone();
    }
    let tol = quality.tolerances();
    let points = match algorithm {
        Algorithm::Corridor => corridor::simplify(&stroke.points, tol.epsilon),
        Algorithm::MinArea => min_area::simplify(&stroke.points, tol.min_area),
        Algorithm::Decimate => decimate(&stroke.points),
    };
    Stroke::new(points)
}

/// Simplify every stroke of a drawing, in parallel, preserving order.
pub fn simplify_drawing(drawing: &Drawing, algorithm: Algorithm, quality: QualityTier) -> Drawing {
    let strokes: Vec<Stroke> = drawing
        .strokes
        .par_iter()
        .map(|s| simplify(s, algorithm, quality))
        .collect();
    let simplified = Drawing::new(strokes);
    tracing::debug!(
        algorithm = %algorithm,
        quality = %quality,
        before = drawing.total_points(),
        after = simplified.total_points(),
        "simplified drawing"
    );
    simplified
}

/// Non-geometric fallback: keep points whose index is a multiple of 3.
fn decimate(points: &[crate::Point]) -> Vec<crate::Point> {
    points.iter().step_by(DECIMATE_STRIDE).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point;

    fn wave(n: usize) -> Stroke {
        (0..n)
            .map(|i| {
                let x = i as f64 * 4.0;
                Point::new(x, (x / 25.0).sin() * 40.0)
            })
            .collect()
    }

    #[test]
    fn tolerance_rejects_negative_and_nan() {
        assert!(matches!(Tolerance::new(-0.5), Err(InkError::InvalidTolerance(_))));
        assert!(Tolerance::new(f64::NAN).is_err());
        assert!(Tolerance::new(f64::INFINITY).is_err());
        assert_eq!(Tolerance::new(0.0).unwrap().get(), 0.0);
    }

    #[test]
    fn tiers_map_to_fixed_pairs() {
        let pairs: Vec<(f64, f64)> = [QualityTier::High, QualityTier::Medium, QualityTier::Low]
            .iter()
            .map(|q| {
                let t = q.tolerances();
                (t.epsilon.get(), t.min_area.get())
            })
            .collect();
        assert_eq!(pairs, vec![(2.0, 4.0), (5.0, 15.0), (10.0, 30.0)]);
    }

    #[test]
    fn short_strokes_come_back_unchanged() {
        let two: Stroke = vec![Point::new(0.0, 0.0), Point::new(9.0, 9.0)].into();
        for algorithm in [Algorithm::Corridor, Algorithm::MinArea, Algorithm::Decimate] {
            assert_eq!(simplify(&two, algorithm, QualityTier::Low), two);
            assert!(simplify(&Stroke::default(), algorithm, QualityTier::Low).is_empty());
        }
    }

    #[test]
    fn decimate_keeps_every_third_index() {
        let stroke = wave(10);
        let out = simplify(&stroke, Algorithm::Decimate, QualityTier::High);
        let xs: Vec<f64> = out.points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 12.0, 24.0, 36.0]);
    }

    #[test]
    fn metadata_survives_simplification() {
        let stroke: Stroke = (0..20)
            .map(|i| Point::new(i as f64, 0.0).with_color("#4ecdc4").with_size(3.0))
            .collect();
        let out = simplify(&stroke, Algorithm::Corridor, QualityTier::High);
        assert_eq!(out.len(), 2);
        assert!(out.points.iter().all(|p| p.color.as_deref() == Some("#4ecdc4")));
    }

    #[test]
    fn drawing_simplification_preserves_stroke_order() {
        let drawing = Drawing::new(vec![wave(50), Stroke::default(), wave(7)]);
        let out = simplify_drawing(&drawing, Algorithm::MinArea, QualityTier::Medium);
        assert_eq!(out.stroke_count(), 3);
        assert!(out.strokes[1].is_empty());
        assert_eq!(out.strokes[0].first(), drawing.strokes[0].first());
        assert_eq!(out.strokes[2].last(), drawing.strokes[2].last());
    }

    #[test]
    fn names_parse_including_legacy_aliases() {
        assert_eq!("douglas-peucker".parse::<Algorithm>().unwrap(), Algorithm::Corridor);
        assert_eq!("Visvalingam".parse::<Algorithm>().unwrap(), Algorithm::MinArea);
        assert_eq!("none".parse::<Algorithm>().unwrap(), Algorithm::Decimate);
        assert!("spline".parse::<Algorithm>().is_err());
        assert_eq!("LOW".parse::<QualityTier>().unwrap(), QualityTier::Low);
    }
}
