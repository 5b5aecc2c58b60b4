//! The shape rule table.
//!
//! Rules are evaluated independently, in table order, against the same
//! descriptor. Several may match. Thresholds are part of the observable
//! label contract; change them only together with the tests.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::features::Descriptor;

/// Labels the classifier can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeLabel {
    Circle,
    Square,
    Rectangle,
    Triangle,
    Line,
    Star,
    Heart,
    House,
    Car,
    Tree,
    Face,
    Flower,
    Sun,
    Cat,
    Fish,
    ComplexArt,
    Signature,
}

impl ShapeLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            ShapeLabel::Circle => "circle",
            ShapeLabel::Square => "square",
            ShapeLabel::Rectangle => "rectangle",
            ShapeLabel::Triangle => "triangle",
            ShapeLabel::Line => "line",
            ShapeLabel::Star => "star",
            ShapeLabel::Heart => "heart",
            ShapeLabel::House => "house",
            ShapeLabel::Car => "car",
            ShapeLabel::Tree => "tree",
            ShapeLabel::Face => "face",
            ShapeLabel::Flower => "flower",
            ShapeLabel::Sun => "sun",
            ShapeLabel::Cat => "cat",
            ShapeLabel::Fish => "fish",
            ShapeLabel::ComplexArt => "complex-art",
            ShapeLabel::Signature => "signature",
        }
    }

    /// Icon shown next to the label in a UI.
    pub fn emoji(self) -> &'static str {
        match self {
            ShapeLabel::Circle => "🔵",
            ShapeLabel::Square => "🟦",
            ShapeLabel::Rectangle => "📄",
            ShapeLabel::Triangle => "🔺",
            ShapeLabel::Line => "📏",
            ShapeLabel::Star => "⭐",
            ShapeLabel::Heart => "❤️",
            ShapeLabel::House => "🏠",
            ShapeLabel::Car => "🚗",
            ShapeLabel::Tree => "🌳",
            ShapeLabel::Face => "😊",
            ShapeLabel::Flower => "🌸",
            ShapeLabel::Sun => "☀️",
            ShapeLabel::Cat => "🐱",
            ShapeLabel::Fish => "🐠",
            ShapeLabel::ComplexArt => "🎨",
            ShapeLabel::Signature => "✍️",
        }
    }
}

impl fmt::Display for ShapeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl Serialize for ShapeLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// How a rule turns a match into a base confidence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Score {
    Fixed(f64),
    /// `base - variance / divisor`.
    VariancePenalty { base: f64, divisor: f64 },
}

impl Score {
    pub fn base(self, d: &Descriptor) -> f64 {
        match self {
            Score::Fixed(c) => c,
            Score::VariancePenalty { base, divisor } => base - d.variance / divisor,
        }
    }
}

/// One row of the table.
#[derive(Clone, Copy)]
pub struct Rule {
    pub label: ShapeLabel,
    pub score: Score,
    pub matches: fn(&Descriptor) -> bool,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("label", &self.label)
            .field("score", &self.score)
            .finish_non_exhaustive()
    }
}

fn strokes_between(d: &Descriptor, lo: usize, hi: usize) -> bool {
    (lo..=hi).contains(&d.stroke_count)
}

fn squareness(d: &Descriptor) -> f64 {
    (d.aspect_ratio - 1.0).abs()
}

/// All rules, in evaluation order.
pub static RULES: &[Rule] = &[
    Rule {
        label: ShapeLabel::Circle,
        score: Score::VariancePenalty { base: 95.0, divisor: 50.0 },
        matches: |d| d.stroke_count <= 2 && d.variance < 1000.0 && squareness(d) < 0.3,
    },
    Rule {
        label: ShapeLabel::Square,
        score: Score::Fixed(90.0),
        matches: |d| strokes_between(d, 3, 5) && squareness(d) < 0.2,
    },
    Rule {
        label: ShapeLabel::Rectangle,
        score: Score::Fixed(85.0),
        // Disjoint from the square band.
        matches: |d| {
            strokes_between(d, 3, 5)
                && !(squareness(d) < 0.2)
                && (d.aspect_ratio > 1.5 || d.aspect_ratio < 0.67)
        },
    },
    Rule {
        label: ShapeLabel::Triangle,
        score: Score::Fixed(80.0),
        matches: |d| strokes_between(d, 2, 4) && d.aspect_ratio > 0.5 && d.aspect_ratio < 2.0,
    },
    Rule {
        label: ShapeLabel::Line,
        score: Score::Fixed(90.0),
        matches: |d| d.stroke_count <= 2 && (d.aspect_ratio > 3.0 || d.aspect_ratio < 0.33),
    },
    Rule {
        label: ShapeLabel::Star,
        score: Score::Fixed(75.0),
        matches: |d| d.stroke_count >= 5 && d.variance > 2000.0,
    },
    Rule {
        label: ShapeLabel::Heart,
        score: Score::Fixed(70.0),
        matches: |d| strokes_between(d, 2, 4) && d.aspect_ratio > 0.8 && d.aspect_ratio < 1.3,
    },
    Rule {
        label: ShapeLabel::House,
        score: Score::Fixed(65.0),
        matches: |d| d.stroke_count >= 4 && d.aspect_ratio > 0.7 && d.aspect_ratio < 1.4,
    },
    Rule {
        label: ShapeLabel::Car,
        score: Score::Fixed(60.0),
        matches: |d| d.stroke_count >= 3 && d.aspect_ratio > 1.5,
    },
    Rule {
        label: ShapeLabel::Tree,
        score: Score::Fixed(65.0),
        matches: |d| d.stroke_count >= 3 && d.aspect_ratio < 0.8,
    },
    Rule {
        label: ShapeLabel::Face,
        score: Score::Fixed(70.0),
        matches: |d| d.stroke_count >= 3 && squareness(d) < 0.4 && d.variance < 2000.0,
    },
    Rule {
        label: ShapeLabel::Flower,
        score: Score::Fixed(65.0),
        matches: |d| d.stroke_count >= 4 && d.variance > 1500.0 && squareness(d) < 0.5,
    },
    Rule {
        label: ShapeLabel::Sun,
        score: Score::Fixed(60.0),
        matches: |d| d.stroke_count >= 5 && d.variance > 3000.0,
    },
    Rule {
        label: ShapeLabel::Cat,
        score: Score::Fixed(55.0),
        matches: |d| d.stroke_count >= 4 && d.aspect_ratio > 1.2,
    },
    Rule {
        label: ShapeLabel::Fish,
        score: Score::Fixed(60.0),
        matches: |d| strokes_between(d, 2, 4) && d.aspect_ratio > 1.5,
    },
    Rule {
        label: ShapeLabel::ComplexArt,
        score: Score::Fixed(80.0),
        matches: |d| d.stroke_count >= 10,
    },
    Rule {
        label: ShapeLabel::Signature,
        score: Score::Fixed(70.0),
        matches: |d| d.path_length > 2000.0,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Rect;

    fn descriptor(stroke_count: usize, aspect_ratio: f64, variance: f64, path_length: f64) -> Descriptor {
        Descriptor {
            bounds: Rect::ZERO,
            width: 0.0,
            height: 0.0,
            aspect_ratio,
            center_x: 0.0,
            center_y: 0.0,
            stroke_count,
            total_points: 100,
            avg_distance_from_center: 0.0,
            variance,
            path_length,
        }
    }

    fn labels(d: &Descriptor) -> Vec<ShapeLabel> {
        RULES.iter().filter(|r| (r.matches)(d)).map(|r| r.label).collect()
    }

    #[test]
    fn table_covers_every_label_once() {
        let mut seen: Vec<&str> = RULES.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(seen.len(), 17);
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 17);
    }

    #[test]
    fn rule_table_cases() {
        use ShapeLabel::*;
        let cases: &[(Descriptor, &[ShapeLabel])] = &[
            (descriptor(1, 1.0, 10.0, 600.0), &[Circle]),
            (descriptor(2, 1.0, 10.0, 600.0), &[Circle, Triangle, Heart]),
            (descriptor(4, 1.0, 10.0, 600.0), &[Square, Triangle, Heart, House, Face]),
            (descriptor(4, 2.5, 10.0, 600.0), &[Rectangle, Car, Cat, Fish]),
            (descriptor(3, 0.5, 10.0, 600.0), &[Rectangle, Tree]),
            (descriptor(2, 4.0, 5000.0, 500.0), &[Line, Fish]),
            (descriptor(6, 1.1, 3500.0, 900.0), &[House, Flower, Star, Sun]),
            (descriptor(12, 0.3, 100.0, 2500.0), &[Tree, ComplexArt, Signature]),
        ];
        for (d, expected) in cases {
            let mut got = labels(d);
            let mut want = expected.to_vec();
            got.sort_by_key(|l| l.as_str());
            want.sort_by_key(|l| l.as_str());
            assert_eq!(got, want, "descriptor {d:?}");
        }
    }

    #[test]
    fn square_and_rectangle_never_both_match() {
        for count in 0..12 {
            for step in 0..400 {
                let d = descriptor(count, step as f64 * 0.01, 0.0, 0.0);
                let l = labels(&d);
                assert!(!(l.contains(&ShapeLabel::Square) && l.contains(&ShapeLabel::Rectangle)));
            }
        }
    }

    #[test]
    fn nan_aspect_only_matches_aspect_free_rules() {
        let d = descriptor(12, f64::NAN, 3500.0, 2500.0);
        let mut got = labels(&d);
        got.sort_by_key(|l| l.as_str());
        assert_eq!(
            got,
            vec![ShapeLabel::ComplexArt, ShapeLabel::Signature, ShapeLabel::Star, ShapeLabel::Sun]
        );
    }

    #[test]
    fn infinite_aspect_counts_as_wide() {
        let got = labels(&descriptor(1, f64::INFINITY, 0.0, 100.0));
        assert_eq!(got, vec![ShapeLabel::Line]);
    }

    #[test]
    fn circle_score_pays_for_variance() {
        let d = descriptor(1, 1.0, 500.0, 0.0);
        assert_eq!(RULES[0].score.base(&d), 85.0);
    }
}
