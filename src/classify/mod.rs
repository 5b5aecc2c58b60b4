//! Rule-based shape guesses for a drawing.
//!
//! 1. Describe the drawing (see [`crate::features`])
//! 2. Evaluate every row of [`rules::RULES`] against the descriptor
//! 3. Jitter each matched confidence, clamp, and stable-sort descending

pub mod rules;

use rand::Rng;
use serde::Serialize;

use crate::config::ClassifierConfig;
use crate::features::{extract_features, Descriptor};
use crate::stroke::Drawing;

pub use rules::{Rule, Score, ShapeLabel, RULES};

/// A label with its (jittered, clamped) confidence in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub label: ShapeLabel,
    pub confidence: f64,
}

/// Source of confidence perturbation.
///
/// Returns a value in `[-amplitude, amplitude]`.
pub trait Jitter {
    fn sample(&mut self, amplitude: f64) -> f64;
}

/// No perturbation. Makes classification fully deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoJitter;

impl Jitter for NoJitter {
    fn sample(&mut self, _amplitude: f64) -> f64 {
        0.0
    }
}

/// Uniform perturbation drawn from any `rand` generator.
#[derive(Debug, Clone)]
pub struct UniformJitter<R> {
    rng: R,
}

impl<R: Rng> UniformJitter<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Jitter for UniformJitter<R> {
    fn sample(&mut self, amplitude: f64) -> f64 {
        if amplitude.is_finite() && amplitude > 0.0 {
            self.rng.random_range(-amplitude..=amplitude)
        } else {
            0.0
        }
    }
}

/// Classify with default settings and thread-local randomness.
///
/// Drawings with fewer than three points yield no predictions.
pub fn classify(drawing: &Drawing) -> Vec<Prediction> {
    classify_with(
        drawing,
        &ClassifierConfig::default(),
        &mut UniformJitter::new(rand::rng()),
    )
}

/// Classify with explicit settings and jitter source.
pub fn classify_with(
    drawing: &Drawing,
    config: &ClassifierConfig,
    jitter: &mut impl Jitter,
) -> Vec<Prediction> {
    match extract_features(drawing) {
        Some(descriptor) => classify_descriptor(&descriptor, config, jitter),
        None => Vec::new(),
    }
}

/// Run the rule table against an existing descriptor.
pub fn classify_descriptor(
    descriptor: &Descriptor,
    config: &ClassifierConfig,
    jitter: &mut impl Jitter,
) -> Vec<Prediction> {
    let mut predictions: Vec<Prediction> = RULES
        .iter()
        .filter(|rule| (rule.matches)(descriptor))
        .filter_map(|rule| {
            let base = rule.score.base(descriptor);
            if !base.is_finite() {
                tracing::debug!(label = %rule.label, base, "dropping non-finite score");
                return None;
            }
            // min > max resolves to max instead of panicking.
            let confidence = (base + jitter.sample(config.jitter_amplitude))
                .max(config.min_confidence)
                .min(config.max_confidence);
            tracing::trace!(label = %rule.label, base, confidence, "rule matched");
            Some(Prediction {
                label: rule.label,
                confidence,
            })
        })
        .collect();

    // Stable: ties keep rule order.
    predictions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    predictions
}

/// The first `config.max_predictions` entries, as a UI would show them.
pub fn top_predictions(mut predictions: Vec<Prediction>, config: &ClassifierConfig) -> Vec<Prediction> {
    predictions.truncate(config.max_predictions);
    predictions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::{Point, Stroke};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Always returns the same offset.
    struct Constant(f64);

    impl Jitter for Constant {
        fn sample(&mut self, _amplitude: f64) -> f64 {
            self.0
        }
    }

    fn square_outline() -> Drawing {
        // Four separate sides of a 100×100 square.
        let side = |(x0, y0): (f64, f64), (x1, y1): (f64, f64)| -> Stroke {
            (0..=10)
                .map(|i| {
                    let t = i as f64 / 10.0;
                    Point::new(x0 + (x1 - x0) * t, y0 + (y1 - y0) * t)
                })
                .collect()
        };
        Drawing::new(vec![
            side((0.0, 0.0), (100.0, 0.0)),
            side((100.0, 0.0), (100.0, 100.0)),
            side((100.0, 100.0), (0.0, 100.0)),
            side((0.0, 100.0), (0.0, 0.0)),
        ])
    }

    fn labels(predictions: &[Prediction]) -> Vec<ShapeLabel> {
        predictions.iter().map(|p| p.label).collect()
    }

    #[test]
    fn degenerate_drawings_yield_nothing() {
        assert!(classify(&Drawing::default()).is_empty());
        let two = Drawing::new(vec![vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)].into()]);
        assert!(classify(&two).is_empty());
    }

    #[test]
    fn unjittered_order_follows_base_then_rule_order() {
        let out = classify_with(&square_outline(), &ClassifierConfig::default(), &mut NoJitter);
        use ShapeLabel::*;
        // Base scores: square 90, triangle 80, heart 70, face 70, house 65.
        assert_eq!(labels(&out), vec![Square, Triangle, Heart, Face, House]);
        assert_eq!(out[0].confidence, 90.0);
    }

    #[test]
    fn unjittered_runs_are_identical() {
        let config = ClassifierConfig::default();
        let a = classify_with(&square_outline(), &config, &mut NoJitter);
        let b = classify_with(&square_outline(), &config, &mut NoJitter);
        assert_eq!(a, b);
    }

    #[test]
    fn jitter_keeps_label_set_and_bounds() {
        let config = ClassifierConfig::default();
        let mut expected = labels(&classify_with(&square_outline(), &config, &mut NoJitter));
        expected.sort_by_key(|l| l.as_str());

        let mut jitter = UniformJitter::new(StdRng::seed_from_u64(7));
        for _ in 0..50 {
            let out = classify_with(&square_outline(), &config, &mut jitter);
            let mut got = labels(&out);
            got.sort_by_key(|l| l.as_str());
            assert_eq!(got, expected);
            assert!(out.windows(2).all(|w| w[0].confidence >= w[1].confidence));
            assert!(out.iter().all(|p| (30.0..=98.0).contains(&p.confidence)));
        }
    }

    #[test]
    fn seeded_jitter_is_reproducible() {
        let config = ClassifierConfig::default();
        let a = classify_with(&square_outline(), &config, &mut UniformJitter::new(StdRng::seed_from_u64(42)));
        let b = classify_with(&square_outline(), &config, &mut UniformJitter::new(StdRng::seed_from_u64(42)));
        assert_eq!(a, b);
    }

    #[test]
    fn confidence_is_clamped() {
        let config = ClassifierConfig::default();
        let high = classify_with(&square_outline(), &config, &mut Constant(50.0));
        assert!(high.iter().all(|p| p.confidence == 98.0));
        // All tied at the ceiling: rule order decides.
        use ShapeLabel::*;
        assert_eq!(labels(&high), vec![Square, Triangle, Heart, House, Face]);

        let low = classify_with(&square_outline(), &config, &mut Constant(-80.0));
        assert!(low.iter().all(|p| p.confidence == 30.0));
    }

    #[test]
    fn top_predictions_truncates() {
        let config = ClassifierConfig {
            max_predictions: 2,
            ..ClassifierConfig::default()
        };
        let out = top_predictions(classify_with(&square_outline(), &config, &mut NoJitter), &config);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn unvalidated_bad_bounds_do_not_panic() {
        let config = ClassifierConfig {
            min_confidence: 99.0,
            jitter_amplitude: f64::INFINITY,
            ..ClassifierConfig::default()
        };
        assert!(config.validate().is_err());
        let mut jitter = UniformJitter::new(StdRng::seed_from_u64(3));
        let out = classify_with(&square_outline(), &config, &mut jitter);
        assert!(out.iter().all(|p| p.confidence == 98.0));
    }

    #[test]
    fn zero_amplitude_uniform_jitter_is_exact() {
        let mut jitter = UniformJitter::new(StdRng::seed_from_u64(1));
        assert_eq!(jitter.sample(0.0), 0.0);
        let v = jitter.sample(5.0);
        assert!((-5.0..=5.0).contains(&v));
    }
}
