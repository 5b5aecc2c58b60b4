//! inkshape: freehand sketch strokes → simplified polylines and shape guesses.
//!
//! Simplifies dense pointer strokes, describes the drawing with a handful
//! of global features, guesses what was drawn from a fixed rule table,
//! and optionally asks an external handwriting service for suggestions.
//!
//! # Example
//!
//! ```
//! use inkshape::{classify_with, simplify, Algorithm, ClassifierConfig, Drawing, NoJitter, Point, QualityTier, Stroke};
//!
//! let stroke: Stroke = (0..=72)
//!     .map(|i| {
//!         let a = (i as f64 * 5.0).to_radians();
//!         Point::new(400.0 + 100.0 * a.cos(), 300.0 + 100.0 * a.sin())
//!     })
//!     .collect();
//! let simplified = simplify(&stroke, Algorithm::Corridor, QualityTier::Medium);
//! assert!(simplified.len() < stroke.len());
//!
//! let drawing = Drawing::new(vec![stroke]);
//! let guesses = classify_with(&drawing, &ClassifierConfig::default(), &mut NoJitter);
//! assert_eq!(guesses[0].label.as_str(), "circle");
//! ```

#![forbid(unsafe_code)]

pub mod classify;
pub mod config;
pub mod error;
pub mod features;
pub mod geom;
pub mod render;
pub mod session;
pub mod simplify;
pub mod stencil;
pub mod stroke;
pub mod suggest;

// Re-export kurbo so callers get the same `Point`/`Rect` used by
// `Descriptor::bounds` and the stencil API.
pub use kurbo;

pub use classify::{
    classify, classify_descriptor, classify_with, top_predictions, Jitter, NoJitter, Prediction,
    ShapeLabel, UniformJitter,
};
pub use config::{ClassifierConfig, PipelineConfig, SessionConfig, SuggestConfig};
pub use error::{InkError, SuggestError};
pub use features::{extract_features, Descriptor};
pub use session::{Debounce, Mode, Session};
pub use simplify::{simplify, simplify_drawing, Algorithm, QualityTier, Tolerance};
pub use stencil::{stencil, Brush};
pub use stroke::{Drawing, Point, Stroke};
pub use suggest::{
    fetch_external_suggestions, Suggestion, SuggestionOutcome, SuggestionSource, SuggestionStatus,
};

#[cfg(feature = "http")]
pub use suggest::HttpSuggestionSource;
