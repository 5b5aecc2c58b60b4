use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::InkError;
use crate::simplify::{Algorithm, QualityTier};

/// All pipeline parameters in one struct.
/// Serializable (for presets on disk) and adjustable at runtime
/// (for UI controls). Missing TOML keys fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    // -- Simplification --
    /// Polyline simplifier applied to strokes before visualization.
    pub algorithm: Algorithm,
    /// Tolerance tier for the simplifier.
    pub quality: QualityTier,

    // -- Stages --
    pub classifier: ClassifierConfig,
    pub suggest: SuggestConfig,
    pub session: SessionConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Corridor,
            quality: QualityTier::Medium,
            classifier: ClassifierConfig::default(),
            suggest: SuggestConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load a TOML preset.
    pub fn load(path: &Path) -> Result<Self, InkError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Parse and validate a TOML preset.
    pub fn from_toml(text: &str) -> Result<Self, InkError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), InkError> {
        self.classifier.validate()
    }
}

/// Shape classifier post-processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Half-width of the uniform confidence jitter. 0 disables it.
    pub jitter_amplitude: f64,
    /// Confidence floor after jitter.
    pub min_confidence: f64,
    /// Confidence ceiling after jitter.
    pub max_confidence: f64,
    /// How many predictions a UI shows.
    pub max_predictions: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            jitter_amplitude: 5.0,
            min_confidence: 30.0,
            max_confidence: 98.0,
            max_predictions: 5,
        }
    }
}

impl ClassifierConfig {
    /// Reject settings the jitter and clamp steps cannot honour.
    pub fn validate(&self) -> Result<(), InkError> {
        if !(self.jitter_amplitude.is_finite() && self.jitter_amplitude >= 0.0) {
            return Err(InkError::InvalidConfig(format!(
                "classifier.jitter_amplitude must be finite and non-negative, got {}",
                self.jitter_amplitude
            )));
        }
        if !(self.min_confidence.is_finite() && self.max_confidence.is_finite()) {
            return Err(InkError::InvalidConfig(
                "classifier confidence bounds must be finite".to_string(),
            ));
        }
        if self.min_confidence > self.max_confidence {
            return Err(InkError::InvalidConfig(format!(
                "classifier.min_confidence ({}) exceeds max_confidence ({})",
                self.min_confidence, self.max_confidence
            )));
        }
        Ok(())
    }
}

/// External handwriting-suggestion service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestConfig {
    pub endpoint: String,
    /// Writing-guide width sent with each request (canvas pixels).
    pub canvas_width: u32,
    /// Writing-guide height sent with each request (canvas pixels).
    pub canvas_height: u32,
    /// Suggestions kept from a response.
    pub max_suggestions: usize,
    /// Whole-request budget, including the blocking HTTP round trip.
    pub timeout_ms: u64,
    pub connect_timeout_ms: u64,
}

pub const DEFAULT_SUGGEST_ENDPOINT: &str =
    "https://inputtools.google.com/request?ime=handwriting&app=autodraw&dbg=1&cs=1&oe=UTF-8";

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SUGGEST_ENDPOINT.to_string(),
            canvas_width: 800,
            canvas_height: 600,
            max_suggestions: 8,
            timeout_ms: 5_000,
            connect_timeout_ms: 3_000,
        }
    }
}

impl SuggestConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

/// Debounce delays for the interactive session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub classify_debounce_ms: u64,
    pub suggest_debounce_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            classify_debounce_ms: 300,
            suggest_debounce_ms: 800,
        }
    }
}
