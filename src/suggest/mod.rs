//! Client side of the external handwriting-suggestion service.
//!
//! The service is opaque: we send ink (per-stroke parallel x/y/time
//! arrays) and get back ranked names. Any failure degrades to an empty
//! list plus a status the UI can show; nothing here returns an error to
//! the caller of [`fetch_external_suggestions`].

#[cfg(feature = "http")]
pub mod http;

use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::SuggestConfig;
use crate::error::SuggestError;
use crate::stroke::Stroke;

#[cfg(feature = "http")]
pub use http::HttpSuggestionSource;

/// One external guess.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub name: String,
    pub confidence: f64,
}

/// Canvas size the ink was captured on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WritingGuide {
    pub width: u32,
    pub height: u32,
}

/// `[xs, ys, ts]` for one stroke.
pub type InkStroke = [Vec<i64>; 3];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InkRequest {
    pub language: String,
    pub writing_guide: WritingGuide,
    pub ink: Vec<InkStroke>,
}

/// Request body for the suggestion endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionRequest {
    pub input_type: u32,
    pub requests: Vec<InkRequest>,
}

impl SuggestionRequest {
    /// Reshape strokes into ink. Strokes of fewer than two points are
    /// skipped; coordinates are rounded and a missing time becomes 0.
    pub fn from_strokes(strokes: &[Stroke], guide: WritingGuide) -> Self {
        let ink = strokes
            .iter()
            .filter(|s| !s.is_degenerate())
            .map(|s| {
                let xs = s.points.iter().map(|p| p.x.round() as i64).collect();
                let ys = s.points.iter().map(|p| p.y.round() as i64).collect();
                let ts = s
                    .points
                    .iter()
                    .map(|p| p.time.unwrap_or(0.0).round() as i64)
                    .collect();
                [xs, ys, ts]
            })
            .collect();
        Self {
            input_type: 0,
            requests: vec![InkRequest {
                language: "autodraw".to_string(),
                writing_guide: guide,
                ink,
            }],
        }
    }

    /// Whether there is any ink to send.
    pub fn has_ink(&self) -> bool {
        self.requests.iter().any(|r| !r.ink.is_empty())
    }
}

/// Pull ranked suggestions out of a service response.
///
/// Candidates sit at `data[1][0][1]`. Each entry is either a bare name or
/// a `[name, confidence]` pair; a missing or non-numeric confidence is 0.
/// Anything that does not fit that shape yields an empty list.
pub fn parse_response(data: &Value, limit: usize) -> Vec<Suggestion> {
    let Some(candidates) = data
        .get(1)
        .and_then(|v| v.get(0))
        .and_then(|v| v.get(1))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    candidates
        .iter()
        .filter_map(|entry| match entry {
            Value::String(name) => Some(Suggestion {
                name: name.clone(),
                confidence: 0.0,
            }),
            Value::Array(pair) if pair.len() >= 2 => {
                let name = pair[0].as_str()?.to_string();
                let confidence = pair[1].as_f64().unwrap_or(0.0);
                Some(Suggestion { name, confidence })
            }
            _ => None,
        })
        .take(limit)
        .collect()
}

/// Anything that can answer a suggestion request.
pub trait SuggestionSource {
    fn suggest(
        &self,
        request: &SuggestionRequest,
    ) -> impl Future<Output = Result<Vec<Suggestion>, SuggestError>> + Send;
}

/// What the UI should show after a suggestion round trip.
#[derive(Debug, Clone, PartialEq)]
pub enum SuggestionStatus {
    Ready,
    /// Nothing drawn yet (or only single-point strokes).
    NoStrokes,
    /// The service failed; the message is for display.
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionOutcome {
    pub suggestions: Vec<Suggestion>,
    pub status: SuggestionStatus,
}

impl SuggestionOutcome {
    fn empty(status: SuggestionStatus) -> Self {
        Self {
            suggestions: Vec::new(),
            status,
        }
    }
}

/// Ask `source` for suggestions, never failing.
///
/// The whole round trip is bounded by `config.timeout_ms`; errors and
/// timeouts are logged and reported as [`SuggestionStatus::Unavailable`].
pub async fn fetch_external_suggestions<S: SuggestionSource>(
    source: &S,
    strokes: &[Stroke],
    config: &SuggestConfig,
) -> SuggestionOutcome {
    let guide = WritingGuide {
        width: config.canvas_width,
        height: config.canvas_height,
    };
    let request = SuggestionRequest::from_strokes(strokes, guide);
    if !request.has_ink() {
        return SuggestionOutcome::empty(SuggestionStatus::NoStrokes);
    }

    let result = match tokio::time::timeout(config.timeout(), source.suggest(&request)).await {
        Ok(result) => result,
        Err(_) => Err(SuggestError::Timeout(config.timeout_ms)),
    };

    match result {
        Ok(mut suggestions) => {
            suggestions.truncate(config.max_suggestions);
            tracing::debug!(count = suggestions.len(), "received suggestions");
            SuggestionOutcome {
                suggestions,
                status: SuggestionStatus::Ready,
            }
        }
        Err(err) => {
            tracing::warn!("suggestion request failed: {err}");
            SuggestionOutcome::empty(SuggestionStatus::Unavailable(format!(
                "Could not get suggestions: {err}"
            )))
        }
    }
}
