use thiserror::Error;

/// Errors surfaced by the sketch pipeline.
///
/// Degenerate drawings are never errors; they produce empty results.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum InkError {
    #[error("tolerance must be finite and non-negative, got {0}")]
    InvalidTolerance(f64),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse drawing: {0}")]
    DrawingParse(#[from] serde_json::Error),

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("render failed: {0}")]
    Render(String),
}

/// Failures talking to the external suggestion service.
///
/// These stay inside the suggestion boundary and are reported as a status,
/// never propagated to callers of the core.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SuggestError {
    #[error("request failed: {0}")]
    Http(String),

    #[error("service answered with status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("request timed out after {0} ms")]
    Timeout(u64),

    #[error("background task failed: {0}")]
    Task(String),
}
