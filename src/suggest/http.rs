//! Blocking HTTP transport for the suggestion service.
//!
//! `ureq` does the round trip on tokio's blocking pool so the async
//! boundary stays non-blocking for the caller.

use std::sync::Arc;

use serde_json::Value;

use crate::config::SuggestConfig;
use crate::error::SuggestError;

use super::{parse_response, Suggestion, SuggestionRequest, SuggestionSource};

/// Upper bound on a response body we are willing to decode.
const MAX_RESPONSE_BYTES: u64 = 1024 * 1024;

/// POSTs ink as JSON to a configured endpoint.
#[derive(Clone)]
pub struct HttpSuggestionSource {
    agent: ureq::Agent,
    endpoint: Arc<str>,
    limit: usize,
}

impl HttpSuggestionSource {
    pub fn new(config: &SuggestConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(config.connect_timeout())
            .timeout_read(config.timeout())
            .timeout_write(config.timeout())
            .build();
        Self {
            agent,
            endpoint: Arc::from(config.endpoint.as_str()),
            limit: config.max_suggestions,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn post(&self, request: &SuggestionRequest) -> Result<Vec<Suggestion>, SuggestError> {
        let response = self
            .agent
            .post(&self.endpoint)
            .set("Content-Type", "application/json")
            .send_json(request)
            .map_err(|err| match err {
                ureq::Error::Status(code, _) => SuggestError::Status(code),
                other => SuggestError::Http(other.to_string()),
            })?;
        if let Some(length) = response
            .header("Content-Length")
            .and_then(|v| v.parse::<u64>().ok())
        {
            if length > MAX_RESPONSE_BYTES {
                return Err(SuggestError::Decode(format!("response too large: {length} bytes")));
            }
        }
        let data: Value = response
            .into_json()
            .map_err(|e| SuggestError::Decode(e.to_string()))?;
        Ok(parse_response(&data, self.limit))
    }
}

impl std::fmt::Debug for HttpSuggestionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSuggestionSource")
            .field("endpoint", &self.endpoint)
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}

impl SuggestionSource for HttpSuggestionSource {
    async fn suggest(&self, request: &SuggestionRequest) -> Result<Vec<Suggestion>, SuggestError> {
        let source = self.clone();
        let request = request.clone();
        let started = std::time::Instant::now();
        let result = tokio::task::spawn_blocking(move || source.post(&request))
            .await
            .map_err(|e| SuggestError::Task(e.to_string()))?;
        tracing::debug!(
            endpoint = %self.endpoint,
            elapsed_ms = started.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "suggestion round trip"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::{Point, Stroke};
    use crate::suggest::{fetch_external_suggestions, SuggestionStatus};
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    fn serve_once(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                read_request(&mut stream);
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.flush();
            }
        });
        format!("http://{addr}/request")
    }

    /// Drain headers and a `Content-Length` body so the socket closes cleanly.
    fn read_request(stream: &mut std::net::TcpStream) {
        let mut data = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let Ok(n) = stream.read(&mut buf) else { return };
            if n == 0 {
                return;
            }
            data.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&data);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if data.len() >= end + 4 + length {
                    return;
                }
            }
        }
    }

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    fn strokes() -> Vec<Stroke> {
        vec![vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)].into()]
    }

    fn config(endpoint: String) -> SuggestConfig {
        SuggestConfig {
            endpoint,
            timeout_ms: 2_000,
            ..SuggestConfig::default()
        }
    }

    #[tokio::test]
    async fn parses_a_live_response() {
        let body = r#"["SUCCESS",[["id",["cat","dog"],[],{}]]]"#;
        let endpoint = serve_once(http_response("200 OK", body));
        let config = config(endpoint);
        let source = HttpSuggestionSource::new(&config);
        let out = fetch_external_suggestions(&source, &strokes(), &config).await;
        assert_eq!(out.status, SuggestionStatus::Ready);
        let names: Vec<&str> = out.suggestions.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["cat", "dog"]);
    }

    #[tokio::test]
    async fn server_error_becomes_status() {
        let endpoint = serve_once(http_response("500 Internal Server Error", "{}"));
        let config = config(endpoint);
        let source = HttpSuggestionSource::new(&config);
        let request = SuggestionRequest::from_strokes(
            &strokes(),
            super::super::WritingGuide { width: 10, height: 10 },
        );
        let err = source.suggest(&request).await.unwrap_err();
        assert!(matches!(err, SuggestError::Status(500)));
    }

    #[tokio::test]
    async fn unreachable_endpoint_degrades() {
        // Bind then drop to get a port nobody listens on.
        let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
        let config = config(format!("http://127.0.0.1:{port}/request"));
        let source = HttpSuggestionSource::new(&config);
        let out = fetch_external_suggestions(&source, &strokes(), &config).await;
        assert!(out.suggestions.is_empty());
        assert!(matches!(out.status, SuggestionStatus::Unavailable(_)));
    }
}
