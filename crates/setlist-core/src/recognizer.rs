//! Segment recognition through an audio-fingerprinting service
//!
//! The pipeline only sees the [`Recognizer`] trait. [`AuddRecognizer`]
//! uploads segments to an AudD-compatible HTTP endpoint.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

use crate::error::RecognizeError;

/// Default AudD recognition endpoint
pub const AUDD_API_URL: &str = "https://api.audd.io/";

/// Identified track for one segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recognition {
    pub title: String,
    pub artist: String,
}

/// Audio-fingerprinting collaborator
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Identify the audio in `segment`.
    ///
    /// `Ok(None)` means the service answered but found no match.
    async fn recognize(&self, segment: &Path) -> Result<Option<Recognition>, RecognizeError>;
}

/// Client for an AudD-compatible recognition API
pub struct AuddRecognizer {
    http_client: Client,
    endpoint: String,
    api_token: Option<String>,
}

impl AuddRecognizer {
    pub fn new(endpoint: impl Into<String>, api_token: Option<String>, timeout: Duration) -> Result<Self, RecognizeError> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            endpoint: endpoint.into(),
            api_token,
        })
    }
}

#[async_trait]
impl Recognizer for AuddRecognizer {
    async fn recognize(&self, segment: &Path) -> Result<Option<Recognition>, RecognizeError> {
        let bytes = tokio::fs::read(segment)
            .await
            .map_err(|source| RecognizeError::Segment {
                path: segment.display().to_string(),
                source,
            })?;

        let file_name = segment
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("segment.wav")
            .to_string();

        let mut form = Form::new().part("file", Part::bytes(bytes).file_name(file_name));
        if let Some(token) = &self.api_token {
            form = form.text("api_token", token.clone());
        }

        let response = self
            .http_client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        let body: Value = response.json().await?;
        parse_audd_response(&body)
    }
}

/// Interpret an AudD response body
///
/// `{"status":"success","result":null}` is a clean miss; a result lacking a
/// title or artist is treated the same way.
pub fn parse_audd_response(body: &Value) -> Result<Option<Recognition>, RecognizeError> {
    match body.get("status").and_then(Value::as_str) {
        Some("success") => {}
        _ => {
            let message = body
                .get("error")
                .and_then(|e| e.get("error_message"))
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            return Err(RecognizeError::Service(message.to_string()));
        }
    }

    let Some(result) = body.get("result").filter(|r| !r.is_null()) else {
        return Ok(None);
    };

    let title = result.get("title").and_then(Value::as_str);
    let artist = result.get("artist").and_then(Value::as_str);

    Ok(match (title, artist) {
        (Some(title), Some(artist)) => Some(Recognition {
            title: title.to_string(),
            artist: artist.to_string(),
        }),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_match() {
        let body = json!({
            "status": "success",
            "result": {"artist": "Boards of Canada", "title": "Roygbiv", "album": "Music Has the Right to Children"}
        });
        let recognition = parse_audd_response(&body).unwrap().unwrap();
        assert_eq!(recognition.title, "Roygbiv");
        assert_eq!(recognition.artist, "Boards of Canada");
    }

    #[test]
    fn test_parse_no_match() {
        let body = json!({"status": "success", "result": null});
        assert_eq!(parse_audd_response(&body).unwrap(), None);
    }

    #[test]
    fn test_parse_partial_result_is_a_miss() {
        let body = json!({"status": "success", "result": {"title": "Only title"}});
        assert_eq!(parse_audd_response(&body).unwrap(), None);
    }

    #[test]
    fn test_parse_service_error() {
        let body = json!({
            "status": "error",
            "error": {"error_code": 901, "error_message": "Recognition failed: no api_token"}
        });
        match parse_audd_response(&body) {
            Err(RecognizeError::Service(msg)) => assert!(msg.contains("no api_token")),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
