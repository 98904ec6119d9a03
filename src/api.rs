//! Client for a log server's `/api/log` endpoint.

use crate::model::{ErrorResponse, LogRequest, LogResponse};
use reqwest::Url;
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;

/// Message used when a failed reply carries no `error` field.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Failed to load file";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid server URL {url:?}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },

    #[error("invalid response body: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

fn build_log_url(base: &str) -> ApiResult<Url> {
    let invalid = |message: String| ApiError::InvalidUrl {
        url: base.to_string(),
        message,
    };
    let url = Url::parse(base).map_err(|e| invalid(e.to_string()))?;
    url.join("/api/log").map_err(|e| invalid(e.to_string()))
}

/// Interpret an `/api/log` reply.
///
/// Failed replies surface the server's `error` message, falling back to
/// [`DEFAULT_FAILURE_MESSAGE`] when the body has none (or is not JSON).
pub fn parse_log_response(status: u16, success: bool, body: &str) -> ApiResult<LogResponse> {
    if !success {
        let message = serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .and_then(|e| e.error)
            .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());
        return Err(ApiError::Server { status, message });
    }
    Ok(serde_json::from_str(body)?)
}

/// Fetches a log file and its highlights from the server at `base`.
pub fn fetch_log(base: &str, path: &str) -> ApiResult<LogResponse> {
    let url = build_log_url(base)?;
    let body = serde_json::to_string(&LogRequest {
        path: path.to_string(),
    })?;

    let resp = reqwest::blocking::Client::new()
        .post(url)
        .header(CONTENT_TYPE, "application/json")
        .body(body)
        .send()?;

    let status = resp.status();
    let text = resp.text()?;
    parse_log_response(status.as_u16(), status.is_success(), &text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Highlight;

    #[test]
    fn build_log_url_uses_absolute_api_path() {
        let url = build_log_url("http://localhost:8000").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/log");

        let url = build_log_url("http://logs.example/viewer/").unwrap();
        assert_eq!(url.path(), "/api/log");
    }

    #[test]
    fn build_log_url_rejects_garbage() {
        assert!(matches!(
            build_log_url("not a url"),
            Err(ApiError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn success_body_parses() {
        let body = r#"{"content": "ERROR x\n", "highlights": {"error": [{"start": 0, "end": 5}], "all": []}, "file_path": "app.log"}"#;
        let resp = parse_log_response(200, true, body).unwrap();
        assert_eq!(resp.content, "ERROR x\n");
        assert_eq!(resp.file_path, "app.log");
        assert_eq!(resp.highlights["error"], vec![Highlight::new(0, 5)]);
    }

    #[test]
    fn failure_surfaces_server_message() {
        let err = parse_log_response(500, false, r#"{"error": "Error reading file"}"#).unwrap_err();
        match err {
            ApiError::Server { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Error reading file");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn failure_without_json_uses_default_message() {
        let err = parse_log_response(404, false, "<html>File not found</html>").unwrap_err();
        assert!(err.to_string().contains(DEFAULT_FAILURE_MESSAGE), "{err}");
    }

    #[test]
    fn malformed_success_body_is_a_json_error() {
        assert!(matches!(
            parse_log_response(200, true, r#"{"highlights": {}}"#),
            Err(ApiError::Json(_))
        ));
    }
}
