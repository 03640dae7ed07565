//! Remote document access through a content API.
//!
//! The record store talks to the remote only through [`ContentApi`], which
//! fetches and replaces a whole file identified by a repository path. The
//! GitHub contents API is the production backend; [`MemoryContentApi`] serves
//! the same contract in-process.

mod document;
mod github;
mod memory;

pub use document::{decode_document, encode_document, RemoteDocument};
pub use github::GitHubContentsClient;
pub use memory::MemoryContentApi;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A stored file as returned by the content API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    /// Base64 payload, possibly wrapped across lines.
    pub content: String,
    /// Version token of this revision.
    pub sha: String,
}

/// Body of a create-or-replace request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PutFileRequest {
    pub message: String,
    /// Base64 payload.
    pub content: String,
    /// Version token being replaced; omitted when creating the file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Invalid remote configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Remote HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Remote unavailable: {0}")]
    Unavailable(String),
    #[error("Remote document not found: {0}")]
    NotFound(String),
    #[error("Remote API error: {message}")]
    Api { status: u16, message: String },
    #[error("Invalid remote payload: {0}")]
    InvalidPayload(String),
    #[error("Failed to encode remote payload: {0}")]
    Encode(String),
}

impl RemoteError {
    /// True when the API answered with a non-success status.
    ///
    /// Such answers mean "no usable revision" while looking up a version
    /// token, unlike transport or payload failures.
    pub const fn is_status_response(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Api { .. })
    }
}

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Whole-file access to a versioned document store.
#[async_trait]
pub trait ContentApi: Send + Sync {
    /// Fetch the current revision of `path`.
    ///
    /// A missing file is reported as [`RemoteError::NotFound`].
    async fn get_file(&self, path: &str) -> RemoteResult<RemoteFile>;

    /// Fetch only the version token of the current revision of `path`.
    ///
    /// Succeeds whatever form the file body takes. A missing file is reported
    /// as [`RemoteError::NotFound`].
    async fn get_version(&self, path: &str) -> RemoteResult<String>;

    /// Create or replace `path`.
    async fn put_file(&self, path: &str, request: &PutFileRequest) -> RemoteResult<()>;
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Map a response status to the error it stands for, if any.
fn status_error(path: &str, status: StatusCode, body: &str) -> Option<RemoteError> {
    if status == StatusCode::NOT_FOUND {
        return Some(RemoteError::NotFound(path.to_string()));
    }
    if status.is_success() {
        return None;
    }
    Some(RemoteError::Api {
        status: status.as_u16(),
        message: parse_api_error(status, body),
    })
}

/// Decode a contents response body, failing on any non-success status.
fn parse_response<T: DeserializeOwned>(
    path: &str,
    status: StatusCode,
    body: &str,
) -> RemoteResult<T> {
    if let Some(error) = status_error(path, status, body) {
        return Err(error);
    }
    serde_json::from_str(body).map_err(|error| {
        RemoteError::InvalidPayload(format!("unreadable contents response: {error}"))
    })
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.error) {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = crate::util::compact_text(body);
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_api_error_prefers_json_message() {
        let message = parse_api_error(
            StatusCode::CONFLICT,
            r#"{"message":"submissions.json does not match abc","documentation_url":"https://docs.github.com"}"#,
        );
        assert_eq!(message, "submissions.json does not match abc (409)");
    }

    #[test]
    fn parse_api_error_falls_back_to_body_or_status() {
        assert_eq!(
            parse_api_error(StatusCode::BAD_GATEWAY, " upstream down "),
            "upstream down (502)"
        );
        assert_eq!(parse_api_error(StatusCode::UNAUTHORIZED, ""), "HTTP 401");
    }

    #[derive(Debug, Deserialize)]
    struct Sha {
        sha: String,
    }

    #[test]
    fn not_found_status_maps_to_not_found() {
        let err = parse_response::<Sha>(
            "submissions.json",
            StatusCode::NOT_FOUND,
            r#"{"message":"Not Found"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, RemoteError::NotFound(path) if path == "submissions.json"));
    }

    #[test]
    fn other_failure_statuses_map_to_api_errors() {
        let err = parse_response::<Sha>(
            "submissions.json",
            StatusCode::UNAUTHORIZED,
            r#"{"message":"Bad credentials"}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RemoteError::Api { status: 401, ref message } if message == "Bad credentials (401)"
        ));
        assert!(err.is_status_response());

        let err = parse_response::<Sha>("submissions.json", StatusCode::BAD_GATEWAY, "")
            .unwrap_err();
        assert!(matches!(err, RemoteError::Api { status: 502, .. }));
    }

    #[test]
    fn success_status_decodes_body() {
        let parsed: Sha =
            parse_response("submissions.json", StatusCode::OK, r#"{"sha":"abc123"}"#).unwrap();
        assert_eq!(parsed.sha, "abc123");
        assert!(status_error("submissions.json", StatusCode::CREATED, "").is_none());

        let err = parse_response::<Sha>("submissions.json", StatusCode::OK, "<html>")
            .unwrap_err();
        assert!(matches!(err, RemoteError::InvalidPayload(_)));
        assert!(!err.is_status_response());
    }

    #[test]
    fn put_request_omits_missing_sha() {
        let request = PutFileRequest {
            message: "Update submissions data".to_string(),
            content: "W10=".to_string(),
            sha: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("sha").is_none());
        assert_eq!(json["content"], "W10=");
    }

    #[test]
    fn status_responses_are_distinguished_from_transport_failures() {
        assert!(RemoteError::NotFound("a".to_string()).is_status_response());
        assert!(RemoteError::Api {
            status: 500,
            message: "boom".to_string()
        }
        .is_status_response());
        assert!(!RemoteError::Unavailable("offline".to_string()).is_status_response());
        assert!(!RemoteError::InvalidPayload("bad".to_string()).is_status_response());
    }
}
