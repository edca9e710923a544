//! API error types.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Message shown when the backend could not be reached at all.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";

/// Errors returned by [`ApiClient`](super::ApiClient) calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The bearer token was missing, invalid or expired
    #[error("Unauthorized: {}", detail.as_deref().unwrap_or("invalid or expired token"))]
    Unauthorized { detail: Option<String> },

    /// The server answered with a non-success status
    #[error("Request rejected ({status}): {}", detail.as_deref().unwrap_or("no detail"))]
    Rejected {
        status: StatusCode,
        detail: Option<String>,
    },

    /// The response body did not match the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Server-provided `detail` message, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { detail } | ApiError::Rejected { detail, .. } => {
                detail.as_deref()
            }
            _ => None,
        }
    }

    /// Message to surface to the user for this failure.
    ///
    /// Prefers the server's own `detail`; transport failures get a fixed
    /// network message; everything else falls back to the call site's text.
    pub fn toast_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Network(_) => NETWORK_ERROR_MESSAGE.to_string(),
            _ => self.detail().unwrap_or(fallback).to_string(),
        }
    }

    /// Whether this failure means the session token is no longer usable.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// Build an error from a non-success status and raw body text.
    pub(crate) fn from_status(status: StatusCode, body: &str) -> Self {
        let detail = parse_detail(body);
        if status == StatusCode::UNAUTHORIZED {
            ApiError::Unauthorized { detail }
        } else {
            ApiError::Rejected { status, detail }
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err)
        }
    }
}

/// FastAPI error envelope: `detail` is a string for `HTTPException` and a
/// list of `{loc, msg, type}` objects for request validation failures.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: DetailField,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DetailField {
    Message(String),
    Issues(Vec<ValidationIssue>),
}

#[derive(Debug, Deserialize)]
struct ValidationIssue {
    msg: String,
}

fn parse_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    let detail = match parsed.detail {
        DetailField::Message(msg) => msg,
        DetailField::Issues(issues) => issues
            .into_iter()
            .map(|issue| issue.msg)
            .collect::<Vec<_>>()
            .join("; "),
    };
    (!detail.is_empty()).then_some(detail)
}

/// Result type for API calls
pub type ApiResult<T> = Result<T, ApiError>;
