//! The single error shape every API failure is normalized into.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Message used when neither the server nor the transport said anything useful.
pub const FALLBACK_MESSAGE: &str = "Request failed";

/// Where a failure originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    /// No response arrived: timeout, refused connection, DNS failure.
    Transport,
    /// The server answered with a non-success status.
    Server,
    /// A success response did not match the expected schema.
    Parse,
    /// Anything else.
    Unknown,
}

/// Normalized API failure. Displays as its human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct ApiError {
    /// Failure category.
    pub kind: ApiErrorKind,
    /// Human-readable message, chosen by [`extract_message`] precedence.
    pub message: String,
    /// HTTP status, when a response was received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ApiError {
    /// A failure with no HTTP response.
    pub fn transport(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self {
            kind: ApiErrorKind::Transport,
            message: extract_message(None, Some(&detail)),
            status: None,
        }
    }

    /// A non-success response; the body is searched for `message`/`error`.
    #[must_use]
    pub fn server(status: u16, body: &str) -> Self {
        let parsed = serde_json::from_str::<Value>(body).ok();
        let transport = format!("Request failed with status code {status}");
        Self {
            kind: ApiErrorKind::Server,
            message: extract_message(parsed.as_ref(), Some(&transport)),
            status: Some(status),
        }
    }

    /// A success response whose body could not be parsed.
    pub fn parse(detail: impl Into<String>) -> Self {
        Self { kind: ApiErrorKind::Parse, message: detail.into(), status: None }
    }

    /// Any other failure.
    pub fn unknown(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self {
            kind: ApiErrorKind::Unknown,
            message: extract_message(None, Some(&detail)),
            status: None,
        }
    }
}

/// Picks the message to surface: server `message`, then server `error`,
/// then the transport text, then [`FALLBACK_MESSAGE`].
#[must_use]
pub fn extract_message(body: Option<&Value>, transport: Option<&str>) -> String {
    let field = |name: &str| {
        body.and_then(|b| b.get(name))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    };
    field("message")
        .or_else(|| field("error"))
        .or_else(|| transport.map(str::trim).filter(|s| !s.is_empty()).map(String::from))
        .unwrap_or_else(|| FALLBACK_MESSAGE.to_string())
}
