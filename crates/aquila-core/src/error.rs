//! Error types for Aquila request handling.
//!
//! Two layers of failure exist:
//!
//! - [`HttpError`] is a client-facing failure carrying an explicit HTTP
//!   status and message(s). Whatever it says is surfaced verbatim to the
//!   client at that status code.
//! - [`RouteError`] is what handlers return on the error path. It is either
//!   an [`HttpError`], or an unexpected failure whose detail must never reach
//!   the client (the adapter logs it and answers a generic 500).

use http::StatusCode;
use serde_json::{json, Value};
use thiserror::Error;

/// Client-facing message payload: one message or an ordered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorMessage {
    /// A single message.
    Single(String),
    /// An ordered list of messages (e.g. one per violated constraint).
    Many(Vec<String>),
}

impl std::fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single(message) => write!(f, "{message}"),
            Self::Many(messages) => write!(f, "{}", messages.join("; ")),
        }
    }
}

/// A failure that must be surfaced verbatim to the client.
///
/// # Example
///
/// ```
/// use aquila_core::HttpError;
/// use http::StatusCode;
///
/// let err = HttpError::new(StatusCode::BAD_REQUEST, "rating not found");
/// assert_eq!(err.status(), StatusCode::BAD_REQUEST);
/// assert_eq!(err.body()["message"], "rating not found");
/// ```
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{status}: {message}")]
pub struct HttpError {
    status: StatusCode,
    message: ErrorMessage,
}

impl HttpError {
    /// Creates an error with a single message.
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: ErrorMessage::Single(message.into()),
        }
    }

    /// Creates an error carrying an ordered list of messages.
    ///
    /// A list of exactly one message collapses to the single-message form so
    /// clients see a string rather than a one-element array.
    #[must_use]
    pub fn with_messages(status: StatusCode, mut messages: Vec<String>) -> Self {
        let message = if messages.len() == 1 {
            ErrorMessage::Single(messages.remove(0))
        } else {
            ErrorMessage::Many(messages)
        };
        Self { status, message }
    }

    /// Creates a 400 Bad Request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Creates a 401 Unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Returns the HTTP status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the message payload.
    #[must_use]
    pub fn message(&self) -> &ErrorMessage {
        &self.message
    }

    /// Renders the client-facing response body.
    #[must_use]
    pub fn body(&self) -> Value {
        match &self.message {
            ErrorMessage::Single(message) => json!({ "message": message }),
            ErrorMessage::Many(messages) => json!({ "message": messages }),
        }
    }
}

/// The error side of a route handler.
#[derive(Debug, Error)]
pub enum RouteError {
    /// A structured failure to surface to the client as-is.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Anything else. Logged server-side; the client sees a generic 500.
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl From<serde_json::Error> for RouteError {
    fn from(err: serde_json::Error) -> Self {
        Self::Unexpected(err.into())
    }
}
