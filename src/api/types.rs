//! Gateway request options and errors.

use serde_json::Value;

pub const FALLBACK_ERROR_MESSAGE: &str = "An error occurred";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection.";

// =============================================================================
// ERROR
// =============================================================================

/// Transport-level failure. Application-level failures arrive as
/// `success: false` envelopes instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The backend answered with a non-success HTTP status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// No response was received.
    #[error("{0}")]
    Network(String),

    /// A success response body could not be decoded.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// The request could not be built (e.g. a header value is not encodable).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Message suitable for inline display.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Status { message, .. } | Self::Network(message) => message.clone(),
            other => other.to_string(),
        }
    }

    /// HTTP status, when the backend responded.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Build a status error from a parsed (or unparseable) error body.
    #[must_use]
    pub fn from_error_body(status: u16, body: Option<&Value>) -> Self {
        let message = body
            .and_then(|b| b.get("message"))
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or(FALLBACK_ERROR_MESSAGE)
            .to_owned();
        Self::Status { status, message }
    }
}

// =============================================================================
// REQUEST OPTIONS
// =============================================================================

/// Caller-supplied headers and JSON body for one gateway call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RequestOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn bearer(self, token: &str) -> Self {
        self.header("Authorization", format!("Bearer {token}"))
    }

    /// Last value set for `name` (case-insensitive).
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .rev()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
