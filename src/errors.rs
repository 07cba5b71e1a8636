//! Typed error hierarchy for the admin console.
//!
//! Two enums cover the two layers:
//! - `GatewayError`: everything the remote data gateway can fail with
//! - `ConsoleError`: failures of a page-level user action

use thiserror::Error;

/// Which stage of a gateway call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorKind {
    /// No response was obtained (connection refused, DNS, timeout).
    Transport,
    /// The backend answered with a non-2xx status.
    Status,
    /// A 2xx body could not be decoded into the expected shape.
    Decode,
}

/// The single error-result type returned by the gateway.
///
/// `message` is always human-readable: the backend's `{"error": ...}` text
/// when it sent one, otherwise `HTTP <status>` or the transport failure.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct GatewayError {
    pub kind: GatewayErrorKind,
    pub message: String,
    pub status_code: Option<u16>,
}

impl GatewayError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: GatewayErrorKind::Transport,
            message: message.into(),
            status_code: None,
        }
    }

    pub fn status(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            kind: GatewayErrorKind::Status,
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            kind: GatewayErrorKind::Decode,
            message: message.into(),
            status_code: None,
        }
    }

    /// Build a status error from a raw error body.
    ///
    /// Uses the `error` field of a JSON body when present, otherwise falls
    /// back to `HTTP <status>`.
    pub fn from_error_body(status_code: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("HTTP {}", status_code));
        Self::status(status_code, message)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status_code == Some(401)
    }
}

/// Errors from a page-level action (create, update, delete, refresh).
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("No {0} selected")]
    NoSelection(&'static str),
}

impl ConsoleError {
    /// Status code of the underlying HTTP failure, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ConsoleError::Gateway(e) => e.status_code,
            _ => None,
        }
    }
}
