//! Shared error type across reporting crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Counter store is down or did not answer in time.
    StoreUnavailable,
    /// Missing or unrecognized `event`.
    InvalidEvent,
    /// Request body is not a JSON object.
    BadRequest,
    /// Server-side failure (bad config, unexpected state).
    Internal,
}

impl ClientCode {
    /// String representation used in logs and metrics labels.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::StoreUnavailable => "STORE_UNAVAILABLE",
            ClientCode::InvalidEvent => "INVALID_EVENT",
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::Internal => "INTERNAL",
        }
    }

    /// Message placed in the `error` field of JSON responses.
    pub fn public_message(self) -> &'static str {
        match self {
            ClientCode::StoreUnavailable => "Redis service not available",
            ClientCode::InvalidEvent => "Invalid event type",
            ClientCode::BadRequest => "Invalid request body",
            ClientCode::Internal => "Internal server error",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Unified error type used by core and service.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("invalid event type")]
    InvalidEvent,
    #[error("malformed body: {0}")]
    MalformedBody(String),
    #[error("config: {0}")]
    Config(String),
}

impl ReportError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            ReportError::StoreUnavailable(_) => ClientCode::StoreUnavailable,
            ReportError::InvalidEvent => ClientCode::InvalidEvent,
            ReportError::MalformedBody(_) => ClientCode::BadRequest,
            ReportError::Config(_) => ClientCode::Internal,
        }
    }
}
