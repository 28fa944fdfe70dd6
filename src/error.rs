//! Error types for objectpool-client.

use thiserror::Error;

/// Main error type for all pool session operations.
#[derive(Debug, Error)]
pub enum PoolError {
    /// I/O error during socket operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket handshake or stream error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// The join endpoint could not be parsed as a URL.
    #[error("Invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    /// Protocol error (malformed frame, wrong field types, etc.).
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// A loader or processor callback failed.
    #[error("Callback error: {0}")]
    Callback(String),

    /// The session is disjoined; no further sends are possible.
    #[error("Session disjoined")]
    Disjoined,

    /// The session builder was missing a required field.
    #[error("Join error: {0}")]
    Join(&'static str),
}

/// Result type alias using PoolError.
pub type Result<T> = std::result::Result<T, PoolError>;
