//! Error types for the Tarantool facade
//!
//! This module defines all error types that can occur while talking to the
//! database through a driver.

/// Result type alias for facade operations
pub type Result<T> = std::result::Result<T, DatabaseError>;

/// Error types for facade operations
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// Connection could not be established
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Connection timeout
    #[error("Connection timeout after {timeout_ms}ms")]
    ConnectionTimeout { timeout_ms: u64 },

    /// No session is available (facade never connected or space never bound)
    #[error("Not connected to database")]
    NotConnected,

    /// Address is not a TCP `host:port`
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// The driver reported a failure for a request
    #[error("{request} request failed: {message}")]
    RequestError { request: String, message: String },

    /// Response data could not be decoded
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// Unknown iterator mode
    #[error("Invalid iterator: {0}")]
    InvalidIterator(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DatabaseError {
    /// Create a new connection error
    pub fn connection<S: Into<String>>(msg: S) -> Self {
        DatabaseError::ConnectionError(msg.into())
    }

    /// Create a connection timeout error
    pub fn connection_timeout(timeout_ms: u64) -> Self {
        DatabaseError::ConnectionTimeout { timeout_ms }
    }

    /// Create a request error for the named driver call
    pub fn request(request: impl Into<String>, message: impl Into<String>) -> Self {
        DatabaseError::RequestError {
            request: request.into(),
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode<S: Into<String>>(msg: S) -> Self {
        DatabaseError::DecodeError(msg.into())
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        DatabaseError::ConfigError(msg.into())
    }

    /// Whether the error was raised locally because no session exists
    pub fn is_not_connected(&self) -> bool {
        matches!(self, DatabaseError::NotConnected)
    }
}
