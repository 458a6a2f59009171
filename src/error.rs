//! Error types for safekeep
//!
//! Provides a unified error type for all client operations.

use thiserror::Error;

/// Result type alias using SafekeepError
pub type Result<T> = std::result::Result<T, SafekeepError>;

/// Unified error type for safekeep operations
#[derive(Debug, Error)]
pub enum SafekeepError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("Connection error ({context}): {source}")]
    Connection {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Stream truncated: peer closed before {field} was fully received")]
    TruncatedStream { field: &'static str },

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Protocol violation: {0}")]
    ProtocolViolation(String),

    // -------------------------------------------------------------------------
    // Local Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SafekeepError {
    /// Wrap a transport-level I/O failure
    pub fn connection(context: &'static str, source: std::io::Error) -> Self {
        SafekeepError::Connection { context, source }
    }

    /// Map an I/O error raised while reading a protocol field.
    ///
    /// EOF means the peer closed early; anything else is a transport failure.
    pub fn from_field_read(field: &'static str, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::UnexpectedEof => SafekeepError::TruncatedStream { field },
            _ => SafekeepError::connection("read", err),
        }
    }
}
