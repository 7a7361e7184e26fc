//! Error types for rediswire
//!
//! Provides a unified error type for all client operations.
//!
//! ## Fatal vs. recoverable
//! - `Io`, `Connection`, `Protocol`: the stream can no longer be trusted.
//!   The client moves to the failed state and must be reconnected.
//! - `Server`, `TypeMismatch`: the reply was fully consumed, the connection
//!   stays usable.
//! - `UnexpectedRead`, `Pending`, `NotConnected`, `Broken`, `Encoding`,
//!   `Config`: caller errors, nothing was sent or read.

use thiserror::Error;

/// Result type alias using RedisError
pub type Result<T> = std::result::Result<T, RedisError>;

/// Unified error type for rediswire operations
#[derive(Debug, Error)]
pub enum RedisError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Not connected")]
    NotConnected,

    #[error("Connection is broken, reconnect required")]
    Broken,

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    // -------------------------------------------------------------------------
    // Reply Errors
    // -------------------------------------------------------------------------
    #[error("Server error: {0}")]
    Server(String),

    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Read attempted with no outstanding command")]
    UnexpectedRead,

    #[error("{0} replies still outstanding, drain them first")]
    Pending(usize),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RedisError {
    /// Whether this error leaves the connection unusable
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RedisError::Io(_) | RedisError::Connection(_) | RedisError::Protocol(_)
        )
    }

    /// Whether the server answered with an error reply
    pub fn is_server_error(&self) -> bool {
        matches!(self, RedisError::Server(_))
    }
}
