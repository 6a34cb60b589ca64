//! Error types for rcon-core

use std::error::Error as StdError;
use std::fmt::Write;

use thiserror::Error;

use crate::validation::ValidationReport;

/// Core error type
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {}", .0.messages().join("; "))]
    Validation(ValidationReport),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Invalid packet: {0}")]
    InvalidPacket(String),

    #[error("Packet too large: {size} bytes (max: {max})")]
    PacketTooLarge { size: usize, max: usize },

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Not connected")]
    NotConnected,

    #[error("Already connected")]
    AlreadyConnected,

    #[error("Connection fields are locked while a session is active")]
    FieldsLocked,
}

impl CoreError {
    /// Failure raised by the collaborator while establishing a session
    pub fn is_connect_failure(&self) -> bool {
        matches!(
            self,
            CoreError::Auth(_) | CoreError::Network(_) | CoreError::Timeout(_) | CoreError::Io(_)
        )
    }

    /// Failure on an established channel
    pub fn is_io_failure(&self) -> bool {
        matches!(
            self,
            CoreError::Io(_)
                | CoreError::Protocol(_)
                | CoreError::InvalidPacket(_)
                | CoreError::PacketTooLarge { .. }
                | CoreError::Timeout(_)
                | CoreError::NotConnected
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, CoreError>;

/// Render the full cause chain of an error for user-facing diagnostics.
///
/// The first line is the debug representation, followed by one
/// `caused by:` line per `source()` in the chain.
pub fn diagnostic(err: &(dyn StdError + 'static)) -> String {
    let mut out = format!("{:?}", err);
    let mut source = err.source();
    while let Some(cause) = source {
        let _ = write!(out, "\ncaused by: {}", cause);
        source = cause.source();
    }
    out
}
