//! RCON Core - session control for a remote-console client
//!
//! This crate provides:
//! - Session controller (connection state machine, command dispatch)
//! - Connection-parameter validation
//! - Command history with recall cursor
//! - RCON client trait, mock client and TCP client
//! - Error types

pub const APP_VERSION_STRING: &str = "0.1.0";
/// Port most game servers listen on for RCON
pub const DEFAULT_RCON_PORT: u16 = 25575;

pub mod client;
pub mod error;
pub mod history;
pub mod protocol;
pub mod session;
pub mod transport;
pub mod types;
pub mod validation;

// Re-export common types
pub use client::{MockRcon, RconClient};
pub use error::{CoreError, Result};
pub use history::CommandHistory;
pub use protocol::{Packet, PacketCodec};
pub use session::{OutputReceiver, OutputSender, SessionController};
pub use transport::{TcpRcon, TcpRconConfig};
pub use types::{
    ConnectForm, ConnectionParams, ConnectionState, ControlState, Field, LogLine, Secret,
    SessionEvent, SessionOutput,
};
pub use validation::{ValidationReport, ValidationResult};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constants_defined() {
        assert!(APP_VERSION_STRING.starts_with("0.1"));
        assert_eq!(DEFAULT_RCON_PORT, 25575);
    }
}
