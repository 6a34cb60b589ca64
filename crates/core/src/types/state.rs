//! Connection state and the control flags derived from it

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of the single RCON session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConnectionState {
    /// No live channel (initial state)
    #[default]
    Disconnected,
    /// Connect call in flight
    Connecting,
    /// Authenticated channel available
    Connected,
}

impl ConnectionState {
    /// Connection-parameter inputs are editable only with no session in progress
    pub fn params_editable(self) -> bool {
        self == ConnectionState::Disconnected
    }

    /// Command input is usable only on a live session
    pub fn commands_enabled(self) -> bool {
        self == ConnectionState::Connected
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
        };
        f.write_str(name)
    }
}

/// Enabled flags for every user-facing control
///
/// Always derived from a [`ConnectionState`]; never set field by field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlState {
    pub host: bool,
    pub port: bool,
    pub secret: bool,
    pub connect: bool,
    pub disconnect: bool,
    pub command: bool,
    pub send: bool,
}

impl ControlState {
    /// Compute control flags for a connection state
    pub fn for_state(state: ConnectionState) -> Self {
        let editable = state.params_editable();
        let live = state.commands_enabled();
        Self {
            host: editable,
            port: editable,
            secret: editable,
            connect: editable,
            disconnect: live,
            command: live,
            send: live,
        }
    }

    /// True when all connection-parameter inputs accept edits
    pub fn params_enabled(&self) -> bool {
        self.host && self.port && self.secret
    }
}

impl Default for ControlState {
    fn default() -> Self {
        Self::for_state(ConnectionState::default())
    }
}
