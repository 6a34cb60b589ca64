//! TCP transport for the RCON client
//!
//! Settings for the socket collaborator. Connect is bounded by a timeout;
//! commands wait for the server unless `command_timeout` is set.

pub mod tcp;

pub use tcp::TcpRcon;

use std::time::Duration;

use crate::protocol::codec::MAX_PACKET_SIZE;

/// TCP collaborator configuration
#[derive(Debug, Clone)]
pub struct TcpRconConfig {
    /// Upper bound for TCP connect plus authentication
    pub connect_timeout: Duration,
    /// Upper bound for one command round trip (None = wait forever)
    pub command_timeout: Option<Duration>,
    /// Largest accepted packet length field
    pub max_packet_size: usize,
}

impl Default for TcpRconConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            command_timeout: None,
            max_packet_size: MAX_PACKET_SIZE,
        }
    }
}

impl TcpRconConfig {
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = Some(timeout);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = TcpRconConfig::default();
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.command_timeout, None);
        assert_eq!(config.max_packet_size, MAX_PACKET_SIZE);
    }

    #[test]
    fn test_config_builders() {
        let config = TcpRconConfig::default()
            .with_connect_timeout(Duration::from_secs(3))
            .with_command_timeout(Duration::from_secs(5));
        assert_eq!(config.connect_timeout, Duration::from_secs(3));
        assert_eq!(config.command_timeout, Some(Duration::from_secs(5)));
    }
}
