//! RCON client trait and an in-memory mock

use crate::error::{CoreError, Result};
use async_trait::async_trait;

/// Protocol-level RCON operations used by the session controller
///
/// Calls are awaited to completion; there is no cancellation of an
/// in-flight `connect` or `send_command`.
#[async_trait]
pub trait RconClient: Send {
    /// Open and authenticate a channel
    ///
    /// Fails with `CoreError::Auth` on a rejected secret and with
    /// `CoreError::Network` (or `Timeout`/`Io`) when the server is unreachable.
    async fn connect(&mut self, host: &str, port: u16, secret: &[u8]) -> Result<()>;

    /// Execute a command and return the server's response text
    async fn send_command(&mut self, command: &str) -> Result<String>;

    /// Close the channel
    ///
    /// Never fails. Safe to call repeatedly and before any connect.
    async fn disconnect(&mut self);
}

/// Scripted failure for [`MockRcon`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockFailure {
    Auth(String),
    Network(String),
    Io(String),
}

impl MockFailure {
    fn to_error(&self) -> CoreError {
        match self {
            MockFailure::Auth(msg) => CoreError::Auth(msg.clone()),
            MockFailure::Network(msg) => CoreError::Network(msg.clone()),
            MockFailure::Io(msg) => CoreError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                msg.clone(),
            )),
        }
    }
}

/// Call recorded by [`MockRcon`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Connect { host: String, port: u16, secret: Vec<u8> },
    Send(String),
    Disconnect,
}

/// Mock RCON client for testing
///
/// Responds to every command with `"ok: <command>"` unless a failure
/// is scripted.
#[derive(Debug, Default)]
pub struct MockRcon {
    connect_failure: Option<MockFailure>,
    /// 1-based index of the send call that fails
    fail_send_at: Option<usize>,
    sends: usize,
    connected: bool,
    calls: Vec<MockCall>,
}

impl MockRcon {
    /// Create new mock client that accepts every call
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every connect attempt fail
    pub fn with_connect_failure(mut self, failure: MockFailure) -> Self {
        self.connect_failure = Some(failure);
        self
    }

    /// Make the n-th send (1-based) fail with an I/O error
    pub fn with_send_failure_at(mut self, n: usize) -> Self {
        self.fail_send_at = Some(n);
        self
    }

    /// Clear a scripted connect failure
    pub fn allow_connect(&mut self) {
        self.connect_failure = None;
    }

    pub fn calls(&self) -> &[MockCall] {
        &self.calls
    }

    pub fn connect_calls(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, MockCall::Connect { .. }))
            .count()
    }

    pub fn sent(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                MockCall::Send(command) => Some(command.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }
}

#[async_trait]
impl RconClient for MockRcon {
    async fn connect(&mut self, host: &str, port: u16, secret: &[u8]) -> Result<()> {
        self.calls.push(MockCall::Connect {
            host: host.to_string(),
            port,
            secret: secret.to_vec(),
        });
        if let Some(failure) = &self.connect_failure {
            return Err(failure.to_error());
        }
        self.connected = true;
        Ok(())
    }

    async fn send_command(&mut self, command: &str) -> Result<String> {
        self.calls.push(MockCall::Send(command.to_string()));
        if !self.connected {
            return Err(CoreError::NotConnected);
        }
        self.sends += 1;
        if self.fail_send_at == Some(self.sends) {
            self.connected = false;
            return Err(MockFailure::Io("connection reset by peer".into()).to_error());
        }
        Ok(format!("ok: {}", command))
    }

    async fn disconnect(&mut self) {
        self.calls.push(MockCall::Disconnect);
        self.connected = false;
    }
}
