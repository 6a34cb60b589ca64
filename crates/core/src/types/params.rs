//! Connection parameters as typed by the user and as handed to the client

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three connection-parameter inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Host,
    Port,
    Secret,
}

impl Field {
    /// All fields in reporting order
    pub const ALL: [Field; 3] = [Field::Host, Field::Port, Field::Secret];
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Host => "host",
            Field::Port => "port",
            Field::Secret => "password",
        };
        f.write_str(name)
    }
}

/// Raw, unvalidated text of the connection inputs
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConnectForm {
    pub host: String,
    pub port: String,
    pub secret: String,
}

impl ConnectForm {
    pub fn new(host: impl Into<String>, port: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: port.into(),
            secret: secret.into(),
        }
    }

    /// Text currently held by a field
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Host => &self.host,
            Field::Port => &self.port,
            Field::Secret => &self.secret,
        }
    }

    /// Replace the text of a field
    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Host => self.host = value,
            Field::Port => self.port = value,
            Field::Secret => self.secret = value,
        }
    }
}

impl fmt::Debug for ConnectForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectForm")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Shared secret bytes
///
/// Redacted in `Debug` output. The bytes are not wiped from memory.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(Vec<u8>);

impl Secret {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for Secret {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret(<{} bytes>)", self.0.len())
    }
}

/// Validated parameters for a single connect attempt
///
/// Built from a [`ConnectForm`] only after validation passes and dropped
/// as soon as the connect call returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    pub host: String,
    pub port: u16,
    pub secret: Secret,
}

impl ConnectionParams {
    /// `host:port` for log lines (never includes the secret)
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
