//! Outputs published by the session controller for rendering

use serde::{Deserialize, Serialize};
use std::fmt;

use super::params::Field;
use super::state::{ConnectionState, ControlState};
use crate::validation::ValidationResult;

/// Prompt marker prefixed to echoed commands
pub const PROMPT_MARKER: &str = "> ";

/// One entry of the append-only output log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLine {
    /// Status notice (connected, disconnected, rejected request)
    Info(String),
    /// Submitted command echoed after the prompt marker
    Echo(String),
    /// Text returned by the server
    Response(String),
    /// Itemized validation failures, one message per violated rule
    ValidationErrors(Vec<String>),
    /// Collaborator failure with diagnostic detail
    Error { message: String, detail: String },
}

impl LogLine {
    pub fn info(text: impl Into<String>) -> Self {
        Self::Info(text.into())
    }

    pub fn echo(command: impl Into<String>) -> Self {
        Self::Echo(command.into())
    }

    pub fn response(text: impl Into<String>) -> Self {
        Self::Response(text.into())
    }

    pub fn error(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLine::Info(text) | LogLine::Response(text) => f.write_str(text),
            LogLine::Echo(command) => write!(f, "{}{}", PROMPT_MARKER, command),
            LogLine::ValidationErrors(messages) => {
                f.write_str("Validation Errors:")?;
                for message in messages {
                    write!(f, "\n• {}", message)?;
                }
                Ok(())
            }
            LogLine::Error { message, detail } => write!(f, "{}\n{}", message, detail),
        }
    }
}

/// Update pushed to the presentation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutput {
    /// Append a line to the output log
    Log(LogLine),
    /// Wipe the output log
    ClearLog,
    /// Validity of one connection-parameter input
    FieldValidity { field: Field, result: ValidationResult },
    /// Enabled flags for every control
    Controls(ControlState),
    /// Connection state changed
    State(ConnectionState),
    /// Replace the command input text (history recall)
    SetCommandInput(String),
    /// Empty the command input
    ClearCommandInput,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_echo_uses_prompt_marker() {
        assert_eq!(LogLine::echo("list").to_string(), "> list");
        assert_eq!(LogLine::echo("  ").to_string(), ">   ");
    }

    #[test]
    fn test_validation_errors_render_as_bullets() {
        let line = LogLine::ValidationErrors(vec![
            "Host cannot be empty".to_string(),
            "Port must be a valid number".to_string(),
        ]);
        assert_eq!(
            line.to_string(),
            "Validation Errors:\n• Host cannot be empty\n• Port must be a valid number"
        );
    }

    #[test]
    fn test_error_renders_message_then_detail() {
        let line = LogLine::error("Network error: refused", "Network(\"refused\")");
        assert_eq!(line.to_string(), "Network error: refused\nNetwork(\"refused\")");
    }
}
