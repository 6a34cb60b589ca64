//! User-triggered events accepted by the session controller

use super::params::Field;

/// Discrete input event from the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Connect using the current form contents
    ConnectRequested,
    /// Close the live session
    DisconnectRequested,
    /// Submit a command line
    SendRequested(String),
    /// Recall an older history entry
    HistoryOlder,
    /// Recall a newer history entry
    HistoryNewer,
    /// A connection-parameter input changed
    FieldEdited { field: Field, value: String },
    /// Any other edit keystroke in the command input
    InputEdited,
    /// Wipe the output log
    ClearLog,
}

impl SessionEvent {
    /// Create field edit event
    pub fn field(field: Field, value: impl Into<String>) -> Self {
        Self::FieldEdited {
            field,
            value: value.into(),
        }
    }

    /// Create send event
    pub fn send(text: impl Into<String>) -> Self {
        Self::SendRequested(text.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_constructors() {
        assert_eq!(
            SessionEvent::field(Field::Port, "25575"),
            SessionEvent::FieldEdited {
                field: Field::Port,
                value: "25575".to_string()
            }
        );
        assert_eq!(
            SessionEvent::send("list"),
            SessionEvent::SendRequested("list".to_string())
        );
    }
}
