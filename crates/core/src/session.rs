//! Session controller
//!
//! Owns the single RCON session: connection state, the connect form, the
//! command history and the client. Every transition goes through the
//! methods below; control flags are always recomputed from the state.
//!
//! Outputs are published on an unbounded channel so that the task owning
//! the visible surface applies them, while this controller may be parked
//! on a client call. A closed receiver never blocks a transition.
//!
//! # Transitions
//! - `Disconnected` + connect (valid form) -> `Connecting` -> `Connected`,
//!   or back to `Disconnected` when the client fails.
//! - `Disconnected` + connect (invalid form) -> `Disconnected`, no client call.
//! - `Connected` + disconnect -> `Disconnected`.
//! - `Connected` + send failing with an I/O error -> `Disconnected`.

use tokio::sync::mpsc;

use crate::client::RconClient;
use crate::error::{diagnostic, CoreError, Result};
use crate::history::CommandHistory;
use crate::types::{
    ConnectForm, ConnectionState, ControlState, Field, LogLine, SessionEvent, SessionOutput,
};
use crate::validation::{self, ValidationResult};

/// Sending half of the output channel
pub type OutputSender = mpsc::UnboundedSender<SessionOutput>;
/// Receiving half of the output channel
pub type OutputReceiver = mpsc::UnboundedReceiver<SessionOutput>;

/// State machine for one RCON session
pub struct SessionController<C: RconClient> {
    client: C,
    state: ConnectionState,
    form: ConnectForm,
    history: CommandHistory,
    outputs: OutputSender,
}

impl<C: RconClient> SessionController<C> {
    /// Create a controller publishing on an existing channel
    pub fn new(client: C, form: ConnectForm, outputs: OutputSender) -> Self {
        Self {
            client,
            state: ConnectionState::Disconnected,
            form,
            history: CommandHistory::new(),
            outputs,
        }
    }

    /// Create a controller together with its output receiver
    pub fn with_channel(client: C, form: ConnectForm) -> (Self, OutputReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(client, form, tx), rx)
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn controls(&self) -> ControlState {
        ControlState::for_state(self.state)
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn form(&self) -> &ConnectForm {
        &self.form
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Publish the current state, controls and per-field validity
    ///
    /// Used by the presentation layer to draw its first frame.
    pub fn publish_snapshot(&self) {
        self.emit(SessionOutput::State(self.state));
        self.emit(SessionOutput::Controls(self.controls()));
        for field in Field::ALL {
            let result = validation::validate_field(field, self.form.get(field));
            self.emit(SessionOutput::FieldValidity { field, result });
        }
    }

    /// Dispatch one user event
    pub async fn handle(&mut self, event: SessionEvent) -> Result<()> {
        match event {
            SessionEvent::ConnectRequested => self.connect().await,
            SessionEvent::DisconnectRequested => self.disconnect().await,
            SessionEvent::SendRequested(text) => self.send(text).await.map(|_| ()),
            SessionEvent::HistoryOlder => {
                self.history_older();
                Ok(())
            }
            SessionEvent::HistoryNewer => {
                self.history_newer();
                Ok(())
            }
            SessionEvent::FieldEdited { field, value } => self.edit_field(field, value).map(|_| ()),
            SessionEvent::InputEdited => {
                self.input_edited();
                Ok(())
            }
            SessionEvent::ClearLog => {
                self.emit(SessionOutput::ClearLog);
                Ok(())
            }
        }
    }

    /// Update one connection-parameter input and report its validity
    pub fn edit_field(&mut self, field: Field, value: String) -> Result<ValidationResult> {
        if !self.state.params_editable() {
            tracing::warn!("Ignoring edit of {} while {}", field, self.state);
            self.emit_log(LogLine::info(CoreError::FieldsLocked.to_string()));
            return Err(CoreError::FieldsLocked);
        }
        let result = validation::validate_field(field, &value);
        self.form.set(field, value);
        self.emit(SessionOutput::FieldValidity {
            field,
            result: result.clone(),
        });
        Ok(result)
    }

    /// Validate the form and, if it passes, open a session
    pub async fn connect(&mut self) -> Result<()> {
        if self.state != ConnectionState::Disconnected {
            tracing::warn!("Connect requested while {}", self.state);
            self.emit_log(LogLine::info(CoreError::AlreadyConnected.to_string()));
            return Err(CoreError::AlreadyConnected);
        }

        let report = validation::validate_form(&self.form);
        for field in Field::ALL {
            self.emit(SessionOutput::FieldValidity {
                field,
                result: report.get(field).clone(),
            });
        }
        let params = match validation::params_from_form(&self.form) {
            Ok(params) => params,
            Err(report) => {
                tracing::info!("Connect rejected: {:?} invalid", report.failing_fields());
                self.emit_log(LogLine::ValidationErrors(report.messages()));
                return Err(CoreError::Validation(report));
            }
        };

        self.set_state(ConnectionState::Connecting);
        self.emit_log(LogLine::info(format!("Connecting to {}...", params.address())));

        let result = self
            .client
            .connect(&params.host, params.port, params.secret.as_bytes())
            .await;
        let address = params.address();
        drop(params);

        match result {
            Ok(()) => {
                self.history.clear();
                self.set_state(ConnectionState::Connected);
                tracing::info!("RCON session established with {}", address);
                self.emit_log(LogLine::info("RCON connected"));
                Ok(())
            }
            Err(err) => {
                if err.is_connect_failure() {
                    tracing::error!("Connect to {} failed: {}", address, err);
                } else {
                    tracing::error!("Connect to {} broke the protocol: {}", address, err);
                }
                self.client.disconnect().await;
                self.enter_disconnected();
                self.emit_failure(&err);
                Err(err)
            }
        }
    }

    /// Close the live session
    pub async fn disconnect(&mut self) -> Result<()> {
        if self.state != ConnectionState::Connected {
            self.emit_log(LogLine::info(CoreError::NotConnected.to_string()));
            return Err(CoreError::NotConnected);
        }
        self.client.disconnect().await;
        self.enter_disconnected();
        tracing::info!("RCON session closed by user");
        self.emit_log(LogLine::info("RCON disconnected"));
        Ok(())
    }

    /// Submit a command line
    ///
    /// Returns the server response, or `None` for a blank line, which is
    /// echoed but neither sent nor recorded. A client failure ends the
    /// session.
    pub async fn send(&mut self, text: String) -> Result<Option<String>> {
        if self.state != ConnectionState::Connected {
            self.emit_log(LogLine::info(CoreError::NotConnected.to_string()));
            return Err(CoreError::NotConnected);
        }

        self.emit(SessionOutput::ClearCommandInput);
        self.emit_log(LogLine::echo(text.as_str()));
        if text.trim().is_empty() {
            return Ok(None);
        }

        self.history.push(text.as_str());
        match self.client.send_command(&text).await {
            Ok(response) => {
                tracing::debug!("Command returned {} bytes", response.len());
                self.emit_log(LogLine::response(response.as_str()));
                Ok(Some(response))
            }
            Err(err) => {
                if err.is_io_failure() {
                    tracing::error!("Connection lost, dropping session: {}", err);
                } else {
                    tracing::error!("Command failed, dropping session: {}", err);
                }
                self.client.disconnect().await;
                self.enter_disconnected();
                self.emit_failure(&err);
                Err(err)
            }
        }
    }

    /// Recall the previous history entry into the command input
    pub fn history_older(&mut self) {
        if let Some(entry) = self.history.older() {
            let entry = entry.to_string();
            self.emit(SessionOutput::SetCommandInput(entry));
        }
    }

    /// Recall the next history entry; the fresh-input position leaves the input alone
    pub fn history_newer(&mut self) {
        if let Some(entry) = self.history.newer() {
            let entry = entry.to_string();
            self.emit(SessionOutput::SetCommandInput(entry));
        }
    }

    /// Any non-navigation keystroke in the command input
    pub fn input_edited(&mut self) {
        if self.history.is_browsing() {
            tracing::debug!("Input edited at history cursor {}", self.history.cursor());
        }
        self.history.reset_cursor();
    }

    fn enter_disconnected(&mut self) {
        self.history.clear();
        self.set_state(ConnectionState::Disconnected);
    }

    fn set_state(&mut self, state: ConnectionState) {
        tracing::info!("Session state: {} -> {}", self.state, state);
        self.state = state;
        self.emit(SessionOutput::State(state));
        self.emit(SessionOutput::Controls(ControlState::for_state(state)));
    }

    fn emit_failure(&self, err: &CoreError) {
        self.emit_log(LogLine::error(err.to_string(), diagnostic(err)));
    }

    fn emit_log(&self, line: LogLine) {
        self.emit(SessionOutput::Log(line));
    }

    fn emit(&self, output: SessionOutput) {
        if self.outputs.send(output).is_err() {
            tracing::debug!("Output receiver closed; update dropped");
        }
    }
}
