//! Prompt line parsing
//!
//! Lines starting with a known `/name` are handled by the client itself;
//! everything else, including unknown slash commands, goes to the server.

use rcon_core::Field;

pub const HELP_TEXT: &str = "\
Client commands:
  /connect            connect with the current host, port and password
  /disconnect         close the session
  /host <host>        set the server host
  /port <port>        set the RCON port
  /password <secret>  set the RCON password
  /status             show session state and field validity
  /clear              clear the screen
  /help               show this help
  /exit               disconnect and quit (also Ctrl+C, Ctrl+D)
Up/Down recall sent commands. Any other line is sent to the server.";

/// Parsed prompt line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptCommand {
    Connect,
    Disconnect,
    SetField(Field, String),
    Status,
    Clear,
    Help,
    Exit,
    /// Raw text for the server (may be blank)
    Send(String),
}

pub fn parse(line: &str) -> PromptCommand {
    let trimmed = line.trim_start();
    let Some(rest) = trimmed.strip_prefix('/') else {
        return PromptCommand::Send(line.to_string());
    };
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest.trim_end(), ""),
    };
    match name {
        "connect" => PromptCommand::Connect,
        "disconnect" => PromptCommand::Disconnect,
        "host" => PromptCommand::SetField(Field::Host, arg.to_string()),
        "port" => PromptCommand::SetField(Field::Port, arg.to_string()),
        "password" => PromptCommand::SetField(Field::Secret, arg.to_string()),
        "status" => PromptCommand::Status,
        "clear" => PromptCommand::Clear,
        "help" => PromptCommand::Help,
        "exit" | "quit" => PromptCommand::Exit,
        _ => PromptCommand::Send(line.to_string()),
    }
}
