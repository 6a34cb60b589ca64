//! Terminal rendering of session outputs
//!
//! The screen is a scrolling log with the prompt on the last line. Every
//! log write erases the prompt, prints the text and draws the prompt again.

use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use crossterm::{cursor, queue};
use rcon_core::{
    ConnectionState, ControlState, Field, LogLine, SessionOutput, ValidationResult,
};
use std::collections::HashMap;
use std::io::{self, Write};

use crate::editor::LineEditor;

/// Shown for `/clear` in line mode
const LOG_CLEARED: &str = "--- log cleared ---";

pub struct Screen<W: Write> {
    out: W,
    /// Raw mode needs explicit carriage returns and prompt redraws
    raw: bool,
    state: ConnectionState,
    controls: ControlState,
    validity: HashMap<Field, ValidationResult>,
}

impl<W: Write> Screen<W> {
    pub fn new(out: W, raw: bool) -> Self {
        Self {
            out,
            raw,
            state: ConnectionState::Disconnected,
            controls: ControlState::default(),
            validity: HashMap::new(),
        }
    }

    /// Switch to plain line output once the terminal has left raw mode
    pub fn set_raw(&mut self, raw: bool) {
        self.raw = raw;
    }

    pub fn controls(&self) -> ControlState {
        self.controls
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn prompt(&self) -> String {
        format!("rcon({})> ", self.state)
    }

    /// Apply one controller output and refresh the prompt
    pub fn apply(&mut self, output: SessionOutput, editor: &mut LineEditor) -> io::Result<()> {
        match output {
            SessionOutput::Log(line) => self.print_log(&line)?,
            SessionOutput::ClearLog => {
                if self.raw {
                    queue!(self.out, Clear(ClearType::All), cursor::MoveTo(0, 0))?;
                } else {
                    // Scrollback cannot be erased without a terminal.
                    self.print_text(LOG_CLEARED)?;
                }
            }
            SessionOutput::FieldValidity { field, result } => {
                let changed = self.validity.get(&field) != Some(&result);
                let first_valid = !self.validity.contains_key(&field) && result.valid;
                self.validity.insert(field, result.clone());
                if changed && !first_valid {
                    self.print_validity(field, &result)?;
                }
            }
            SessionOutput::Controls(controls) => self.controls = controls,
            SessionOutput::State(state) => self.state = state,
            SessionOutput::SetCommandInput(text) => editor.set(&text),
            SessionOutput::ClearCommandInput => editor.clear(),
        }
        self.redraw_prompt(editor)
    }

    pub fn print_log(&mut self, line: &LogLine) -> io::Result<()> {
        let text = line.to_string();
        let styled = match line {
            LogLine::Info(_) => text.cyan().to_string(),
            LogLine::Echo(_) => text.dark_grey().to_string(),
            LogLine::Response(_) => text,
            LogLine::ValidationErrors(_) => text.yellow().to_string(),
            LogLine::Error { .. } => text.red().to_string(),
        };
        self.print_text(&styled)
    }

    fn print_validity(&mut self, field: Field, result: &ValidationResult) -> io::Result<()> {
        let text = if result.valid {
            format!("✓ {}", field).green().to_string()
        } else {
            format!("✗ {}: {}", field, result.messages.join(", ")).yellow().to_string()
        };
        self.print_text(&text)
    }

    /// Session state and per-field validity
    pub fn print_status(&mut self) -> io::Result<()> {
        let fields: Vec<String> = Field::ALL
            .iter()
            .map(|field| match self.validity.get(field) {
                Some(result) if !result.valid => format!("{} ✗", field),
                Some(_) => format!("{} ✓", field),
                None => format!("{} ?", field),
            })
            .collect();
        let text = format!("state: {} | {}", self.state, fields.join("  "));
        self.print_text(&text)
    }

    /// Print free text above the prompt
    pub fn print_text(&mut self, text: &str) -> io::Result<()> {
        if self.raw {
            queue!(self.out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine))?;
            for line in text.split('\n') {
                self.out.write_all(line.trim_end_matches('\r').as_bytes())?;
                self.out.write_all(b"\r\n")?;
            }
        } else {
            writeln!(self.out, "{}", text)?;
        }
        Ok(())
    }

    pub fn redraw_prompt(&mut self, editor: &LineEditor) -> io::Result<()> {
        if self.raw {
            queue!(self.out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine))?;
            let prompt = self.prompt();
            write!(self.out, "{}{}", prompt.bold(), editor.display_text())?;
        }
        self.out.flush()
    }

    #[cfg(test)]
    fn output(&self) -> &W {
        &self.out
    }
}
