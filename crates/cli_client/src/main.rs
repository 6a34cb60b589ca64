//! Interactive RCON client
//! Features: raw-mode prompt with history recall, live field validation

mod commands;
mod config;
mod editor;
mod raw_mode;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{PromptCommand, HELP_TEXT};
use config::{Args, FileConfig, Settings};
use crossterm::event::{self, Event, KeyEvent};
use editor::{EditorAction, LineEditor};
use rcon_core::{ConnectionState, SessionController, SessionEvent, TcpRcon};
use render::Screen;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// How long a pending server call may delay exit
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Input from the reader thread
enum Input {
    Key(KeyEvent),
    /// Whole line (stdin is not a terminal)
    Line(String),
    Eof,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(&args)?;
    info!("Starting rcon-cli v{}", env!("CARGO_PKG_VERSION"));

    let file_config = FileConfig::load_for(&args)?;
    let settings = Settings::resolve(&args, &file_config);

    let client = TcpRcon::new(settings.tcp_config());
    let (session, mut outputs) = SessionController::with_channel(client, settings.form.clone());
    session.publish_snapshot();

    let (event_tx, event_rx) = mpsc::channel::<SessionEvent>(32);
    let session_task = tokio::spawn(run_session(session, event_rx));

    print_banner(&settings);

    // Fallback: line-buffered input in non-TTY environments
    let guard = match raw_mode::RawModeGuard::enable() {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: raw mode not available: {}. Using line input.", e);
            None
        }
    };
    let raw = guard.is_some();
    let mut input_rx = spawn_input_reader(raw);
    let mut screen = Screen::new(std::io::stdout(), raw);
    let mut editor = LineEditor::new();

    if settings.connect_now {
        event_tx.send(SessionEvent::ConnectRequested).await?;
    }

    loop {
        tokio::select! {
            Some(output) = outputs.recv() => {
                screen.apply(output, &mut editor)?;
            }
            input = input_rx.recv() => {
                let action = match input {
                    Some(Input::Key(key)) => editor.handle_key(key),
                    Some(Input::Line(line)) => EditorAction::Submit(line),
                    Some(Input::Eof) | None => EditorAction::Exit,
                };
                if !dispatch(action, &mut screen, &mut editor, &event_tx).await? {
                    break;
                }
                screen.redraw_prompt(&editor)?;
            }
        }
    }

    // Restore the terminal before waiting on a call that may never return.
    drop(guard);
    screen.set_raw(false);

    // Closing the event channel lets the session drain queued events and disconnect.
    drop(event_tx);
    let finished = finish_session(session_task, SHUTDOWN_GRACE).await;
    while let Ok(output) = outputs.try_recv() {
        screen.apply(output, &mut editor)?;
    }

    if finished {
        println!("Connection closed.");
    } else {
        println!("Server did not answer; connection abandoned.");
    }
    Ok(())
}

/// Wait for the session task to wind down, aborting it after `grace`
///
/// Returns false when the task had to be aborted (a client call was still
/// pending).
async fn finish_session(task: JoinHandle<()>, grace: Duration) -> bool {
    let abort = task.abort_handle();
    match tokio::time::timeout(grace, task).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            warn!("Session task failed: {}", e);
            true
        }
        Err(_) => {
            warn!("Session still busy after {:?}; aborting", grace);
            abort.abort();
            false
        }
    }
}

/// Apply one editor action. Returns false when the client should exit.
async fn dispatch<W: Write>(
    action: EditorAction,
    screen: &mut Screen<W>,
    editor: &mut LineEditor,
    events: &mpsc::Sender<SessionEvent>,
) -> Result<bool> {
    let event = match action {
        EditorAction::Submit(line) => match commands::parse(&line) {
            PromptCommand::Exit => return Ok(false),
            PromptCommand::Help => {
                screen.print_text(HELP_TEXT)?;
                None
            }
            PromptCommand::Status => {
                screen.print_status()?;
                None
            }
            PromptCommand::Clear => Some(SessionEvent::ClearLog),
            PromptCommand::Connect => Some(SessionEvent::ConnectRequested),
            PromptCommand::Disconnect => Some(SessionEvent::DisconnectRequested),
            PromptCommand::SetField(field, value) => Some(SessionEvent::FieldEdited { field, value }),
            PromptCommand::Send(text) => {
                if screen.controls().command {
                    Some(SessionEvent::SendRequested(text))
                } else {
                    editor.clear();
                    screen.print_text("Not connected. Type /connect or /help.")?;
                    None
                }
            }
        },
        EditorAction::HistoryOlder => Some(SessionEvent::HistoryOlder),
        EditorAction::HistoryNewer => Some(SessionEvent::HistoryNewer),
        EditorAction::Edited => Some(SessionEvent::InputEdited),
        EditorAction::Exit => return Ok(false),
        EditorAction::None => None,
    };

    if let Some(event) = event {
        if events.send(event).await.is_err() {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Process events strictly in arrival order; one client call at a time
async fn run_session(
    mut session: SessionController<TcpRcon>,
    mut events: mpsc::Receiver<SessionEvent>,
) {
    while let Some(event) = events.recv().await {
        if let Err(e) = session.handle(event).await {
            // Already surfaced through the output channel.
            debug!("Event rejected: {}", e);
        }
    }
    if session.state() == ConnectionState::Connected {
        let _ = session.disconnect().await;
    }
    info!("Session loop finished");
}

/// Read keys (raw mode) or lines on a dedicated thread
fn spawn_input_reader(raw: bool) -> mpsc::Receiver<Input> {
    let (tx, rx) = mpsc::channel::<Input>(64);
    std::thread::spawn(move || {
        if raw {
            while !tx.is_closed() {
                match event::poll(Duration::from_millis(100)) {
                    Ok(true) => match event::read() {
                        Ok(Event::Key(key)) => {
                            if tx.blocking_send(Input::Key(key)).is_err() {
                                break;
                            }
                        }
                        Ok(_) => {}
                        Err(_) => break,
                    },
                    Ok(false) => {}
                    Err(_) => break,
                }
            }
        } else {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if tx.blocking_send(Input::Line(line)).is_err() {
                    return;
                }
            }
        }
        let _ = tx.blocking_send(Input::Eof);
    });
    rx
}

fn print_banner(settings: &Settings) {
    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    println!("RCON Client v{}", env!("CARGO_PKG_VERSION"));
    println!(
        "Server: {}:{}   Started: {}",
        settings.form.host, settings.form.port, now
    );
    println!("Type /help for commands, /exit to quit.");
}

/// Log to a file so output never interleaves with the prompt
fn setup_logging(args: &Args) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .with_context(|| format!("Invalid log level: {}", args.log_level))?;

    match args.log_file.clone().or_else(default_log_file) {
        Some(path) => {
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::sync::Mutex::new(file)).with_ansi(false))
                .with(filter)
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
    }
    Ok(())
}

/// `<data dir>/rcon-cli/rcon-cli.log`
fn default_log_file() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("rcon-cli").join("rcon-cli.log"))
}
