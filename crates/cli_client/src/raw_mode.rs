//! Raw mode guard for the interactive prompt
//!
//! The terminal is put back into cooked mode on drop, even on panic, and the
//! cursor is left at the start of a fresh line.

use anyhow::{Context, Result};
use crossterm::terminal;
use std::io::Write;

/// Guard that enables raw mode and restores normal mode on drop.
///
/// # Example
/// ```no_run
/// let _guard = RawModeGuard::enable()?;
/// // Keys now arrive one by one, without local echo.
/// # Ok::<(), anyhow::Error>(())
/// ```
pub struct RawModeGuard;

impl RawModeGuard {
    /// Enable raw mode, failing when stdin is not a terminal.
    pub fn enable() -> Result<Self> {
        terminal::enable_raw_mode().context("Failed to enable raw mode")?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        let mut stdout = std::io::stdout();
        let _ = stdout.write_all(b"\r\n");
        let _ = stdout.flush();
    }
}
