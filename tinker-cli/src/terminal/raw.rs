//! Raw terminal mode handling for the attached Tinker session

use crossterm::{
    cursor,
    event::{self, Event},
    execute,
    terminal::{self, ClearType},
};
use std::io::{self, Write};
use std::time::Duration;

/// RAII wrapper for raw terminal mode
///
/// Enables raw mode on construction and restores the previous state on drop.
/// Keystrokes arrive one at a time and are forwarded to the PTY untouched.
pub struct RawTerminal {
    was_raw: bool,
}

impl RawTerminal {
    /// Enable raw terminal mode
    ///
    /// If the terminal is already in raw mode, this is a no-op.
    /// The previous mode is restored on drop.
    pub fn new() -> io::Result<Self> {
        let was_raw = terminal::is_raw_mode_enabled()?;
        if !was_raw {
            terminal::enable_raw_mode()?;
        }
        Ok(Self { was_raw })
    }

    /// Poll for and read a terminal event
    ///
    /// Returns `None` if no event is available within `timeout`.
    pub fn read_event(&self, timeout: Duration) -> io::Result<Option<Event>> {
        if event::poll(timeout)? {
            Ok(Some(event::read()?))
        } else {
            Ok(None)
        }
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        if !self.was_raw {
            let _ = terminal::disable_raw_mode();
        }
    }
}

/// Write data directly to stdout
pub fn write_stdout(data: &[u8]) -> io::Result<()> {
    let mut stdout = io::stdout();
    stdout.write_all(data)?;
    stdout.flush()
}

/// Clear the screen and scrollback and home the cursor
pub fn clear_screen() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(
        stdout,
        terminal::Clear(ClearType::All),
        terminal::Clear(ClearType::Purge),
        cursor::MoveTo(0, 0)
    )
}
