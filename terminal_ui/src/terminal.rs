use std::io;

use crossterm::{
    cursor::Show,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::warn;

/// Puts the terminal into raw mode on the alternate screen and puts it back
/// when dropped, including on early returns and panics.
pub struct TerminalGuard {
    restored: bool,
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let guard = Self { restored: false };
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(guard)
    }

    pub fn restore(&mut self) -> io::Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        disable_raw_mode()?;
        execute!(io::stdout(), LeaveAlternateScreen, Show)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            warn!("Failed to restore terminal: {}", e);
        }
    }
}
