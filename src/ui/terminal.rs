// Terminal mode handling.
// Enters raw mode and the alternate screen, and restores both on every exit path.

use std::io::{self, Stdout};

use crossterm::{
    cursor::Show,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

/// Runs `restore` once when dropped.
pub struct Restore<F: FnMut()> {
    restore: Option<F>,
}

impl<F: FnMut()> Restore<F> {
    pub fn new(restore: F) -> Self {
        Self {
            restore: Some(restore),
        }
    }
}

impl<F: FnMut()> Drop for Restore<F> {
    fn drop(&mut self) {
        if let Some(mut restore) = self.restore.take() {
            restore();
        }
    }
}

/// Put the terminal back into cooked mode on the main screen.
fn leave() {
    if let Err(e) = disable_raw_mode() {
        tracing::warn!(event = "terminal.restore_failed", error = %e, "Could not leave raw mode");
    }
    if let Err(e) = execute!(io::stdout(), LeaveAlternateScreen, Show) {
        tracing::warn!(event = "terminal.restore_failed", error = %e, "Could not leave alternate screen");
    }
}

/// Set up the terminal for the widget. The returned guard restores it when dropped,
/// including when setup fails partway.
pub fn enter() -> io::Result<(Terminal<CrosstermBackend<Stdout>>, Restore<fn()>)> {
    enable_raw_mode()?;
    let guard = Restore::new(leave as fn());
    execute!(io::stdout(), EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    Ok((terminal, guard))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn setup(restored: &Cell<u32>, fail: bool) -> io::Result<()> {
        let _guard = Restore::new(|| restored.set(restored.get() + 1));
        if fail {
            return Err(io::Error::other("no tty"));
        }
        Ok(())
    }

    #[test]
    fn test_restore_runs_on_error_path() {
        let restored = Cell::new(0);
        assert!(setup(&restored, true).is_err());
        assert_eq!(restored.get(), 1);
    }

    #[test]
    fn test_restore_runs_once_on_success() {
        let restored = Cell::new(0);
        setup(&restored, false).unwrap();
        assert_eq!(restored.get(), 1);
    }
}
