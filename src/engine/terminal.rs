//! Crossterm terminal backend
//!
//! Terminal state is restored by [`Backend::teardown`], which the main loop
//! guarantees on every exit path, and again on drop if the backend was never
//! run.

use std::io::{self, Stdout, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    self, DisableBracketedPaste, DisableFocusChange, DisableMouseCapture, EnableBracketedPaste,
    EnableFocusChange, EnableMouseCapture, Event,
};
use crossterm::style::Print;
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
    enable_raw_mode,
};
use crossterm::{execute, queue};
use tracing::{debug, warn};

use super::backend::Backend;
use super::surface::TextSurface;
use crate::input::{EventRecord, InputCollector};
use crate::interrupt::InterruptFlag;

/// Runs on the controlling terminal: raw mode, alternate screen, mouse capture
pub struct TerminalBackend {
    stdout: Stdout,
    surface: TextSurface,
    collector: InputCollector,
    active: bool,
}

impl TerminalBackend {
    /// Takes over the terminal
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be put into raw mode or the
    /// alternate screen cannot be entered.
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size().context("Failed to query terminal size")?;
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        let entered = execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableBracketedPaste,
            EnableFocusChange,
            Hide,
            Clear(ClearType::All),
        );
        if let Err(e) = entered {
            let _ = execute!(stdout, LeaveAlternateScreen, Show);
            let _ = disable_raw_mode();
            return Err(e).context("Failed to enter alternate screen");
        }
        debug!(width, height, "Terminal backend ready");

        Ok(Self {
            stdout,
            surface: TextSurface::new(width, height),
            collector: InputCollector::new(),
            active: true,
        })
    }

    /// Ctrl+C raises `flag` instead of producing a `Quit` record
    pub fn with_interrupt(mut self, flag: InterruptFlag) -> Self {
        self.collector = std::mem::take(&mut self.collector).with_interrupt(flag);
        self
    }

    /// Best effort: raw mode is left even if the screen cannot be restored
    fn restore(&mut self) -> Result<()> {
        let screen = execute!(
            self.stdout,
            DisableFocusChange,
            DisableBracketedPaste,
            DisableMouseCapture,
            Show,
            LeaveAlternateScreen,
        )
        .context("Failed to leave alternate screen");
        let raw = disable_raw_mode().context("Failed to disable raw mode");
        screen.and(raw)
    }
}

impl Backend for TerminalBackend {
    type Surface = TextSurface;

    fn poll(&mut self) -> Result<Vec<EventRecord>> {
        let mut records = Vec::new();
        while event::poll(Duration::ZERO).context("Failed to poll terminal events")? {
            let event = event::read().context("Failed to read terminal event")?;
            if let Event::Resize(width, height) = event {
                self.surface.resize(width, height);
            }
            if let Some(record) = self.collector.convert(&event) {
                records.push(record);
            }
        }
        Ok(records)
    }

    fn surface(&mut self) -> &mut TextSurface {
        &mut self.surface
    }

    fn flip(&mut self) -> Result<()> {
        let (_, height) = self.surface.size();
        for y in 0..height {
            queue!(self.stdout, MoveTo(0, y), Print(self.surface.row(y)))?;
        }
        self.stdout.flush().context("Failed to flush terminal")?;
        Ok(())
    }

    fn teardown(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        if let Err(e) = self.restore() {
            warn!(error = %e, "Failed to restore terminal");
        }
    }
}

impl Drop for TerminalBackend {
    fn drop(&mut self) {
        self.teardown();
    }
}
