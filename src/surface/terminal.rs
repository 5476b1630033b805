use std::fs::OpenOptions;
use std::io::{self, Write};
use std::time::Duration;

use anyhow::Context;
use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::config::DisplaySettings;

use super::{KeyAction, PresentationSurface, SplashPlayer, map_key};

/// Full-screen terminal display, on stdout or on a dedicated tty device.
pub struct TerminalSurface {
    terminal: Terminal<CrosstermBackend<Box<dyn Write>>>,
    /// Raw mode is on and keys are read from this surface.
    keyboard: bool,
    splash: SplashPlayer,
}

impl TerminalSurface {
    pub fn open(display_settings: &DisplaySettings, splash: SplashPlayer) -> anyhow::Result<Self> {
        let out: Box<dyn Write> = match display_settings.tty_path() {
            Some(path) => Box::new(
                OpenOptions::new()
                    .read(true)
                    .write(true)
                    .open(path)
                    .with_context(|| format!("cannot open terminal {}", path.display()))?,
            ),
            None => Box::new(io::stdout()),
        };

        let terminal = Terminal::new(CrosstermBackend::new(out)).context("cannot set up terminal")?;
        let mut surface = Self {
            terminal,
            keyboard: false,
            splash,
        };

        execute!(surface.terminal.backend_mut(), EnterAlternateScreen, Hide)
            .context("cannot enter alternate screen")?;
        if display_settings.keyboard {
            enable_raw_mode().context("cannot enable raw mode")?;
            surface.keyboard = true;
        }
        surface.terminal.clear().context("cannot clear terminal")?;

        info!(
            screen = display_settings.screen_index,
            tty = ?display_settings.tty_path(),
            keyboard = display_settings.keyboard,
            "presentation surface open"
        );
        Ok(surface)
    }
}

impl PresentationSurface for TerminalSurface {
    fn next_key(&mut self) -> anyhow::Result<Option<KeyAction>> {
        if !self.keyboard {
            return Ok(None);
        }
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(action) = map_key(key.code) {
                    return Ok(Some(action));
                }
            }
        }
        Ok(None)
    }

    fn draw(&mut self, render: &mut dyn FnMut(&mut Frame)) -> anyhow::Result<()> {
        self.terminal.draw(|f| render(f))?;
        Ok(())
    }

    fn play_splash(&mut self) -> bool {
        let played = self.splash.play();
        if played {
            // The player drew over us; force a full repaint.
            if let Err(e) = self.terminal.clear() {
                warn!("cannot clear terminal after splash: {e}");
            }
        }
        played
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        if self.keyboard {
            if let Err(e) = disable_raw_mode() {
                warn!("cannot disable raw mode: {e}");
            }
        }
        if let Err(e) = execute!(self.terminal.backend_mut(), LeaveAlternateScreen, Show) {
            warn!("cannot restore terminal: {e}");
        }
    }
}
