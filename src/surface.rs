//! The presentation surface: where frames are drawn and keys come from.

mod splash;
mod terminal;

use crossterm::event::KeyCode;
use ratatui::Frame;

pub use splash::SplashPlayer;
pub use terminal::TerminalSurface;

use crate::playback::Transport;

/// A key press the session reacts to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Exit,
    Transport(Transport),
}

/// Map a key code to a kiosk action.
pub fn map_key(code: KeyCode) -> Option<KeyAction> {
    let action = match code {
        KeyCode::Esc => KeyAction::Exit,
        KeyCode::Char(' ') | KeyCode::Char('p') => KeyAction::Transport(Transport::PlayPause),
        KeyCode::Char('s') => KeyAction::Transport(Transport::Stop),
        KeyCode::Right | KeyCode::Char('l') => KeyAction::Transport(Transport::Next),
        KeyCode::Left | KeyCode::Char('h') => KeyAction::Transport(Transport::Previous),
        _ => return None,
    };
    Some(action)
}

pub trait PresentationSurface {
    /// Next pending key action, without waiting.
    fn next_key(&mut self) -> anyhow::Result<Option<KeyAction>>;

    /// Draw one frame.
    fn draw(&mut self, render: &mut dyn FnMut(&mut Frame)) -> anyhow::Result<()>;

    /// Play the splash clip, bounded in time. Returns whether anything played.
    ///
    /// Surfaces without a video capability play nothing.
    fn play_splash(&mut self) -> bool {
        false
    }
}
