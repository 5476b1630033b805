//! The narrow audio interface the playback controller depends on.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device available")]
    NoOutputDevice,

    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path:?}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("nothing loaded")]
    NothingLoaded,
}

/// Where playback actually began after `play` was asked to start at an offset.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StartOffset {
    /// The requested offset was honoured.
    Requested,
    /// The source could not seek; playback began at zero.
    Beginning,
}

/// An opaque asynchronous audio device.
///
/// None of these calls may block the render loop for longer than a frame.
pub trait AudioEngine {
    /// Open and decode `path`, replacing whatever was loaded before.
    fn load(&mut self, path: &Path) -> Result<(), AudioError>;
    /// Start the loaded file at `start`.
    fn play(&mut self, start: Duration) -> Result<StartOffset, AudioError>;
    fn pause(&mut self);
    fn unpause(&mut self);
    fn stop(&mut self);
    /// True while a track is loaded and has not played out (paused counts as busy).
    fn is_busy(&self) -> bool;
    /// Position inside the current track, if the engine can tell.
    fn position(&self) -> Option<Duration>;
}
