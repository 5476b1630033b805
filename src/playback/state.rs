use std::fmt;

/// Externally visible state of the playback controller.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlayState {
    /// The album has nothing playable; only the titles are shown.
    NoTrack,
    /// A main track is playing.
    Playing(usize),
    /// Paused by the user (toggle or explicit stop).
    PausedUser(usize),
    /// The last main track finished; the bonus group waits for play/pause.
    MainEndedAwaitingBonus,
    /// A bonus track is playing.
    BonusPlaying(usize),
    /// The last track finished and playback does not restart on its own.
    Stopped,
}

/// User input the controller reacts to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Transport {
    PlayPause,
    Stop,
    Next,
    Previous,
}

impl fmt::Display for PlayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayState::NoTrack => f.write_str("No playable tracks"),
            PlayState::Playing(_) | PlayState::BonusPlaying(_) => f.write_str("Playing"),
            PlayState::PausedUser(_) => f.write_str("Paused"),
            PlayState::MainEndedAwaitingBonus => f.write_str("Main complete"),
            PlayState::Stopped => f.write_str("Finished"),
        }
    }
}
