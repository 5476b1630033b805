//! Playback state machine: track sequencing, the main/bonus gate, pause/resume
//! and bookmark bookkeeping.

mod clock;
mod controller;
mod state;

pub use clock::{Clock, SystemClock};
pub use controller::PlaybackController;
pub use state::{PlayState, Transport};
