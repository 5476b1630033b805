//! Audio engine interface and its `rodio` implementation.

mod engine;
mod sink;

pub use engine::{AudioEngine, AudioError, StartOffset};
pub use sink::RodioEngine;
