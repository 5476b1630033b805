//! Removable-media detection: mount-point globbing and descriptor polling.

mod pattern;
mod watcher;

pub use pattern::{expand, wildcard_match};
pub use watcher::MediaWatcher;

#[cfg(test)]
mod tests;
