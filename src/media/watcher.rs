use std::collections::HashSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::config::MediaSettings;

use super::pattern::expand;

/// Polls mount points for an album descriptor without blocking the caller.
#[derive(Debug)]
pub struct MediaWatcher {
    patterns: Vec<String>,
    descriptor_name: String,
    interval: Duration,
    last_poll: Option<Instant>,
    ignored: HashSet<PathBuf>,
}

impl MediaWatcher {
    pub fn new(patterns: Vec<String>, descriptor_name: impl Into<String>, interval: Duration) -> Self {
        Self {
            patterns,
            descriptor_name: descriptor_name.into(),
            interval,
            last_poll: None,
            ignored: HashSet::new(),
        }
    }

    pub fn from_settings(media: &MediaSettings) -> Self {
        Self::new(
            media.mount_globs.clone(),
            media.descriptor_name.clone(),
            Duration::from_millis(media.poll_interval_ms),
        )
    }

    /// Scan if the poll interval has elapsed since the previous scan.
    ///
    /// Returns the first descriptor found: earlier patterns win, then the
    /// lexically first mount point.
    pub fn poll(&mut self, now: Instant) -> Option<PathBuf> {
        if let Some(last) = self.last_poll {
            if now.saturating_duration_since(last) < self.interval {
                return None;
            }
        }
        self.last_poll = Some(now);

        // A removed cartridge may be reinserted after a fix.
        self.ignored.retain(|p| p.exists());

        let found = self.find_descriptor();
        if let Some(path) = &found {
            info!(path = %path.display(), "album descriptor found");
        }
        found
    }

    /// One immediate scan, regardless of cadence.
    pub fn find_descriptor(&self) -> Option<PathBuf> {
        self.patterns.iter().find_map(|pattern| {
            expand(pattern)
                .into_iter()
                .map(|mount| mount.join(&self.descriptor_name))
                .find(|candidate| candidate.is_file() && !self.ignored.contains(candidate))
        })
    }

    /// Skip `descriptor` in later scans while it stays present.
    pub fn ignore(&mut self, descriptor: PathBuf) {
        debug!(path = %descriptor.display(), "ignoring descriptor");
        self.ignored.insert(descriptor);
    }

    /// Restart the cadence so the next `poll` scans immediately.
    pub fn reset(&mut self) {
        self.last_poll = None;
    }
}
