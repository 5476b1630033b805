//! The playback/resume state machine.
//!
//! The controller owns the transient playback state of one album and is the
//! only writer of that album's bookmark. It is driven from the frame loop:
//! `tick` once per frame to detect natural track ends, `handle` for user input,
//! `close` (or drop) when the session ends.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::audio::{AudioEngine, StartOffset};
use crate::bookmarks::{Bookmark, BookmarkStore, Bookmarks};
use crate::library::{Album, Track};

use super::clock::{Clock, SystemClock};
use super::state::{PlayState, Transport};

pub struct PlaybackController<E: AudioEngine, C: Clock = SystemClock> {
    album: Album,
    engine: E,
    clock: C,
    store: BookmarkStore,
    bookmarks: Bookmarks,

    index: usize,
    paused: bool,
    awaiting_bonus: bool,
    finished: bool,
    no_track: bool,

    /// Wall-clock reference: while playing, elapsed = now - anchor.
    anchor: Instant,
    /// Elapsed time captured when playback was paused, stopped or ended.
    frozen: Duration,
    /// The engine started where we asked, so its position report can be used.
    engine_position_trusted: bool,
    /// The engine no longer holds the current track (explicit stop).
    engine_stopped: bool,
    /// Loading or starting the current track failed.
    track_failed: bool,
    closed: bool,
}

impl<E: AudioEngine> PlaybackController<E, SystemClock> {
    pub fn new(album: Album, engine: E, store: BookmarkStore) -> Self {
        Self::with_clock(album, engine, store, SystemClock)
    }
}

impl<E: AudioEngine, C: Clock> PlaybackController<E, C> {
    /// Build the controller and start playing, resuming from the album's bookmark
    /// when there is one.
    pub fn with_clock(album: Album, engine: E, store: BookmarkStore, clock: C) -> Self {
        let bookmarks = store.load();
        let now = clock.now();
        let no_track = !album.has_playable_tracks();

        let resume = bookmarks.get(album.key.as_str()).map(|b| {
            let last = album.tracks.len().saturating_sub(1);
            (b.track.min(last), Duration::from_secs(b.pos))
        });

        let mut controller = Self {
            album,
            engine,
            clock,
            store,
            bookmarks,
            index: 0,
            paused: false,
            awaiting_bonus: false,
            finished: false,
            no_track,
            anchor: now,
            frozen: Duration::ZERO,
            engine_position_trusted: false,
            engine_stopped: false,
            track_failed: false,
            closed: false,
        };

        let (index, position) = resume.unwrap_or((0, Duration::ZERO));
        if resume.is_some() {
            info!(
                key = %controller.album.key,
                track = index + 1,
                pos = position.as_secs(),
                "resuming album"
            );
        }

        if controller.no_track {
            warn!(key = %controller.album.key, "album has no playable tracks");
            controller.index = index;
            controller.paused = true;
            controller.frozen = position;
        } else {
            controller.start_track(index, position);
        }
        controller
    }

    pub fn album(&self) -> &Album {
        &self.album
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current_track(&self) -> &Track {
        &self.album.tracks[self.index]
    }

    pub fn state(&self) -> PlayState {
        if self.no_track {
            PlayState::NoTrack
        } else if self.awaiting_bonus {
            PlayState::MainEndedAwaitingBonus
        } else if self.finished {
            PlayState::Stopped
        } else if self.paused {
            PlayState::PausedUser(self.index)
        } else if self.album.is_bonus(self.index) {
            PlayState::BonusPlaying(self.index)
        } else {
            PlayState::Playing(self.index)
        }
    }

    /// Position inside the current track.
    ///
    /// Prefers the engine's own report and falls back to the wall-clock anchor
    /// when the engine cannot tell or did not honour the start offset.
    pub fn elapsed(&self) -> Duration {
        if self.paused || self.finished || self.awaiting_bonus {
            return self.frozen;
        }
        if self.engine_position_trusted {
            if let Some(pos) = self.engine.position() {
                return pos;
            }
        }
        self.clock.now().saturating_duration_since(self.anchor)
    }

    /// The bookmark last written (or loaded) for this album.
    pub fn saved_bookmark(&self) -> Option<Bookmark> {
        self.bookmarks.get(self.album.key.as_str()).copied()
    }

    /// Per-frame check for the natural end of the current track.
    pub fn tick(&mut self) {
        if self.closed || self.no_track || self.paused || self.finished || self.awaiting_bonus {
            return;
        }
        if !self.track_failed && self.engine.is_busy() {
            return;
        }
        self.on_track_end();
    }

    pub fn handle(&mut self, input: Transport) {
        if self.closed {
            return;
        }
        match input {
            Transport::PlayPause => self.toggle(),
            Transport::Stop => self.stop(),
            Transport::Next => {
                self.next();
            }
            Transport::Previous => {
                self.previous();
            }
        }
    }

    pub fn toggle(&mut self) {
        match self.state() {
            PlayState::NoTrack => {}
            PlayState::MainEndedAwaitingBonus => {
                info!(key = %self.album.key, "entering bonus tracks");
                self.awaiting_bonus = false;
                self.start_track(self.album.main_count, Duration::ZERO);
            }
            PlayState::Stopped => self.start_track(self.index, Duration::ZERO),
            PlayState::PausedUser(_) => self.resume(),
            PlayState::Playing(_) | PlayState::BonusPlaying(_) => {
                self.frozen = self.elapsed();
                self.paused = true;
                self.engine.pause();
                debug!(track = self.index + 1, pos = self.frozen.as_secs(), "paused");
            }
        }
    }

    /// Explicit stop: persist the resume point, then silence the engine.
    pub fn stop(&mut self) {
        let playing = matches!(
            self.state(),
            PlayState::Playing(_) | PlayState::BonusPlaying(_)
        );
        if playing {
            self.frozen = self.elapsed();
            self.paused = true;
        }
        self.persist_bookmark();
        if !self.no_track && (playing || self.paused) {
            self.engine.stop();
            self.engine_stopped = true;
        }
    }

    /// Skip forward; false when already on the last track.
    pub fn next(&mut self) -> bool {
        let target = self.index + 1;
        if target >= self.album.tracks.len() {
            return false;
        }
        self.jump_to(target);
        true
    }

    /// Skip back; false when already on the first track.
    pub fn previous(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.jump_to(self.index - 1);
        true
    }

    /// End of session: persist the resume point and release the engine.
    ///
    /// Runs at most once; dropping the controller calls it too.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.persist_bookmark();
        if !self.no_track {
            self.engine.stop();
        }
        self.closed = true;
        info!(key = %self.album.key, "playback closed");
    }

    fn jump_to(&mut self, target: usize) {
        self.awaiting_bonus = false;
        if self.no_track {
            self.index = target;
            self.frozen = Duration::ZERO;
            return;
        }
        self.start_track(target, Duration::ZERO);
    }

    fn resume(&mut self) {
        if self.engine_stopped || self.track_failed {
            // Nothing left in the engine to unpause: restart where we stopped.
            self.start_track(self.index, self.frozen);
            return;
        }
        self.engine.unpause();
        self.anchor = self.anchor_for(self.frozen);
        self.paused = false;
        debug!(track = self.index + 1, pos = self.frozen.as_secs(), "resumed");
    }

    fn on_track_end(&mut self) {
        let next = self.index + 1;
        let main_count = self.album.main_count;

        if next < main_count || (next > main_count && next < self.album.tracks.len()) {
            self.start_track(next, Duration::ZERO);
        } else if next == main_count && self.album.has_bonus() {
            info!(key = %self.album.key, "main tracks complete, waiting for play to start bonus");
            self.frozen = self.elapsed();
            self.engine.stop();
            self.awaiting_bonus = true;
            self.paused = true;
        } else {
            info!(key = %self.album.key, "album finished");
            self.frozen = self.elapsed();
            self.engine.stop();
            self.finished = true;
        }
    }

    fn start_track(&mut self, index: usize, at: Duration) {
        self.engine.stop();
        self.index = index;
        self.paused = false;
        self.finished = false;
        self.engine_stopped = false;
        self.track_failed = false;
        self.engine_position_trusted = false;
        self.frozen = Duration::ZERO;
        self.anchor = self.anchor_for(at);

        let Some(path) = self.album.track_path(index) else {
            debug!(track = index + 1, "no audio file, skipping");
            self.track_failed = true;
            return;
        };

        let started = self
            .engine
            .load(&path)
            .and_then(|()| self.engine.play(at));
        if started.is_ok() {
            self.album.probe_duration(index);
        }
        match started {
            Ok(StartOffset::Requested) => {
                self.engine_position_trusted = true;
                info!(track = index + 1, title = %self.album.tracks[index].title, "playing");
            }
            Ok(StartOffset::Beginning) => {
                info!(
                    track = index + 1,
                    title = %self.album.tracks[index].title,
                    "playing from the top, elapsed time runs from the saved position"
                );
            }
            Err(e) => {
                warn!(track = index + 1, "cannot play {}: {e}", path.display());
                self.track_failed = true;
            }
        }
    }

    fn anchor_for(&self, elapsed: Duration) -> Instant {
        let now = self.clock.now();
        now.checked_sub(elapsed).unwrap_or(now)
    }

    fn persist_bookmark(&mut self) {
        let bookmark = Bookmark {
            track: self.index,
            pos: self.elapsed().as_secs(),
        };
        self.bookmarks
            .insert(self.album.key.as_str().to_string(), bookmark);

        match self.store.save(&self.bookmarks) {
            Ok(()) => debug!(key = %self.album.key, ?bookmark, "bookmark saved"),
            Err(e) => warn!(key = %self.album.key, "bookmark not saved: {e}"),
        }
    }
}

impl<E: AudioEngine, C: Clock> Drop for PlaybackController<E, C> {
    fn drop(&mut self) {
        self.close();
    }
}
