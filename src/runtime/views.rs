use std::path::Path;

use ratatui::Frame;
use tracing::{info, warn};

use crate::audio::AudioEngine;
use crate::bookmarks::BookmarkStore;
use crate::config::LibrarySettings;
use crate::library::{self, CatalogError};
use crate::playback::{Clock, PlaybackController, SystemClock, Transport};
use crate::ui::{self, CoverArt, NowPlaying};

/// What a display shows once an album is present.
pub trait PayloadView {
    fn on_key(&mut self, _input: Transport) {}

    /// Called once per frame before drawing.
    fn tick(&mut self) {}

    fn draw(&mut self, frame: &mut Frame);

    /// The session is ending.
    fn close(&mut self) {}
}

/// Music player: owns the audio engine and the album's bookmark.
pub struct PlayerView<E: AudioEngine, C: Clock = SystemClock> {
    controller: PlaybackController<E, C>,
}

impl<E: AudioEngine> PlayerView<E> {
    pub fn open(
        descriptor: &Path,
        library: &LibrarySettings,
        engine: E,
        store: BookmarkStore,
    ) -> Result<Self, CatalogError> {
        let album = library::load_album(descriptor, library)?;
        info!(
            album = %album.descriptor.album,
            artist = %album.descriptor.artist,
            "starting player"
        );
        Ok(Self::new(PlaybackController::new(album, engine, store)))
    }
}

impl<E: AudioEngine, C: Clock> PlayerView<E, C> {
    pub fn new(controller: PlaybackController<E, C>) -> Self {
        Self { controller }
    }

    pub fn now_playing(&self) -> NowPlaying {
        let c = &self.controller;
        let track = c.current_track();
        NowPlaying {
            number: c.index() + 1,
            title: track.title.clone(),
            elapsed: c.elapsed(),
            total: track.duration,
            album: c.album().descriptor.album.clone(),
            artist: c.album().descriptor.artist.clone(),
            state: c.state(),
        }
    }
}

impl<E: AudioEngine, C: Clock> PayloadView for PlayerView<E, C> {
    fn on_key(&mut self, input: Transport) {
        self.controller.handle(input);
    }

    fn tick(&mut self) {
        self.controller.tick();
    }

    fn draw(&mut self, frame: &mut Frame) {
        ui::draw_player(frame, &self.now_playing());
    }

    fn close(&mut self) {
        self.controller.close();
    }
}

/// Cover art display; ignores transport keys.
pub struct CoverView {
    art: Option<CoverArt>,
    message: String,
}

impl CoverView {
    /// Read the descriptor for its cover name; the image sits next to it.
    pub fn open(descriptor: &Path) -> Result<Self, CatalogError> {
        let meta = library::load_descriptor(descriptor)?;
        let folder = descriptor.parent().unwrap_or(Path::new("."));
        Ok(Self::from_file(&folder.join(meta.cover_name()), meta.cover_name()))
    }

    pub fn from_file(path: &Path, name: &str) -> Self {
        match CoverArt::open(path) {
            Ok(art) => {
                info!(cover = %path.display(), "cover loaded");
                Self {
                    art: Some(art),
                    message: String::new(),
                }
            }
            Err(e) => {
                warn!(cover = %path.display(), "cannot load cover: {e}");
                Self {
                    art: None,
                    message: format!("Cover not found: {name}"),
                }
            }
        }
    }
}

impl PayloadView for CoverView {
    fn draw(&mut self, frame: &mut Frame) {
        match &mut self.art {
            Some(art) => ui::draw_cover(frame, art),
            None => ui::draw_message(frame, &self.message),
        }
    }
}
