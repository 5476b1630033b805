use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use super::key::AlbumKey;

/// Contents of the `album.json` found at the root of a cartridge.
///
/// Title lists are independent of the audio files actually present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AlbumDescriptor {
    pub artist: String,
    pub album: String,
    /// Main-track titles, in play order.
    pub tracks: Vec<String>,
    /// Bonus-track titles, unlocked once the main tracks have played out.
    pub bonus: Vec<String>,
    pub album_id: Option<String>,
    pub cover: Option<String>,
}

impl AlbumDescriptor {
    pub const DEFAULT_COVER: &'static str = "cover.png";

    /// The cover file name, falling back to `cover.png`.
    pub fn cover_name(&self) -> &str {
        self.cover
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(Self::DEFAULT_COVER)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub title: String,
    /// Audio file paired with this title, relative to the album folder.
    pub filename: Option<String>,
    pub duration: Option<Duration>,
}

impl Track {
    /// A track without a paired file can be shown but not played.
    pub fn is_playable(&self) -> bool {
        self.filename.is_some()
    }
}

/// A loaded album: descriptor, paired tracks and bookmark identity.
#[derive(Debug, Clone)]
pub struct Album {
    pub descriptor: AlbumDescriptor,
    pub folder: PathBuf,
    pub tracks: Vec<Track>,
    /// Number of main tracks; tracks at or past this index are bonus tracks.
    pub main_count: usize,
    pub key: AlbumKey,
    /// Read track durations with lofty as each track starts.
    pub probe_durations: bool,
}

impl Album {
    /// Absolute path of the audio file for track `index`, if it has one.
    pub fn track_path(&self, index: usize) -> Option<PathBuf> {
        self.tracks
            .get(index)
            .and_then(|t| t.filename.as_deref())
            .map(|f| self.folder.join(f))
    }

    pub fn cover_path(&self) -> PathBuf {
        self.folder.join(self.descriptor.cover_name())
    }

    pub fn is_bonus(&self, index: usize) -> bool {
        index >= self.main_count
    }

    pub fn has_bonus(&self) -> bool {
        self.tracks.len() > self.main_count
    }

    pub fn has_playable_tracks(&self) -> bool {
        self.tracks.iter().any(Track::is_playable)
    }
}
