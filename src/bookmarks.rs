//! Persistent resume points, keyed by album.
//!
//! The whole map is loaded and saved at once; there are no partial updates.
//! Only the audio-owning display writes this file.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Bookmark {
    /// Track index within the album.
    pub track: usize,
    /// Position inside the track, in whole seconds.
    pub pos: u64,
}

/// Album key -> resume point.
pub type Bookmarks = BTreeMap<String, Bookmark>;

#[derive(Debug, Error)]
pub enum BookmarkError {
    #[error("cannot write bookmarks to {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot encode bookmarks: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct BookmarkStore {
    path: PathBuf,
}

impl BookmarkStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Best-effort load: a missing or unreadable file yields an empty map.
    pub fn load(&self) -> Bookmarks {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no bookmark file yet");
                return Bookmarks::new();
            }
            Err(e) => {
                warn!(path = %self.path.display(), "cannot read bookmarks, starting fresh: {e}");
                return Bookmarks::new();
            }
        };

        serde_json::from_str(&text).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), "corrupt bookmark file, starting fresh: {e}");
            Bookmarks::new()
        })
    }

    /// Replace the file with `bookmarks`.
    ///
    /// The map is written to a sibling temporary file which is then renamed over
    /// the target, so a crash mid-save leaves the previous file intact.
    pub fn save(&self, bookmarks: &Bookmarks) -> Result<(), BookmarkError> {
        let json = serde_json::to_string_pretty(bookmarks)?;
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let io_err = |source| BookmarkError::Io {
            path: self.path.clone(),
            source,
        };

        fs::create_dir_all(dir).map_err(io_err)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(json.as_bytes()).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;

        debug!(path = %self.path.display(), entries = bookmarks.len(), "bookmarks saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn load_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = BookmarkStore::new(dir.path().join("bookmarks.json"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn load_corrupt_file_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bookmarks.json");
        fs::write(&path, "{ \"k\": { \"track\": \"one\" ").unwrap();

        assert!(BookmarkStore::new(path).load().is_empty());
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config").join("nested").join("bookmarks.json");
        let store = BookmarkStore::new(&path);

        let mut map = Bookmarks::new();
        map.insert("drift-01".into(), Bookmark { track: 2, pos: 95 });
        store.save(&map).unwrap();

        assert!(path.is_file());
        assert_eq!(store.load(), map);
    }

    #[test]
    fn file_format_uses_track_and_pos_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bookmarks.json");
        fs::write(&path, r#"{ "abc": { "track": 3, "pos": 42 } }"#).unwrap();

        let map = BookmarkStore::new(&path).load();
        assert_eq!(map.get("abc"), Some(&Bookmark { track: 3, pos: 42 }));

        let store = BookmarkStore::new(&path);
        store.save(&map).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["abc"]["track"], 3);
        assert_eq!(value["abc"]["pos"], 42);
    }

    #[test]
    fn save_overwrites_whole_map() {
        let dir = tempdir().unwrap();
        let store = BookmarkStore::new(dir.path().join("bookmarks.json"));

        let mut first = Bookmarks::new();
        first.insert("a".into(), Bookmark { track: 1, pos: 1 });
        first.insert("b".into(), Bookmark { track: 2, pos: 2 });
        store.save(&first).unwrap();

        let mut second = Bookmarks::new();
        second.insert("b".into(), Bookmark { track: 5, pos: 9 });
        store.save(&second).unwrap();

        assert_eq!(store.load(), second);
    }
}
