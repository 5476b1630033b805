use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::file::AudioFile;
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::key::AlbumKey;
use super::model::{Album, AlbumDescriptor, Track};

/// Title shown when a descriptor lists no tracks at all.
pub const PLACEHOLDER_TITLE: &str = "(No tracks)";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("cannot read album descriptor {path:?}: {source}")]
    Descriptor {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid album descriptor {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot list album folder {path:?}: {source}")]
    Folder {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

pub fn load_descriptor(path: &Path) -> Result<AlbumDescriptor, CatalogError> {
    let text = fs::read_to_string(path).map_err(|source| CatalogError::Descriptor {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the album whose descriptor lives at `descriptor_path`; audio files are
/// expected next to it.
pub fn load_album(descriptor_path: &Path, settings: &LibrarySettings) -> Result<Album, CatalogError> {
    let descriptor = load_descriptor(descriptor_path)?;
    let folder = descriptor_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let files = list_audio_files(&folder, settings)?;
    let (tracks, main_count) = pair_titles_with_files(&descriptor.tracks, &descriptor.bonus, &files);

    let key = AlbumKey::derive(descriptor.album_id.as_deref(), &folder);
    debug!(
        album = %descriptor.album,
        %key,
        tracks = tracks.len(),
        main_count,
        files = files.len(),
        "album loaded"
    );
    if files.is_empty() {
        warn!(folder = %folder.display(), "album folder contains no audio files");
    }

    Ok(Album {
        descriptor,
        folder,
        tracks,
        main_count,
        key,
        probe_durations: settings.read_durations,
    })
}

impl Album {
    /// Fill in the duration of track `index` from its audio file.
    ///
    /// Reads one file header, so it runs when a track starts rather than for
    /// the whole album at load time.
    pub fn probe_duration(&mut self, index: usize) {
        if !self.probe_durations {
            return;
        }
        let Some(path) = self.track_path(index) else {
            return;
        };
        if let Some(track) = self.tracks.get_mut(index) {
            if track.duration.is_none() {
                track.duration = read_duration(&path);
            }
        }
    }
}

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

/// Audio file names directly inside `folder`, sorted lexicographically.
///
/// The sort order is what maps the Nth title to the Nth file, so cartridges are
/// expected to use zero-padded numeric prefixes.
pub fn list_audio_files(folder: &Path, settings: &LibrarySettings) -> Result<Vec<String>, CatalogError> {
    let mut files: Vec<String> = Vec::new();

    for entry in WalkDir::new(folder).min_depth(1).max_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            // The folder itself is unreadable: the album cannot be loaded.
            Err(source) if source.depth() == 0 => {
                return Err(CatalogError::Folder {
                    path: folder.to_path_buf(),
                    source,
                });
            }
            Err(e) => {
                debug!("skipping unreadable entry: {e}");
                continue;
            }
        };

        let path = entry.path();
        if path.is_file() && is_audio_file(path, settings) {
            if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
                files.push(name.to_string());
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Zip main titles then bonus titles against `files`, position for position.
///
/// Returns the tracks and the main-track count. Titles past the end of `files`
/// get no filename; an album without titles gets a single placeholder.
pub fn pair_titles_with_files(
    main_titles: &[String],
    bonus_titles: &[String],
    files: &[String],
) -> (Vec<Track>, usize) {
    if main_titles.is_empty() && bonus_titles.is_empty() {
        let placeholder = Track {
            title: PLACEHOLDER_TITLE.to_string(),
            filename: None,
            duration: None,
        };
        return (vec![placeholder], 0);
    }

    let tracks = main_titles
        .iter()
        .chain(bonus_titles)
        .enumerate()
        .map(|(i, title)| Track {
            title: title.clone(),
            filename: files.get(i).cloned(),
            duration: None,
        })
        .collect();

    (tracks, main_titles.len())
}

fn read_duration(path: &Path) -> Option<Duration> {
    match lofty::read_from_path(path) {
        Ok(tagged) => Some(tagged.properties().duration()).filter(|d| !d.is_zero()),
        Err(e) => {
            debug!(path = %path.display(), "no duration: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn titles(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn is_audio_file_matches_configured_extensions_case_insensitive() {
        let settings = LibrarySettings::default();
        assert!(is_audio_file(Path::new("/tmp/01.mp3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/01.MP3"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/01.ogg"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/album.json"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/mp3"), &settings));

        let settings = LibrarySettings {
            extensions: vec![".OGG".into()],
            ..LibrarySettings::default()
        };
        assert!(is_audio_file(Path::new("/tmp/01.ogg"), &settings));
    }

    #[test]
    fn list_audio_files_sorts_lexicographically_and_skips_other_files() {
        let dir = tempdir().unwrap();
        for name in ["10-ten.mp3", "02-two.mp3", "01-one.mp3", "cover.png", "album.json"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("00-dir.mp3")).unwrap();

        let files = list_audio_files(dir.path(), &LibrarySettings::default()).unwrap();
        assert_eq!(files, titles(&["01-one.mp3", "02-two.mp3", "10-ten.mp3"]));
    }

    #[test]
    fn list_audio_files_fails_for_missing_folder() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("gone");
        let err = list_audio_files(&missing, &LibrarySettings::default()).unwrap_err();
        assert!(matches!(err, CatalogError::Folder { .. }));
    }

    #[test]
    fn pairing_places_bonus_after_main() {
        let files = titles(&["1.mp3", "2.mp3", "3.mp3"]);
        let (tracks, main_count) = pair_titles_with_files(&titles(&["A", "B"]), &titles(&["C"]), &files);

        assert_eq!(main_count, 2);
        assert_eq!(tracks.len(), 3);
        assert_eq!(tracks[0].filename.as_deref(), Some("1.mp3"));
        assert_eq!(tracks[1].filename.as_deref(), Some("2.mp3"));
        assert_eq!(tracks[2].title, "C");
        assert_eq!(tracks[2].filename.as_deref(), Some("3.mp3"));
    }

    #[test]
    fn pairing_leaves_titles_past_the_last_file_unplayable() {
        let files = titles(&["1.mp3"]);
        let (tracks, main_count) =
            pair_titles_with_files(&titles(&["A", "B"]), &titles(&["C", "D"]), &files);

        assert_eq!(main_count, 2);
        assert_eq!(tracks.len(), 4);
        assert!(tracks[0].is_playable());
        assert!(tracks[1..].iter().all(|t| !t.is_playable()));
    }

    #[test]
    fn pairing_counts_hold_for_any_mix_of_titles_and_files() {
        for m in 0..4 {
            for b in 0..4 {
                for f in 0..6 {
                    let main: Vec<String> = (0..m).map(|i| format!("m{i}")).collect();
                    let bonus: Vec<String> = (0..b).map(|i| format!("b{i}")).collect();
                    let files: Vec<String> = (0..f).map(|i| format!("{i:02}.mp3")).collect();

                    let (tracks, main_count) = pair_titles_with_files(&main, &bonus, &files);
                    assert_eq!(main_count, m);
                    if m + b == 0 {
                        assert_eq!(tracks.len(), 1);
                        assert!(!tracks[0].is_playable());
                        continue;
                    }
                    assert_eq!(tracks.len(), m + b);
                    for (i, t) in tracks.iter().enumerate() {
                        assert_eq!(t.filename.as_ref(), files.get(i), "m={m} b={b} f={f} i={i}");
                    }
                }
            }
        }
    }

    #[test]
    fn empty_descriptor_yields_placeholder() {
        let (tracks, main_count) = pair_titles_with_files(&[], &[], &titles(&["1.mp3"]));
        assert_eq!(main_count, 0);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].title, PLACEHOLDER_TITLE);
        assert_eq!(tracks[0].filename, None);
    }
}
