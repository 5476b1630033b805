use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Top-level kiosk settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/aurion/config.toml` or `~/.config/aurion/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `AURION__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub kiosk: KioskSettings,
    pub left: DisplaySettings,
    pub right: DisplaySettings,
    pub media: MediaSettings,
    pub library: LibrarySettings,
    pub bookmarks: BookmarkSettings,
    pub splash: SplashSettings,
    pub coordinator: CoordinatorSettings,
    pub logging: LoggingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            kiosk: KioskSettings::default(),
            left: DisplaySettings::left(),
            right: DisplaySettings::right(),
            media: MediaSettings::default(),
            library: LibrarySettings::default(),
            bookmarks: BookmarkSettings::default(),
            splash: SplashSettings::default(),
            coordinator: CoordinatorSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct KioskSettings {
    /// Name shown in the idle screen's "Welcome ..." line.
    pub greeting: String,
    /// Frame rate of the cooperative render loop.
    pub fps: u32,
}

impl Default for KioskSettings {
    fn default() -> Self {
        Self {
            greeting: "Commander".to_string(),
            fps: 30,
        }
    }
}

/// How a display learns which album was inserted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Coordination {
    /// Watch removable media itself; no sibling involved.
    Standalone,
    /// Watch removable media and hand the album over to the sibling.
    #[serde(alias = "detector")]
    Detect,
    /// Never watch media; wait for the sibling's handoff.
    #[serde(alias = "receiver")]
    Receive,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Physical screen this display is meant for (reported in logs).
    pub screen_index: u32,
    /// Terminal device to draw on. Unset (or empty) draws on the process's stdout.
    pub tty: Option<PathBuf>,
    /// Whether this display reads the keyboard (only one display should).
    pub keyboard: bool,
    pub coordination: Coordination,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self::left()
    }
}

impl DisplaySettings {
    /// Defaults for the player/text display.
    pub fn left() -> Self {
        Self {
            screen_index: 0,
            tty: None,
            keyboard: true,
            coordination: Coordination::Receive,
        }
    }

    /// Defaults for the cover-art display.
    pub fn right() -> Self {
        Self {
            screen_index: 1,
            tty: Some(PathBuf::from("/dev/tty2")),
            keyboard: false,
            coordination: Coordination::Detect,
        }
    }

    /// The configured terminal device, if any.
    pub fn tty_path(&self) -> Option<&Path> {
        self.tty.as_deref().filter(|p| !p.as_os_str().is_empty())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MediaSettings {
    /// Mount-point patterns searched in order; `*` and `?` are allowed in any component.
    pub mount_globs: Vec<String>,
    /// Descriptor file expected at the root of a mount point.
    pub descriptor_name: String,
    /// Poll cadence for removable media (milliseconds).
    pub poll_interval_ms: u64,
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            mount_globs: vec![
                "/media/pi/*".to_string(),
                "/media/*/*".to_string(),
                "/mnt/*".to_string(),
            ],
            descriptor_name: "album.json".to_string(),
            poll_interval_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Read each track's duration from its file header when the track starts.
    pub read_durations: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into()],
            read_durations: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BookmarkSettings {
    /// Bookmark file. Defaults to `$XDG_DATA_HOME/aurion/bookmarks.json`.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SplashSettings {
    /// Splash clip shown before the idle screen. Unset disables the splash.
    pub clip: Option<PathBuf>,
    /// Upper bound for the clip, in seconds.
    pub max_seconds: u64,
    /// Player command templates tried in order. `{clip}` and `{seconds}` are substituted.
    pub commands: Vec<String>,
}

impl Default for SplashSettings {
    fn default() -> Self {
        Self {
            clip: None,
            max_seconds: 8,
            commands: vec![
                "cvlc --intf dummy --no-osd --no-video-title-show --video-on-top --fullscreen \
                 --start-time=0 --stop-time={seconds} --play-and-exit {clip}"
                    .to_string(),
                "omxplayer --no-osd --aspect-mode fill {clip}".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CoordinatorSettings {
    /// Directory shared by both displays for the album inbox and the shutdown flag.
    /// Defaults to `$XDG_RUNTIME_DIR/aurion` or `<tmp>/aurion`.
    pub runtime_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing` filter directive, overridden by `RUST_LOG`.
    pub filter: String,
    /// Directory for per-display log files. Defaults to `$XDG_STATE_HOME/aurion`.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            directory: None,
        }
    }
}
