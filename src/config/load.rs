use std::{
    env,
    path::{Path, PathBuf},
};

use super::schema::{Coordination, Settings};

/// Configuration loading helpers.
///
/// `Settings::load` layers struct defaults, an optional config file and environment
/// variables (prefix `AURION__`), in increasing order of precedence.
impl Settings {
    /// Load settings from defaults, the optional config file and the environment.
    ///
    /// `explicit_path` (from the command line) wins over `AURION_CONFIG_PATH` and XDG defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ::config::ConfigError> {
        let config_path = explicit_path
            .map(Path::to_path_buf)
            .or_else(resolve_config_path);

        // Seeding from the serialized defaults keeps per-display defaults intact when a
        // file only overrides part of the `[right]` section.
        let mut builder =
            ::config::Config::builder().add_source(::config::Config::try_from(&Settings::default())?);

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("AURION")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("media.mount_globs")
                .with_list_parse_key("library.extensions")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.kiosk.fps == 0 {
            return Err("kiosk.fps must be >= 1".to_string());
        }
        if self.media.poll_interval_ms == 0 {
            return Err("media.poll_interval_ms must be >= 1".to_string());
        }
        if self.media.descriptor_name.trim().is_empty() {
            return Err("media.descriptor_name must not be empty".to_string());
        }
        if self
            .library
            .extensions
            .iter()
            .all(|e| e.trim().trim_start_matches('.').is_empty())
        {
            return Err("library.extensions must name at least one extension".to_string());
        }

        // Exactly one side polls the OS for media whenever a handoff is involved.
        use Coordination::*;
        match (self.left.coordination, self.right.coordination) {
            (Standalone, Standalone) | (Detect, Receive) | (Receive, Detect) => Ok(()),
            (left, right) => Err(format!(
                "left.coordination = {left:?} and right.coordination = {right:?} are incompatible; \
                 use detect/receive as a pair or standalone on both"
            )),
        }
    }
}

/// Resolve the config path from `AURION_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("AURION_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/aurion/config.toml`
/// or `~/.config/aurion/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config").map(|d| d.join("aurion").join("config.toml"))
}

/// Bookmark file: the configured path, else `$XDG_DATA_HOME/aurion/bookmarks.json`
/// or `~/.local/share/aurion/bookmarks.json`.
pub fn resolve_bookmarks_path(settings: &Settings) -> PathBuf {
    if let Some(p) = &settings.bookmarks.path {
        return p.clone();
    }
    xdg_dir("XDG_DATA_HOME", ".local/share")
        .unwrap_or_else(env::temp_dir)
        .join("aurion")
        .join("bookmarks.json")
}

/// Directory shared by both displays: the configured one, else
/// `$XDG_RUNTIME_DIR/aurion` or `<tmp>/aurion`.
pub fn resolve_runtime_dir(settings: &Settings) -> PathBuf {
    if let Some(p) = &settings.coordinator.runtime_dir {
        return p.clone();
    }
    env::var_os("XDG_RUNTIME_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(env::temp_dir)
        .join("aurion")
}

/// Log directory: the configured one, else `$XDG_STATE_HOME/aurion` or
/// `~/.local/state/aurion`.
pub fn resolve_log_dir(settings: &Settings) -> PathBuf {
    if let Some(p) = &settings.logging.directory {
        return p.clone();
    }
    xdg_dir("XDG_STATE_HOME", ".local/state")
        .unwrap_or_else(env::temp_dir)
        .join("aurion")
}

fn xdg_dir(var: &str, home_relative: &str) -> Option<PathBuf> {
    if let Some(xdg) = env::var_os(var) {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(home_relative))
    }
}
