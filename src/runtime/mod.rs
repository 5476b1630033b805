use std::path::Path;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::audio::RodioEngine;
use crate::bookmarks::BookmarkStore;
use crate::config::{self, DisplaySettings, Settings};
use crate::coordinator::ShutdownFlag;
use crate::surface::{SplashPlayer, TerminalSurface};

mod logging;
mod orchestrator;
mod session;
mod settings;
mod signals;
mod views;

pub use logging::init_logging;
pub use orchestrator::run_master;
pub use settings::load_settings;

use session::{AlbumSource, PresentationSession, SessionConfig};
use signals::Termination;
use views::{CoverView, PlayerView};

/// Set by the master on the displays it spawns.
const SUPERVISOR_ENV: &str = "AURION_SUPERVISOR_PID";

/// Which physical display a process drives.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Role {
    /// Player display; owns audio and bookmarks.
    Left,
    /// Cover art display.
    Right,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Left => "left",
            Role::Right => "right",
        }
    }

    pub fn display(self, settings: &Settings) -> &DisplaySettings {
        match self {
            Role::Left => &settings.left,
            Role::Right => &settings.right,
        }
    }
}

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("cannot open presentation surface: {0:#}")]
    Surface(anyhow::Error),

    #[error(transparent)]
    Session(#[from] anyhow::Error),
}

impl DisplayError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            DisplayError::Surface(_) => 2,
            DisplayError::Session(_) => 1,
        }
    }
}

/// Run one display until escape, a termination signal, sibling shutdown or
/// failure.
pub fn run_display(role: Role, settings: &Settings) -> Result<(), DisplayError> {
    let display_settings = role.display(settings);
    let runtime_dir = config::resolve_runtime_dir(settings);
    let session_config = SessionConfig::new(display_settings, settings);
    let source = AlbumSource::new(display_settings.coordination, &session_config, &runtime_dir);
    let shutdown = shutdown_flag(&runtime_dir, std::env::var_os(SUPERVISOR_ENV).is_some());
    let termination = Termination::install();

    info!(
        role = role.as_str(),
        coordination = ?display_settings.coordination,
        "display starting"
    );

    let surface = TerminalSurface::open(display_settings, SplashPlayer::new(settings.splash.clone()))
        .map_err(|e| {
            error!(role = role.as_str(), "cannot open presentation surface: {e:#}");
            DisplayError::Surface(e)
        })?;

    match role {
        Role::Left => {
            let store = BookmarkStore::new(session_config.bookmark_path.clone());
            let library = session_config.library.clone();
            let open = move |descriptor: &Path| -> anyhow::Result<PlayerView<RodioEngine>> {
                let engine = RodioEngine::open_default();
                Ok(PlayerView::open(descriptor, &library, engine, store.clone())?)
            };
            PresentationSession::new(surface, session_config, source, shutdown, termination, open)
                .run()?;
        }
        Role::Right => {
            let open = |descriptor: &Path| -> anyhow::Result<CoverView> {
                Ok(CoverView::open(descriptor)?)
            };
            PresentationSession::new(surface, session_config, source, shutdown, termination, open)
                .run()?;
        }
    }
    Ok(())
}

/// The shutdown flag for a display. Without a master nobody cleared the
/// runtime directory, so a flag left by an earlier run is removed here.
fn shutdown_flag(runtime_dir: &Path, supervised: bool) -> ShutdownFlag {
    let shutdown = ShutdownFlag::new(runtime_dir);
    if !supervised {
        if let Err(e) = shutdown.clear() {
            warn!("cannot clear stale shutdown flag: {e}");
        }
    }
    shutdown
}
