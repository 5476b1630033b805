use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::config::{self, Coordination, DisplaySettings, LibrarySettings, Settings};
use crate::coordinator::{DisplayCoordinator, ShutdownFlag};
use crate::media::MediaWatcher;
use crate::surface::{KeyAction, PresentationSurface};
use crate::ui::{self, IdleScreen};

use super::signals::Termination;
use super::views::PayloadView;

/// Everything one display session needs, resolved up front.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub screen_index: u32,
    pub greeting: String,
    pub mount_globs: Vec<String>,
    pub bookmark_path: PathBuf,
    pub descriptor_name: String,
    pub poll_interval: Duration,
    pub frame_budget: Duration,
    pub library: LibrarySettings,
}

impl SessionConfig {
    pub fn new(display: &DisplaySettings, settings: &Settings) -> Self {
        Self {
            screen_index: display.screen_index,
            greeting: settings.kiosk.greeting.clone(),
            mount_globs: settings.media.mount_globs.clone(),
            bookmark_path: config::resolve_bookmarks_path(settings),
            descriptor_name: settings.media.descriptor_name.clone(),
            poll_interval: Duration::from_millis(settings.media.poll_interval_ms),
            frame_budget: Duration::from_secs(1) / settings.kiosk.fps.max(1),
            library: settings.library.clone(),
        }
    }
}

/// Where a display learns which album was inserted.
pub enum AlbumSource {
    /// Watch the mounts; no sibling involved.
    Watch(MediaWatcher),
    /// Watch the mounts and hand the album to the sibling display.
    WatchAndPublish(MediaWatcher, DisplayCoordinator),
    /// Wait for the sibling display to hand over the album.
    Inbox(DisplayCoordinator),
}

impl AlbumSource {
    pub fn new(coordination: Coordination, config: &SessionConfig, runtime_dir: &Path) -> Self {
        let watcher = || {
            MediaWatcher::new(
                config.mount_globs.clone(),
                config.descriptor_name.clone(),
                config.poll_interval,
            )
        };
        match coordination {
            Coordination::Standalone => AlbumSource::Watch(watcher()),
            Coordination::Detect => {
                AlbumSource::WatchAndPublish(watcher(), DisplayCoordinator::new(runtime_dir))
            }
            Coordination::Receive => AlbumSource::Inbox(DisplayCoordinator::new(runtime_dir)),
        }
    }

    fn poll(&mut self, now: Instant) -> Option<PathBuf> {
        match self {
            AlbumSource::Watch(w) | AlbumSource::WatchAndPublish(w, _) => w.poll(now),
            AlbumSource::Inbox(c) => c.try_receive(),
        }
    }

    /// The album at `descriptor` is now on screen.
    fn accepted(&mut self, descriptor: &Path) {
        if let AlbumSource::WatchAndPublish(_, coordinator) = self {
            if let Err(e) = coordinator.publish(descriptor) {
                warn!("cannot hand album to sibling display: {e}");
            }
        }
    }

    /// The album at `descriptor` could not be opened.
    fn rejected(&mut self, descriptor: PathBuf) {
        match self {
            AlbumSource::Watch(w) | AlbumSource::WatchAndPublish(w, _) => {
                w.ignore(descriptor);
                w.reset();
            }
            // The message is consumed; keep waiting.
            AlbumSource::Inbox(_) => {}
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// One display's frame loop: idle screen until an album arrives, then the
/// payload view, until escape, a termination signal or the sibling's shutdown
/// flag.
pub struct PresentationSession<S, V, F>
where
    S: PresentationSurface,
    V: PayloadView,
    F: FnMut(&Path) -> anyhow::Result<V>,
{
    surface: S,
    config: SessionConfig,
    source: AlbumSource,
    shutdown: ShutdownFlag,
    termination: Termination,
    open_view: F,
    idle: IdleScreen,
    view: Option<V>,
}

impl<S, V, F> PresentationSession<S, V, F>
where
    S: PresentationSurface,
    V: PayloadView,
    F: FnMut(&Path) -> anyhow::Result<V>,
{
    pub fn new(
        surface: S,
        config: SessionConfig,
        source: AlbumSource,
        shutdown: ShutdownFlag,
        termination: Termination,
        open_view: F,
    ) -> Self {
        let idle = IdleScreen::new(&config.greeting);
        Self {
            surface,
            config,
            source,
            shutdown,
            termination,
            open_view,
            idle,
            view: None,
        }
    }

    /// Run until exit. The payload view is closed on the way out, error or not.
    pub fn run(&mut self) -> anyhow::Result<()> {
        info!(screen = self.config.screen_index, "session started");
        self.surface.play_splash();

        let result = loop {
            let started = Instant::now();
            match self.step(started) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => break Ok(()),
                Err(e) => break Err(e),
            }
            if let Some(rest) = self.config.frame_budget.checked_sub(started.elapsed()) {
                thread::sleep(rest);
            }
        };

        self.close();
        result
    }

    /// One frame: shutdown check, input, album events, render.
    pub fn step(&mut self, now: Instant) -> anyhow::Result<Flow> {
        if self.termination.is_requested() {
            info!("termination signal received");
            return Ok(Flow::Exit);
        }
        if self.shutdown.is_raised() {
            info!("sibling display asked to shut down");
            return Ok(Flow::Exit);
        }

        while let Some(action) = self.surface.next_key()? {
            match action {
                KeyAction::Exit => {
                    info!("exit requested");
                    if let Err(e) = self.shutdown.raise() {
                        warn!("cannot signal sibling display: {e}");
                    }
                    return Ok(Flow::Exit);
                }
                KeyAction::Transport(input) => {
                    if let Some(view) = self.view.as_mut() {
                        view.on_key(input);
                    }
                }
            }
        }

        match self.view.as_mut() {
            Some(view) => view.tick(),
            None => {
                self.poll_album(now);
                self.idle.advance();
            }
        }

        let Self {
            surface, view, idle, ..
        } = self;
        surface.draw(&mut |frame| match view.as_mut() {
            Some(view) => view.draw(frame),
            None => ui::draw_idle(frame, idle),
        })?;

        Ok(Flow::Continue)
    }

    fn poll_album(&mut self, now: Instant) {
        let Some(descriptor) = self.source.poll(now) else {
            return;
        };
        match (self.open_view)(&descriptor) {
            Ok(view) => {
                self.source.accepted(&descriptor);
                self.view = Some(view);
            }
            Err(e) => {
                warn!(descriptor = %descriptor.display(), "cannot open album: {e:#}");
                self.source.rejected(descriptor);
            }
        }
    }

    fn close(&mut self) {
        if let Some(view) = self.view.as_mut() {
            view.close();
        }
        info!(screen = self.config.screen_index, "session ended");
    }
}
