use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::CoordinatorError;

const INBOX_FILE: &str = "album.inbox";
const CLAIMED_FILE: &str = "album.inbox.claimed";

/// Single-slot album inbox shared by the two display processes.
#[derive(Debug)]
pub struct DisplayCoordinator {
    dir: PathBuf,
    published: bool,
}

impl DisplayCoordinator {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            published: false,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn inbox_path(&self) -> PathBuf {
        self.dir.join(INBOX_FILE)
    }

    /// Hand `album` to the sibling. Never blocks on the reader.
    ///
    /// The path is written to a temporary file and renamed into the slot, so the
    /// reader sees either nothing or the whole path.
    pub fn publish(&mut self, album: &Path) -> Result<(), CoordinatorError> {
        if self.published {
            return Err(CoordinatorError::AlreadyPublished);
        }

        let target = self.inbox_path();
        let io_err = |source| CoordinatorError::Io {
            path: target.clone(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(io_err)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir).map_err(io_err)?;
        writeln!(tmp, "{}", album.display()).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&target).map_err(|e| io_err(e.error))?;

        self.published = true;
        info!(album = %album.display(), "album published to sibling display");
        Ok(())
    }

    /// Take the pending album path, if any. The slot is emptied by the read.
    ///
    /// Any failure other than an empty slot is logged and reported as "nothing
    /// yet" so the caller just keeps waiting.
    pub fn try_receive(&self) -> Option<PathBuf> {
        let claimed = self.dir.join(CLAIMED_FILE);
        match fs::rename(self.inbox_path(), &claimed) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(dir = %self.dir.display(), "cannot claim inbox: {e}");
                return None;
            }
        }

        let text = fs::read_to_string(&claimed);
        if let Err(e) = fs::remove_file(&claimed) {
            debug!("cannot remove claimed inbox: {e}");
        }

        match text {
            Ok(text) => {
                let path = text.trim();
                if path.is_empty() {
                    warn!("empty album message ignored");
                    None
                } else {
                    info!(album = path, "album received from sibling display");
                    Some(PathBuf::from(path))
                }
            }
            Err(e) => {
                warn!("cannot read claimed inbox: {e}");
                None
            }
        }
    }

    /// Drop any message left over from an earlier session.
    pub fn clear(&self) -> Result<(), CoordinatorError> {
        for name in [INBOX_FILE, CLAIMED_FILE] {
            let path = self.dir.join(name);
            match fs::remove_file(&path) {
                Ok(()) => debug!(path = %path.display(), "stale inbox removed"),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(source) => return Err(CoordinatorError::Io { path, source }),
            }
        }
        Ok(())
    }
}
