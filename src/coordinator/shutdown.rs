use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing::info;

use super::CoordinatorError;

const FLAG_FILE: &str = "shutdown";
/// File timestamps come from a coarser clock than `SystemTime::now`.
const CLOCK_SLACK: Duration = Duration::from_secs(1);

/// Process-wide "please exit" marker in the shared runtime directory.
///
/// Only a flag raised after this handle was created counts, so a marker left
/// behind by an earlier run never stops a fresh display.
#[derive(Debug, Clone)]
pub struct ShutdownFlag {
    path: PathBuf,
    since: SystemTime,
}

impl ShutdownFlag {
    pub fn new(dir: &Path) -> Self {
        Self::since(dir, SystemTime::now())
    }

    pub(super) fn since(dir: &Path, since: SystemTime) -> Self {
        Self {
            path: dir.join(FLAG_FILE),
            since,
        }
    }

    pub fn raise(&self) -> Result<(), CoordinatorError> {
        let io_err = |source| CoordinatorError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        fs::write(&self.path, std::process::id().to_string()).map_err(io_err)?;
        info!(path = %self.path.display(), "shutdown flag raised");
        Ok(())
    }

    pub fn is_raised(&self) -> bool {
        fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .is_ok_and(|raised| raised + CLOCK_SLACK >= self.since)
    }

    pub fn clear(&self) -> Result<(), CoordinatorError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(CoordinatorError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}
