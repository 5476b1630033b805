//! Cross-process handoff between the two displays.
//!
//! Both processes share a runtime directory. The detecting display drops the
//! album descriptor path into a single-slot inbox there; the receiving display
//! polls it once per frame. A shutdown flag in the same directory lets either
//! display ask its sibling to leave.

mod inbox;
mod shutdown;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub use inbox::DisplayCoordinator;
pub use shutdown::ShutdownFlag;

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("coordinator I/O on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("album already published this session")]
    AlreadyPublished,
}
