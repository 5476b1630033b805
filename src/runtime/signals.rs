use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

/// Set once the process receives SIGINT, SIGTERM or SIGHUP.
///
/// The frame loops poll it so a systemd stop or a closed terminal still runs
/// the normal exit path.
#[derive(Debug, Clone, Default)]
pub struct Termination(Arc<AtomicBool>);

impl Termination {
    /// Register the process-wide handler. Only the first call per process can
    /// succeed; on failure the returned flag simply never fires.
    pub fn install() -> Self {
        let termination = Self::default();
        let flag = Arc::clone(&termination.0);
        if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
            warn!("cannot install termination handler: {e}");
        } else {
            info!("termination handler installed");
        }
        termination
    }

    #[cfg(test)]
    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
