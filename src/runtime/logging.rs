use std::env;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::{self, Settings};

fn create_env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(default).unwrap_or_else(|err| {
            eprintln!("aurion: invalid log filter '{default}': {err}");
            EnvFilter::new("info")
        })
    })
}

/// Install the global subscriber for one process role.
///
/// The terminal belongs to the display, so events go to
/// `<log dir>/aurion-<role>.log`, else the same name under the temp directory.
/// When neither can be opened events are discarded. Returns the log file in use.
pub fn init_logging(settings: &Settings, role: &str) -> Option<PathBuf> {
    let filter = create_env_filter(&settings.logging.filter);
    let name = format!("aurion-{role}.log");
    let candidates = [
        config::resolve_log_dir(settings),
        env::temp_dir().join("aurion"),
    ];

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_ansi(false);
    match open_log_file(&candidates, &name) {
        Some((path, file)) => {
            let installed = builder.with_writer(Mutex::new(file)).try_init();
            installed.ok().map(|()| path)
        }
        None => {
            let _ = builder.with_writer(io::sink).try_init();
            None
        }
    }
}

/// First of `dirs` where `name` can be opened for appending.
fn open_log_file(dirs: &[PathBuf], name: &str) -> Option<(PathBuf, File)> {
    dirs.iter().find_map(|dir| {
        let path = dir.join(name);
        let opened = fs::create_dir_all(dir).and_then(|()| {
            OpenOptions::new().create(true).append(true).open(&path)
        });
        match opened {
            Ok(file) => Some((path, file)),
            Err(e) => {
                // Logging is not up yet and the screen is not taken over.
                eprintln!("aurion: cannot open log file {}: {e}", path.display());
                None
            }
        }
    })
}
