use std::path::Path;

use crate::config;

/// Load the effective settings, falling back to defaults when the config is
/// unreadable or invalid.
///
/// Logging is configured from these settings, so the reason for a fallback is
/// handed back for the caller to log once logging is up.
pub fn load_settings(explicit_path: Option<&Path>) -> (config::Settings, Option<String>) {
    match config::Settings::load(explicit_path) {
        Ok(s) => match s.validate() {
            Ok(()) => (s, None),
            Err(msg) => (
                config::Settings::default(),
                Some(format!("invalid config, using defaults: {msg}")),
            ),
        },
        // Config is optional; failures should not prevent the kiosk from starting.
        Err(e) => (
            config::Settings::default(),
            Some(format!("failed to load config, using defaults: {e}")),
        ),
    }
}
