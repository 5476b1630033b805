use std::path::Path;
use std::process::{Child, Command};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use tracing::{error, info, warn};

use crate::config::{self, Settings};
use crate::coordinator::{DisplayCoordinator, ShutdownFlag};

use super::{Role, SUPERVISOR_ENV};
use super::signals::Termination;

const REAP_INTERVAL: Duration = Duration::from_millis(100);

/// A display child process being supervised.
struct Display {
    role: Role,
    child: Child,
    /// Set once the child is gone: whether it succeeded.
    outcome: Option<bool>,
}

/// Spawn both displays from this binary and wait for them.
///
/// Stale coordination files are removed first. When one display fails the
/// shutdown flag is raised so the other leaves cleanly; a termination signal
/// does the same for both, and the master keeps reaping until they are gone.
/// Returns whether both displays exited successfully.
pub fn run_master(settings: &Settings, config_path: Option<&Path>) -> anyhow::Result<bool> {
    let runtime_dir = config::resolve_runtime_dir(settings);
    let shutdown = ShutdownFlag::new(&runtime_dir);
    DisplayCoordinator::new(&runtime_dir)
        .clear()
        .context("cannot clear stale album inbox")?;
    shutdown.clear().context("cannot clear stale shutdown flag")?;

    let termination = Termination::install();

    let exe = std::env::current_exe().context("cannot locate the aurion binary")?;
    info!(runtime_dir = %runtime_dir.display(), "starting displays");

    let mut displays = Vec::new();
    for role in [Role::Left, Role::Right] {
        match spawn_display(&exe, role, config_path) {
            Ok(child) => displays.push(Display {
                role,
                child,
                outcome: None,
            }),
            Err(e) => {
                error!(role = role.as_str(), "{e:#}");
                raise(&shutdown);
                for d in displays.iter_mut() {
                    let _ = d.child.wait();
                }
                return Ok(false);
            }
        }
    }

    Ok(supervise(&mut displays, &shutdown, &termination))
}

/// Reap `displays` until all have exited, raising `shutdown` on the first
/// failure or termination signal. Returns whether every display succeeded.
fn supervise(displays: &mut [Display], shutdown: &ShutdownFlag, termination: &Termination) -> bool {
    let mut raised = false;
    while displays.iter().any(|d| d.outcome.is_none()) {
        if termination.is_requested() && !raised {
            info!("termination signal received, stopping displays");
            raise(shutdown);
            raised = true;
        }
        for d in displays.iter_mut().filter(|d| d.outcome.is_none()) {
            let ok = match d.child.try_wait() {
                Ok(Some(status)) if status.success() => {
                    info!(role = d.role.as_str(), "display exited");
                    true
                }
                Ok(Some(status)) => {
                    error!(role = d.role.as_str(), %status, "display failed");
                    false
                }
                Ok(None) => continue,
                Err(e) => {
                    error!(role = d.role.as_str(), "cannot poll display: {e}");
                    false
                }
            };
            d.outcome = Some(ok);
            if !ok && !raised {
                raise(shutdown);
                raised = true;
            }
        }
        thread::sleep(REAP_INTERVAL);
    }

    displays.iter().all(|d| d.outcome == Some(true))
}

fn spawn_display(exe: &Path, role: Role, config_path: Option<&Path>) -> anyhow::Result<Child> {
    let mut cmd = Command::new(exe);
    if let Some(path) = config_path {
        cmd.arg("--config").arg(path);
    }
    cmd.arg(role.as_str())
        .env(SUPERVISOR_ENV, std::process::id().to_string());
    let child = cmd
        .spawn()
        .with_context(|| format!("cannot start {} display", role.as_str()))?;
    info!(role = role.as_str(), pid = child.id(), "display started");
    Ok(child)
}

fn raise(shutdown: &ShutdownFlag) {
    if let Err(e) = shutdown.raise() {
        warn!("cannot raise shutdown flag: {e}");
    }
}
