use std::io;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::SplashSettings;

/// Best-effort splash clip playback through an external video player.
#[derive(Debug, Clone)]
pub struct SplashPlayer {
    settings: SplashSettings,
}

impl SplashPlayer {
    pub fn new(settings: SplashSettings) -> Self {
        Self { settings }
    }

    /// Run the first available player on the clip, for at most
    /// `max_seconds`. Returns whether a player ran.
    pub fn play(&self) -> bool {
        let Some(clip) = self.settings.clip.as_deref() else {
            debug!("no splash clip configured");
            return false;
        };
        if !clip.is_file() {
            info!(clip = %clip.display(), "splash clip missing, skipping splash");
            return false;
        }

        let limit = Duration::from_secs(self.settings.max_seconds);
        for argv in command_lines(&self.settings.commands, clip, self.settings.max_seconds) {
            let Some((program, args)) = argv.split_first() else {
                continue;
            };
            let spawned = Command::new(program)
                .args(args)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();
            match spawned {
                Ok(child) => {
                    info!(program = %program, "playing splash");
                    wait_bounded(child, limit);
                    return true;
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!(program = %program, "splash player not installed");
                }
                Err(e) => warn!(program = %program, "cannot start splash player: {e}"),
            }
        }

        info!("no splash player available, skipping splash");
        false
    }
}

/// Expand command templates into argument vectors.
///
/// Templates are split on whitespace; `{clip}` and `{seconds}` are replaced
/// inside each argument, so a clip path with spaces stays one argument.
fn command_lines(templates: &[String], clip: &Path, seconds: u64) -> Vec<Vec<String>> {
    let clip = clip.to_string_lossy();
    let seconds = seconds.to_string();
    templates
        .iter()
        .map(|template| {
            template
                .split_whitespace()
                .map(|arg| arg.replace("{clip}", &clip).replace("{seconds}", &seconds))
                .collect::<Vec<_>>()
        })
        .filter(|argv| !argv.is_empty())
        .collect()
}

fn wait_bounded(mut child: Child, limit: Duration) {
    let deadline = Instant::now() + limit;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                debug!(%status, "splash finished");
                return;
            }
            Ok(None) if Instant::now() >= deadline => {
                debug!("splash time limit reached, stopping player");
                if let Err(e) = child.kill() {
                    warn!("cannot stop splash player: {e}");
                }
                let _ = child.wait();
                return;
            }
            Ok(None) => thread::sleep(Duration::from_millis(50)),
            Err(e) => {
                warn!("cannot wait for splash player: {e}");
                let _ = child.kill();
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn settings(clip: Option<PathBuf>, commands: &[&str], max_seconds: u64) -> SplashSettings {
        SplashSettings {
            clip,
            max_seconds,
            commands: commands.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn templates_substitute_clip_and_seconds() {
        let lines = command_lines(
            &[
                "cvlc --stop-time={seconds} {clip}".to_string(),
                "   ".to_string(),
                "omxplayer {clip}".to_string(),
            ],
            Path::new("/opt/aurion/my splash.mp4"),
            8,
        );
        assert_eq!(
            lines,
            vec![
                vec!["cvlc", "--stop-time=8", "/opt/aurion/my splash.mp4"],
                vec!["omxplayer", "/opt/aurion/my splash.mp4"],
            ]
        );
    }

    #[test]
    fn nothing_plays_without_a_clip() {
        assert!(!SplashPlayer::new(settings(None, &["true"], 8)).play());

        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("splash.mp4");
        assert!(!SplashPlayer::new(settings(Some(missing), &["true"], 8)).play());
    }

    #[cfg(unix)]
    #[test]
    fn missing_players_fall_through_to_the_next() {
        let dir = tempfile::tempdir().unwrap();
        let clip = dir.path().join("splash.mp4");
        fs::write(&clip, b"").unwrap();

        let player = SplashPlayer::new(settings(
            Some(clip.clone()),
            &["aurion-no-such-player {clip}", "true {clip}"],
            8,
        ));
        assert!(player.play());

        let none = SplashPlayer::new(settings(Some(clip), &["aurion-no-such-player {clip}"], 8));
        assert!(!none.play());
    }

    #[cfg(unix)]
    #[test]
    fn long_clips_are_cut_at_the_limit() {
        let dir = tempfile::tempdir().unwrap();
        let clip = dir.path().join("splash.mp4");
        fs::write(&clip, b"").unwrap();

        let player = SplashPlayer::new(settings(Some(clip), &["sleep 30"], 1));
        let started = Instant::now();
        assert!(player.play());
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
