use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

mod audio;
mod bookmarks;
mod config;
mod coordinator;
mod library;
mod media;
mod playback;
mod runtime;
mod surface;
mod ui;

use runtime::Role;

/// Two-screen album kiosk.
#[derive(Parser, Debug)]
#[command(name = "aurion")]
#[command(about = "Resumable album player on one display, cover art on the other")]
#[command(version)]
struct Args {
    /// Config file (TOML)
    #[arg(long, value_name = "PATH", env = "AURION_CONFIG_PATH", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Cmd>,
}

#[derive(Subcommand, Debug, Copy, Clone, PartialEq, Eq)]
enum Cmd {
    /// Start both displays as child processes (default)
    Master,
    /// Run the player display
    Left,
    /// Run the cover art display
    Right,
    /// Print the effective settings as TOML
    PrintConfig,
}

fn print_config(settings: &config::Settings, warning: Option<&str>) -> ExitCode {
    if let Some(w) = warning {
        eprintln!("aurion: {w}");
    }
    match toml::to_string_pretty(settings) {
        Ok(text) => {
            print!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("aurion: cannot render settings: {e}");
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let (settings, warning) = runtime::load_settings(args.config.as_deref());

    let role = match args.command.unwrap_or(Cmd::Master) {
        Cmd::PrintConfig => return print_config(&settings, warning.as_deref()),
        Cmd::Master => None,
        Cmd::Left => Some(Role::Left),
        Cmd::Right => Some(Role::Right),
    };

    let log_file = runtime::init_logging(&settings, role.map_or("master", Role::as_str));
    if let Some(w) = warning {
        warn!("{w}");
    }
    info!(version = env!("CARGO_PKG_VERSION"), log = ?log_file, "aurion starting");

    match role {
        None => match runtime::run_master(&settings, args.config.as_deref()) {
            Ok(true) => ExitCode::SUCCESS,
            Ok(false) => ExitCode::FAILURE,
            Err(e) => {
                error!("{e:#}");
                eprintln!("aurion: {e:#}");
                ExitCode::FAILURE
            }
        },
        Some(role) => match runtime::run_display(role, &settings) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!(role = role.as_str(), "{e}");
                eprintln!("aurion {}: {e}", role.as_str());
                ExitCode::from(e.exit_code())
            }
        },
    }
}
