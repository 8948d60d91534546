//! Voice Clips: record, pause and browse short voice clips from the terminal.

mod app;
mod app_command;
mod config;
mod console_input;
mod display;
mod error;
mod logging;
#[cfg(test)]
mod tests;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    console_input::ConsoleInput,
    error::{AppError, Result as AppResult},
};

use crate::config::Config;

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{error, info};
use voice_clips_core::{Collaborators, NameOverrideStore, VoiceClips, VoiceClipsOptions};

/// Application entry point.
fn main() {
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    // Dropping the guard flushes buffered log lines, so it lives for all of main.
    let _log_guard = match logging::init(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            std::process::exit(1);
        }
    };

    let names = match NameOverrideStore::load(&config.storage.names_file) {
        Ok(names) => Arc::new(names),
        Err(e) => {
            error!("Failed to load recording names: {:?}", e);
            eprintln!("Failed to load recording names: {}", e);
            std::process::exit(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            std::process::exit(1);
        }
    };

    rt.block_on(async {
        let options = VoiceClipsOptions {
            recordings_dir: config.storage.recordings_dir.clone(),
            extension: config.capture.extension.clone(),
            capture: config.capture.capture_config(),
            tick_interval: config.stopwatch.tick_interval(),
        };
        let clips = Arc::new(VoiceClips::new(options, names, Collaborators::default()));

        let (command_tx, command_rx) = mpsc::channel(32);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let console = ConsoleInput::new(command_tx);
        let app = App::new(clips, command_rx, shutdown_tx);

        println!("{}", display::HELP);

        tokio::join!(
            async {
                if let Err(e) = console.run(shutdown_rx).await {
                    error!(error = ?e, "Console input error");
                }
            },
            async {
                if let Err(e) = app.run().await {
                    error!(error = ?e, "App error");
                }
            }
        );
    });

    info!("Exiting");

    // The console reader may still be blocked on stdin.
    rt.shutdown_timeout(std::time::Duration::from_millis(100));
}
