//! Line-oriented console input.
//!
//! Reads commands from stdin on a blocking thread and forwards them to the
//! main application over an async channel.

use crate::{AppCommand, AppError, AppResult};

use std::{
    io::{self, BufRead},
    panic::Location,
    time::Duration,
};

use error_location::ErrorLocation;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

/// Forwards parsed console commands to the application.
pub struct ConsoleInput {
    command_tx: mpsc::Sender<AppCommand>,
}

impl ConsoleInput {
    /// Create a reader sending to `command_tx`.
    pub fn new(command_tx: mpsc::Sender<AppCommand>) -> Self {
        Self { command_tx }
    }

    /// Run the console reader loop.
    ///
    /// Returns on shutdown signal, on `quit`, or when stdin closes.
    #[instrument(skip(self, shutdown_rx))]
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()> {
        let (line_tx, mut line_rx) = mpsc::channel::<String>(32);

        // Single persistent blocking task that forwards stdin lines.
        //
        // Shutdown: when line_rx is dropped (loop breaks), the next
        // line_tx.blocking_send() fails, breaking the blocking loop.
        let handle = tokio::task::spawn_blocking(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        if line_tx.blocking_send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to read console input");
                        break;
                    }
                }
            }
        });

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Console input shutting down");
                    break;
                }
                line = line_rx.recv() => {
                    let Some(line) = line else {
                        info!("Console input closed");
                        self.send(AppCommand::Shutdown).await?;
                        break;
                    };
                    if line.trim().is_empty() {
                        continue;
                    }
                    match AppCommand::parse(&line) {
                        Ok(command) => {
                            let quit = command == AppCommand::Shutdown;
                            self.send(command).await?;
                            if quit {
                                break;
                            }
                        }
                        Err(AppError::InvalidCommand { reason, .. }) => {
                            println!("{} (type 'help' for commands)", reason);
                        }
                        Err(e) => return Err(e),
                    }
                }
            }
        }

        // Drop line_rx to unblock the blocking task's next blocking_send().
        drop(line_rx);

        // Best-effort join: the blocking task may be stuck reading stdin.
        // The task is cleaned up by the runtime on process exit regardless.
        match tokio::time::timeout(Duration::from_secs(1), handle).await {
            Ok(Ok(())) => debug!("Console forwarder stopped cleanly"),
            Ok(Err(e)) => warn!(error = ?e, "Console forwarder task panicked"),
            Err(_) => debug!(
                "Console forwarder did not stop within timeout, \
                   will be cleaned up on exit"
            ),
        }

        Ok(())
    }

    async fn send(&self, command: AppCommand) -> AppResult<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("Failed to send command: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}
