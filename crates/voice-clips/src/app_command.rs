use crate::{AppError, AppResult};

use std::panic::Location;

use error_location::ErrorLocation;

/// Commands sent from the console reader to the main application.
///
/// Positions are 1-based indexes into the last printed listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Start a new capture, or resume the paused one.
    Record,
    /// Pause the running capture.
    Pause,
    /// Finalize the capture into the catalog.
    Save,
    /// Print the catalog.
    List,
    /// Re-scan the recordings directory and print the catalog.
    Refresh,
    /// Give a recording a new display name.
    Rename {
        /// Listing position.
        position: usize,
        /// New display name.
        name: String,
    },
    /// Delete a recording.
    Delete {
        /// Listing position.
        position: usize,
    },
    /// Open the detail view of a recording.
    Open {
        /// Listing position.
        position: usize,
    },
    /// Move the open detail view to the next recording.
    Next,
    /// Move the open detail view to the previous recording.
    Prev,
    /// Attach advice text to the open detail view.
    Advice {
        /// Advice text.
        text: String,
    },
    /// Print the command reference.
    Help,
    /// Request application shutdown.
    Shutdown,
}

impl AppCommand {
    /// Parse one line of console input.
    #[track_caller]
    pub fn parse(line: &str) -> AppResult<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "record" | "r" => AppCommand::Record,
            "pause" | "p" => AppCommand::Pause,
            "save" | "s" => AppCommand::Save,
            "list" | "ls" => AppCommand::List,
            "refresh" => AppCommand::Refresh,
            "rename" => {
                let (position, name) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| invalid("usage: rename <n> <name>"))?;
                let name = name.trim();
                if name.is_empty() {
                    return Err(invalid("usage: rename <n> <name>"));
                }
                AppCommand::Rename {
                    position: parse_position(position)?,
                    name: name.to_string(),
                }
            }
            "delete" | "rm" => AppCommand::Delete {
                position: parse_position(rest)?,
            },
            "open" => AppCommand::Open {
                position: parse_position(rest)?,
            },
            "next" | "n" => AppCommand::Next,
            "prev" => AppCommand::Prev,
            "advice" => {
                if rest.is_empty() {
                    return Err(invalid("usage: advice <text>"));
                }
                AppCommand::Advice {
                    text: rest.to_string(),
                }
            }
            "help" | "?" => AppCommand::Help,
            "quit" | "exit" | "q" => AppCommand::Shutdown,
            "" => return Err(invalid("empty command")),
            other => return Err(invalid(&format!("unknown command '{}'", other))),
        };

        Ok(command)
    }
}

#[track_caller]
fn parse_position(text: &str) -> AppResult<usize> {
    match text.trim().parse::<usize>() {
        Ok(position) if position > 0 => Ok(position),
        _ => Err(invalid(&format!(
            "expected a listing number, got '{}'",
            text.trim()
        ))),
    }
}

#[track_caller]
fn invalid(reason: &str) -> AppError {
    AppError::InvalidCommand {
        reason: reason.to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}
