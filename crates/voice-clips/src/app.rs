use crate::{
    AppCommand, AppError, AppResult,
    display::{HELP, render_detail, render_listing, render_state},
};

use std::{
    io::{self, Write},
    panic::Location,
    sync::{Arc, MutexGuard},
};

use error_location::ErrorLocation;
use tokio::sync::{broadcast::error::RecvError, mpsc, watch};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;
use voice_clips_core::{
    BeginOutcome, ClipEvent, Recording, RecordingDetail, SessionState, SharedDetail, VoiceClips,
    format_elapsed,
};

/// Main application state.
///
/// Owns the console view state (last listing, open detail) and forwards
/// commands to the recording core.
pub struct App {
    clips: Arc<VoiceClips>,
    command_rx: mpsc::Receiver<AppCommand>,
    shutdown_tx: watch::Sender<bool>,
    /// Recording ids in the order of the last printed listing.
    listing: Vec<Uuid>,
    open: Option<SharedDetail>,
}

impl App {
    /// Create the application around a ready core.
    pub fn new(
        clips: Arc<VoiceClips>,
        command_rx: mpsc::Receiver<AppCommand>,
        shutdown_tx: watch::Sender<bool>,
    ) -> Self {
        Self {
            clips,
            command_rx,
            shutdown_tx,
            listing: Vec::new(),
            open: None,
        }
    }

    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Voice clips starting");

        let mut events = self.clips.subscribe();
        self.show_listing(self.clips.catalog());

        loop {
            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    if cmd == AppCommand::Shutdown {
                        info!("Shutdown requested");
                        break;
                    }
                    if let Err(e) = self.handle_command(cmd) {
                        report(&e);
                    }
                }

                event = events.recv() => {
                    match event {
                        Ok(event) => self.handle_event(event),
                        Err(RecvError::Lagged(skipped)) => {
                            debug!(skipped, "Display fell behind core events");
                        }
                        Err(RecvError::Closed) => {
                            info!("Core event channel closed, shutting down");
                            break;
                        }
                    }
                }

                else => {
                    info!("All channels closed, shutting down");
                    break;
                }
            }
        }

        if self.clips.session_state() != SessionState::Idle {
            match self.clips.finalize_capture() {
                Ok(file_ref) => info!(file_ref = %file_ref, "Saved capture in progress on exit"),
                Err(e) => error!(error = ?e, "Failed to save capture in progress on exit"),
            }
        }

        let _ = self.shutdown_tx.send(true);
        info!("Voice clips shut down successfully");

        Ok(())
    }

    #[instrument(skip(self))]
    fn handle_command(&mut self, command: AppCommand) -> AppResult<()> {
        match command {
            AppCommand::Record => match self.clips.begin_capture()? {
                BeginOutcome::Started { default_name, .. } => {
                    println!("Started '{}'", default_name);
                }
                BeginOutcome::Resumed { .. } => println!("Resumed"),
            },
            AppCommand::Pause => {
                let elapsed = self.clips.pause_capture()?;
                println!("\nPaused at {}", format_elapsed(elapsed));
            }
            AppCommand::Save => {
                let file_ref = self.clips.finalize_capture()?;
                println!("\nSaved {}", file_ref.file_name());
                self.show_listing(self.clips.catalog());
            }
            AppCommand::List => self.show_listing(self.clips.catalog()),
            AppCommand::Refresh => self.show_listing(self.clips.refresh()),
            AppCommand::Rename { position, name } => {
                let id = self.id_at(position)?;
                self.clips.rename(id, &name)?;
                println!("Renamed to '{}'", name);
            }
            AppCommand::Delete { position } => {
                let id = self.id_at(position)?;
                match self.clips.delete(id) {
                    Ok(()) => println!("Deleted"),
                    Err(e) if e.is_not_found() => println!("Already deleted"),
                    Err(e) => return Err(e.into()),
                }
                if self.open_recording() == Some(id) {
                    self.open = None;
                }
                self.show_listing(self.clips.catalog());
            }
            AppCommand::Open { position } => {
                let id = self.id_at(position)?;
                self.open = Some(self.clips.derived_view(id)?);
                self.show_detail()?;
            }
            AppCommand::Next => {
                if !self.with_open(RecordingDetail::move_to_next)? {
                    println!("Already at the last recording");
                }
                self.show_detail()?;
            }
            AppCommand::Prev => {
                if !self.with_open(RecordingDetail::move_to_previous)? {
                    println!("Already at the first recording");
                }
                self.show_detail()?;
            }
            AppCommand::Advice { text } => {
                self.with_open(|detail| detail.set_advice(text))?;
                self.show_detail()?;
            }
            AppCommand::Help => println!("{}", HELP),
            AppCommand::Shutdown => {}
        }

        Ok(())
    }

    fn handle_event(&self, event: ClipEvent) {
        match event {
            ClipEvent::ElapsedChanged(display) => {
                if self.clips.session_state() == SessionState::Recording {
                    print!("\r{}", render_state(SessionState::Recording, &display));
                    if let Err(e) = io::stdout().flush() {
                        warn!(error = %e, "Failed to flush stopwatch display");
                    }
                }
            }
            ClipEvent::SessionStateChanged(state) => {
                debug!(state = ?state, "Session state changed");
            }
            ClipEvent::CatalogChanged => debug!("Catalog changed"),
        }
    }

    fn show_listing(&mut self, recordings: Vec<Recording>) {
        self.listing = recordings.iter().map(Recording::id).collect();
        println!("{}", render_listing(&recordings));
    }

    fn show_detail(&self) -> AppResult<()> {
        let Some(view) = &self.open else {
            return Err(no_open_detail());
        };
        // Never call into the core with the view locked
        let detail = lock_detail(view).clone();
        let recording = detail.current().and_then(|id| self.clips.recording(id));
        println!("{}", render_detail(&detail, recording.as_ref()));
        Ok(())
    }

    #[track_caller]
    fn with_open<T>(&self, action: impl FnOnce(&mut RecordingDetail) -> T) -> AppResult<T> {
        let Some(view) = &self.open else {
            return Err(no_open_detail());
        };
        Ok(action(&mut lock_detail(view)))
    }

    fn open_recording(&self) -> Option<Uuid> {
        self.open.as_ref().map(|view| lock_detail(view).recording_id())
    }

    #[track_caller]
    fn id_at(&self, position: usize) -> AppResult<Uuid> {
        position
            .checked_sub(1)
            .and_then(|index| self.listing.get(index))
            .copied()
            .ok_or_else(|| AppError::InvalidCommand {
                reason: format!("no recording {} in the last listing, type 'list'", position),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

fn lock_detail(view: &SharedDetail) -> MutexGuard<'_, RecordingDetail> {
    view.lock().unwrap_or_else(|e| {
        warn!("Detail view lock poisoned, recovering: {}", e);
        e.into_inner()
    })
}

#[track_caller]
fn no_open_detail() -> AppError {
    AppError::InvalidCommand {
        reason: "no recording is open, use 'open <n>' first".to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}

fn report(e: &AppError) {
    match e {
        AppError::InvalidCommand { reason, .. } => println!("{}", reason),
        AppError::Clip { source, .. } if source.is_precondition_violation() => {
            warn!(error = ?e, "Command not valid in the current state");
            println!("Not now: {}", source);
        }
        other => {
            error!(error = ?other, "Command failed");
            println!("Error: {}", other);
        }
    }
}
