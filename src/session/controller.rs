//! Tracker session controller.
//!
//! Coordinates tokenization, alias matching, track updates and persistence
//! for each transcript event, and owns the listening lifecycle.

use super::events::{RecognitionErrorKind, SessionEvent, TranscriptEvent, TranscriptFragment};
use super::source::TranscriptionSource;
use crate::errors::SessionError;
use crate::history::{HistoryTrack, TrackSnapshot};
use crate::matching::{AliasMap, AliasMatcher};
use crate::settings::{RecognitionConfig, TrackerSettings};
use crate::storage::{load_track, save_track, KeyValueStore};
use crate::tokenizer::Tokenizer;
use crate::transcript_log::TranscriptLog;
use log::{debug, error, info, warn};
use serde::Serialize;

const STATUS_READY: &str = "Ready. Press start and call out card names.";
const STATUS_LISTENING: &str = "Listening... call out card names to record them.";
const STATUS_RETRYING: &str = "Recognition interrupted, retrying...";
const STATUS_STOPPED: &str = "Stopped.";
const STATUS_UNSUPPORTED: &str = "Speech recognition is not supported here.";

/// Current state of the tracker session.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Never started
    Idle,
    /// Receiving transcript events
    Listening,
    /// Listening, but the recognizer reported a transient error and is
    /// expected to restart on its own
    Retrying,
    /// Stopped by request or by a permission error
    Stopped,
}

impl SessionState {
    pub fn is_listening(self) -> bool {
        matches!(self, SessionState::Listening | SessionState::Retrying)
    }
}

/// Callback receiving every [`SessionEvent`].
pub type SessionListener = Box<dyn FnMut(&SessionEvent)>;

/// One run of the card tracker.
///
/// Owns the track, the transcript log and the lifecycle state. Every
/// operation takes `&mut self`, so events are handled strictly one at a time
/// and each tokenize → match → append pass completes before the next event.
pub struct TrackerSession {
    state: SessionState,
    track: HistoryTrack,
    transcript_log: TranscriptLog,
    aliases: AliasMap,
    matcher: AliasMatcher,
    tokenizer: Box<dyn Tokenizer>,
    store: Box<dyn KeyValueStore>,
    /// `None` when the host offers no speech recognition
    source: Option<Box<dyn TranscriptionSource>>,
    /// Whether the last `begin` succeeded and no `end` or end-of-stream followed
    feed_running: bool,
    recognition: RecognitionConfig,
    listener: Option<SessionListener>,
    status: String,
    /// Automatic feed restarts since the last explicit start
    restart_count: u32,
}

impl TrackerSession {
    /// Create a session, restoring any track saved in `store`.
    pub fn new(
        settings: &TrackerSettings,
        aliases: AliasMap,
        store: Box<dyn KeyValueStore>,
        source: Option<Box<dyn TranscriptionSource>>,
    ) -> Self {
        let track = load_track(&*store, settings.track_capacity);
        if !track.is_empty() {
            info!(
                "Restored track: {}",
                track.snapshot().display_line()
            );
        }

        Self {
            state: SessionState::Idle,
            track,
            transcript_log: TranscriptLog::new(settings.transcript_log_capacity),
            aliases,
            matcher: AliasMatcher::new(settings.match_threshold, settings.scorer),
            tokenizer: settings.tokenizer.build(),
            store,
            source,
            feed_running: false,
            recognition: settings.recognition.clone(),
            listener: None,
            status: STATUS_READY.to_string(),
            restart_count: 0,
        }
    }

    pub fn with_listener(mut self, listener: impl FnMut(&SessionEvent) + 'static) -> Self {
        self.set_listener(listener);
        self
    }

    pub fn set_listener(&mut self, listener: impl FnMut(&SessionEvent) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Start listening.
    ///
    /// A no-op when already listening with a running feed. In `Retrying`
    /// after a failed restart the feed is begun again. Fails with
    /// [`SessionError::CapabilityMissing`] when no transcription source is
    /// installed; the state is left unchanged in that case.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.state.is_listening() && self.feed_running {
            debug!("TrackerSession: start requested while already listening");
            return Ok(());
        }

        if let Err(e) = self.begin_feed() {
            error!("Failed to start listening: {}", e);
            if self.state.is_listening() {
                if let SessionError::PermissionDenied(detail) = &e {
                    let detail = detail.clone();
                    self.halt_on_permission_denied(&detail);
                    return Err(e);
                }
            }
            let message = match &e {
                SessionError::CapabilityMissing => STATUS_UNSUPPORTED.to_string(),
                other => other.to_string(),
            };
            self.set_status(message.clone());
            self.emit(SessionEvent::Error { message });
            return Err(e);
        }

        self.state = SessionState::Listening;
        self.restart_count = 0;
        self.set_status(STATUS_LISTENING);
        self.emit(SessionEvent::Started);

        info!("Tracker session started");
        Ok(())
    }

    /// Stop listening. A no-op when not listening.
    pub fn stop(&mut self) {
        if !self.state.is_listening() {
            debug!("TrackerSession: stop requested while not listening");
            return;
        }

        self.end_feed();
        self.state = SessionState::Stopped;
        self.set_status(STATUS_STOPPED);
        self.emit(SessionEvent::Stopped);

        info!("Tracker session stopped");
    }

    /// Handle one event from the transcription source.
    ///
    /// Events arriving while not listening are ignored.
    pub fn handle_event(&mut self, event: TranscriptEvent) {
        if !self.state.is_listening() {
            debug!("TrackerSession: ignoring {:?} while {:?}", event, self.state);
            return;
        }

        match event {
            TranscriptEvent::Result { fragments } => self.on_result(&fragments),
            TranscriptEvent::Error { kind } => self.on_recognition_error(kind),
            TranscriptEvent::End => self.on_feed_end(),
        }
    }

    /// Run the tokenize → match → append pass over `text`.
    ///
    /// Saves the track after every accepted append. Returns the cards that were
    /// recorded, in order.
    pub fn process_text(&mut self, text: &str) -> Vec<String> {
        let mut recorded = Vec::new();

        for token in self.tokenizer.tokenize(text) {
            let Some(found) = self.matcher.find_best(&token, &self.aliases) else {
                debug!("No card recorded for '{}'", token);
                self.emit(SessionEvent::Unmatched { token });
                continue;
            };

            self.emit(SessionEvent::Matched {
                token: token.clone(),
                card: found.card.clone(),
                alias: found.alias.clone(),
                score: found.score,
            });

            if self.track.append(&found.card) {
                info!(
                    "Recorded '{}' from '{}' (score {:.2})",
                    found.card, token, found.score
                );
                self.persist_track();
                self.emit(SessionEvent::TrackChanged {
                    track: self.track.to_vec(),
                });
                recorded.push(found.card);
            }
        }

        recorded
    }

    /// Empty the track and save the empty state.
    pub fn reset_track(&mut self) -> bool {
        if !self.track.clear() {
            return false;
        }
        info!("Track cleared");
        self.persist_track();
        self.emit(SessionEvent::TrackChanged { track: Vec::new() });
        true
    }

    /// Swap in a freshly loaded alias dictionary.
    pub fn replace_aliases(&mut self, aliases: AliasMap) {
        info!(
            "Alias dictionary replaced ({} -> {} aliases)",
            self.aliases.len(),
            aliases.len()
        );
        self.aliases = aliases;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_listening(&self) -> bool {
        self.state.is_listening()
    }

    pub fn track(&self) -> &HistoryTrack {
        &self.track
    }

    pub fn snapshot(&self) -> TrackSnapshot {
        self.track.snapshot()
    }

    pub fn transcript_log(&self) -> &TranscriptLog {
        &self.transcript_log
    }

    pub fn aliases(&self) -> &AliasMap {
        &self.aliases
    }

    /// Current user-facing status line.
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn restart_count(&self) -> u32 {
        self.restart_count
    }

    fn on_result(&mut self, fragments: &[TranscriptFragment]) {
        let text: String = fragments.iter().map(|f| f.text.as_str()).collect();
        self.feed_running = true;

        if self.state == SessionState::Retrying {
            debug!("TrackerSession: recognizer recovered");
            self.state = SessionState::Listening;
            self.set_status(STATUS_LISTENING);
        }

        debug!("Transcript: '{}'", text);
        self.transcript_log.push(&text);

        if !text.trim().is_empty() {
            self.process_text(&text);
        }
    }

    fn on_recognition_error(&mut self, kind: RecognitionErrorKind) {
        if kind.is_permission_denied() {
            self.halt_on_permission_denied(kind.as_str());
            return;
        }

        warn!("Recognition error '{}', waiting for the feed to restart", kind);
        self.state = SessionState::Retrying;
        self.set_status(STATUS_RETRYING);
    }

    fn on_feed_end(&mut self) {
        self.feed_running = false;
        self.restart_count += 1;
        info!(
            "Transcription feed ended, restarting (attempt {})",
            self.restart_count
        );
        self.emit(SessionEvent::Restarting {
            attempt: self.restart_count,
        });

        match self.begin_feed() {
            Ok(()) => {}
            Err(SessionError::PermissionDenied(detail)) => {
                self.halt_on_permission_denied(&detail);
            }
            Err(e) => {
                // The dead feed sends nothing more; only start() can revive it.
                warn!("Failed to restart transcription feed: {}", e);
                self.state = SessionState::Retrying;
                let message = format!(
                    "Speech recognition could not restart ({}). Press start to try again.",
                    e
                );
                self.set_status(message.clone());
                self.emit(SessionEvent::Error { message });
            }
        }
    }

    fn halt_on_permission_denied(&mut self, detail: &str) {
        error!("Speech recognition permission denied: {}", detail);
        self.end_feed();
        self.state = SessionState::Stopped;

        let message = format!(
            "Microphone permission denied ({}). Allow access and press start again.",
            detail
        );
        self.set_status(message.clone());
        self.emit(SessionEvent::Error { message });
        self.emit(SessionEvent::Stopped);
    }

    fn begin_feed(&mut self) -> Result<(), SessionError> {
        match self.source.as_mut() {
            Some(source) => {
                let began = source.begin(&self.recognition).map_err(SessionError::from);
                self.feed_running = began.is_ok();
                began
            }
            None => Err(SessionError::CapabilityMissing),
        }
    }

    fn end_feed(&mut self) {
        self.feed_running = false;
        if let Some(source) = self.source.as_mut() {
            source.end();
        }
    }

    fn persist_track(&mut self) {
        if let Err(e) = save_track(&mut *self.store, &self.track) {
            warn!("Failed to save track: {}", e);
        }
    }

    fn set_status(&mut self, message: impl Into<String>) {
        let message = message.into();
        if self.status == message {
            return;
        }
        self.status = message.clone();
        self.emit(SessionEvent::Status { message });
    }

    fn emit(&mut self, event: SessionEvent) {
        if let Some(listener) = self.listener.as_mut() {
            listener(&event);
        }
    }
}
