//! The seam between the session and whatever produces transcripts.

use crate::errors::SourceError;
use crate::settings::RecognitionConfig;
use log::{debug, info};

/// A speech transcription feed the session can switch on and off.
///
/// Transcript events themselves are pushed into the session by the host via
/// [`super::TrackerSession::handle_event`]; the source only controls whether
/// the feed is running.
pub trait TranscriptionSource {
    /// Ask the recognizer to start (or restart) delivering events.
    fn begin(&mut self, config: &RecognitionConfig) -> Result<(), SourceError>;

    /// Ask the recognizer to stop delivering events.
    fn end(&mut self);
}

/// Source whose transcripts are produced by another process.
///
/// Begin and end only toggle a flag; the peer process owns the recognizer and
/// streams its events to us.
#[derive(Debug, Default)]
pub struct ExternalFeed {
    running: bool,
    begin_count: u32,
}

impl ExternalFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// How many times the feed has been (re)started.
    pub fn begin_count(&self) -> u32 {
        self.begin_count
    }
}

impl TranscriptionSource for ExternalFeed {
    fn begin(&mut self, config: &RecognitionConfig) -> Result<(), SourceError> {
        self.running = true;
        self.begin_count += 1;
        info!(
            "External transcription feed requested (lang={}, continuous={}, interim={})",
            config.language, config.continuous, config.interim_results
        );
        Ok(())
    }

    fn end(&mut self) {
        if self.running {
            debug!("External transcription feed released");
        }
        self.running = false;
    }
}
