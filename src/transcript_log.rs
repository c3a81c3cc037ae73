//! Capped log of raw transcript text, newest last.
//!
//! Purely observational: the presentation layer shows it next to the track so
//! the user can see what the recognizer actually heard.
use chrono::{DateTime, Local};
use log::debug;
use serde::Serialize;
use std::collections::VecDeque;

/// Maximum number of transcript entries kept
pub const DEFAULT_TRANSCRIPT_LOG_CAPACITY: usize = 50;

/// One transcript update as received
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TranscriptLogEntry {
    pub timestamp: DateTime<Local>,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct TranscriptLog {
    entries: VecDeque<TranscriptLogEntry>,
    capacity: usize,
}

impl Default for TranscriptLog {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSCRIPT_LOG_CAPACITY)
    }
}

impl TranscriptLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record `text` with the current local time.
    pub fn push(&mut self, text: &str) {
        self.push_at(Local::now(), text);
    }

    pub fn push_at(&mut self, timestamp: DateTime<Local>, text: &str) {
        if self.entries.len() >= self.capacity {
            if let Some(dropped) = self.entries.pop_front() {
                debug!("Transcript log full, dropping '{}'", dropped.text);
            }
        }
        self.entries.push_back(TranscriptLogEntry {
            timestamp,
            text: text.to_string(),
        });
    }

    pub fn entries(&self) -> impl Iterator<Item = &TranscriptLogEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&TranscriptLogEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
