use crate::history::DEFAULT_TRACK_CAPACITY;
use crate::matching::{Scorer, DEFAULT_MATCH_THRESHOLD};
use crate::tokenizer::TokenizerPolicy;
use crate::transcript_log::DEFAULT_TRANSCRIPT_LOG_CAPACITY;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Options handed to the transcription source each time it is (re)started.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RecognitionConfig {
    #[serde(default = "default_language")]
    pub language: String,
    /// Keep listening across utterances instead of stopping after one
    #[serde(default = "default_true")]
    pub continuous: bool,
    /// Deliver provisional fragments while the speaker is still talking
    #[serde(default = "default_true")]
    pub interim_results: bool,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            continuous: true,
            interim_results: true,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TrackerSettings {
    #[serde(default = "default_track_capacity")]
    pub track_capacity: usize,
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f64,
    #[serde(default)]
    pub scorer: Scorer,
    #[serde(default)]
    pub tokenizer: TokenizerPolicy,
    #[serde(default = "default_transcript_log_capacity")]
    pub transcript_log_capacity: usize,
    #[serde(default)]
    pub recognition: RecognitionConfig,
    #[serde(default)]
    pub alias_dictionary_path: Option<PathBuf>,
    #[serde(default)]
    pub state_store_path: Option<PathBuf>,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        get_default_settings()
    }
}

impl TrackerSettings {
    /// Clamp values that would break the tracker's invariants.
    pub fn normalize(&mut self) {
        if self.track_capacity == 0 {
            warn!("track_capacity must be at least 1, using 1");
            self.track_capacity = 1;
        }

        if self.transcript_log_capacity == 0 {
            self.transcript_log_capacity = 1;
        }

        if !self.match_threshold.is_finite() {
            warn!(
                "Invalid match_threshold {}, using {}",
                self.match_threshold, DEFAULT_MATCH_THRESHOLD
            );
            self.match_threshold = DEFAULT_MATCH_THRESHOLD;
        }
        self.match_threshold = self.match_threshold.clamp(0.0, 1.0);
    }
}

fn default_language() -> String {
    "zh-CN".to_string()
}

fn default_true() -> bool {
    true
}

fn default_track_capacity() -> usize {
    DEFAULT_TRACK_CAPACITY
}

fn default_match_threshold() -> f64 {
    DEFAULT_MATCH_THRESHOLD
}

fn default_transcript_log_capacity() -> usize {
    DEFAULT_TRANSCRIPT_LOG_CAPACITY
}

pub const DEFAULT_STATE_STORE_PATH: &str = "deck_state.json";

pub fn get_default_settings() -> TrackerSettings {
    TrackerSettings {
        track_capacity: default_track_capacity(),
        match_threshold: default_match_threshold(),
        scorer: Scorer::default(),
        tokenizer: TokenizerPolicy::default(),
        transcript_log_capacity: default_transcript_log_capacity(),
        recognition: RecognitionConfig::default(),
        alias_dictionary_path: None,
        state_store_path: None,
    }
}

/// Load settings from `path`, falling back to defaults when the file is
/// missing or cannot be parsed.
pub fn load_or_default(path: &Path) -> TrackerSettings {
    let mut settings = match std::fs::read_to_string(path) {
        Ok(raw) => match serde_json::from_str::<TrackerSettings>(&raw) {
            Ok(settings) => {
                debug!("Found existing settings: {:?}", settings);
                settings
            }
            Err(e) => {
                warn!("Failed to parse settings {}: {}", path.display(), e);
                get_default_settings()
            }
        },
        Err(e) => {
            info!(
                "No settings at {} ({}), using defaults",
                path.display(),
                e
            );
            get_default_settings()
        }
    };

    settings.normalize();
    settings
}
