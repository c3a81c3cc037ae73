use serde::{Deserialize, Serialize};
use std::fmt;

/// One piece of recognized text from the transcription source.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TranscriptFragment {
    pub text: String,
    /// Provisional fragments may still be revised by the recognizer
    #[serde(default)]
    pub is_final: bool,
}

impl TranscriptFragment {
    pub fn provisional(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: false,
        }
    }

    pub fn final_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: true,
        }
    }
}

/// Error codes reported by the recognizer.
///
/// Codes follow the Web Speech API names (`not-allowed`, `network`, ...);
/// anything unrecognized is kept verbatim in `Other`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum RecognitionErrorKind {
    NotAllowed,
    ServiceNotAllowed,
    Network,
    NoSpeech,
    Aborted,
    AudioCapture,
    Other(String),
}

impl RecognitionErrorKind {
    /// Whether the error means the user or platform refused recognition access.
    pub fn is_permission_denied(&self) -> bool {
        matches!(
            self,
            RecognitionErrorKind::NotAllowed | RecognitionErrorKind::ServiceNotAllowed
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            RecognitionErrorKind::NotAllowed => "not-allowed",
            RecognitionErrorKind::ServiceNotAllowed => "service-not-allowed",
            RecognitionErrorKind::Network => "network",
            RecognitionErrorKind::NoSpeech => "no-speech",
            RecognitionErrorKind::Aborted => "aborted",
            RecognitionErrorKind::AudioCapture => "audio-capture",
            RecognitionErrorKind::Other(code) => code,
        }
    }
}

impl From<&str> for RecognitionErrorKind {
    fn from(code: &str) -> Self {
        match code.trim() {
            "not-allowed" => RecognitionErrorKind::NotAllowed,
            "service-not-allowed" => RecognitionErrorKind::ServiceNotAllowed,
            "network" => RecognitionErrorKind::Network,
            "no-speech" => RecognitionErrorKind::NoSpeech,
            "aborted" => RecognitionErrorKind::Aborted,
            "audio-capture" => RecognitionErrorKind::AudioCapture,
            other => RecognitionErrorKind::Other(other.to_string()),
        }
    }
}

impl From<String> for RecognitionErrorKind {
    fn from(code: String) -> Self {
        RecognitionErrorKind::from(code.as_str())
    }
}

impl From<RecognitionErrorKind> for String {
    fn from(kind: RecognitionErrorKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for RecognitionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events delivered by the transcription source, one at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEvent {
    /// New or revised transcript text
    Result { fragments: Vec<TranscriptFragment> },
    /// The recognizer reported an error
    Error { kind: RecognitionErrorKind },
    /// The recognizer's feed ended on its own
    End,
}

/// Notifications emitted by the session for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum SessionEvent {
    /// Listening session started
    Started,
    /// Listening session stopped, explicitly or after a fatal error
    Stopped,
    /// User-facing status line changed
    Status { message: String },
    /// The track was mutated; carries the full track oldest first
    TrackChanged { track: Vec<String> },
    /// A token matched a card (recorded or suppressed as a repeat)
    Matched {
        token: String,
        card: String,
        alias: String,
        score: f64,
    },
    /// A token matched no card
    Unmatched { token: String },
    /// The transcription feed ended and is being restarted
    Restarting { attempt: u32 },
    /// Error the user needs to act on
    Error { message: String },
}
