pub mod cli;
pub mod errors;
pub mod history;
pub mod matching;
pub mod session;
pub mod settings;
mod sidecar;
pub mod storage;
pub mod tokenizer;
pub mod transcript_log;

pub use history::{HistoryTrack, TrackSnapshot};
pub use matching::{AliasMap, AliasMatcher, CardMatch};
pub use session::{SessionEvent, SessionState, TrackerSession, TranscriptEvent};
pub use settings::TrackerSettings;
pub use sidecar::run;
