//! Listening session: turns transcript events into track updates.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                         TrackerSession                            │
//! │                                                                   │
//! │  ┌───────────┐     ┌──────────────┐     ┌──────────────┐          │
//! │  │ Tokenizer │────▶│ AliasMatcher │────▶│ HistoryTrack │──┐       │
//! │  │ (policy)  │     │ (char set)   │     │ (8 slots)    │  │       │
//! │  └───────────┘     └──────────────┘     └──────────────┘  │       │
//! │        ▲                                                  ▼       │
//! │  ┌─────┴──────────┐                           ┌────────────────┐  │
//! │  │ TranscriptEvent│                           │ KeyValueStore  │  │
//! │  │ + TranscriptLog│                           │ + listener     │  │
//! │  └────────────────┘                           └────────────────┘  │
//! └───────────────────────────────────────────────────────────────────┘
//! ```

mod controller;
mod events;
mod source;

pub use controller::{SessionListener, SessionState, TrackerSession};
pub use events::{RecognitionErrorKind, SessionEvent, TranscriptEvent, TranscriptFragment};
pub use source::{ExternalFeed, TranscriptionSource};
