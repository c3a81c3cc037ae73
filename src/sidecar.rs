//! Line-delimited JSON front end for the tracker.
//!
//! Communication is via JSON over stdin/stdout:
//! - Requests are JSON objects on stdin (one per line): lifecycle commands
//!   and the transcription events produced by the recognizer process
//! - Responses and session events are JSON objects on stdout (one per line)

use crate::cli::CliArgs;
use crate::matching::AliasMap;
use crate::session::{
    ExternalFeed, RecognitionErrorKind, SessionEvent, SessionState, TrackerSession,
    TranscriptEvent, TranscriptFragment,
};
use crate::settings::{self, TrackerSettings, DEFAULT_STATE_STORE_PATH};
use crate::storage::JsonFileStore;
use crate::transcript_log::TranscriptLogEntry;
use anyhow::{Context, Result};
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

const DEFAULT_SETTINGS_PATH: &str = "settings.json";
const DEFAULT_ALIAS_PATH: &str = "resources/card_alias.json";

#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Request {
    Start,
    Stop,
    Result {
        #[serde(default)]
        fragments: Vec<TranscriptFragment>,
    },
    Error {
        error: RecognitionErrorKind,
    },
    End,
    Snapshot,
    Reset,
    Shutdown,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Response {
    Ok {
        message: String,
    },
    Error {
        message: String,
    },
    Snapshot {
        state: SessionState,
        status: String,
        slots: Vec<Option<String>>,
        display: String,
        transcript: Vec<TranscriptLogEntry>,
    },
    Event {
        event: SessionEvent,
    },
}

fn send_response(response: &Response) {
    match serde_json::to_string(response) {
        Ok(json) => {
            let mut stdout = io::stdout().lock();
            if let Err(e) = writeln!(stdout, "{}", json).and_then(|_| stdout.flush()) {
                error!("Failed to write response: {}", e);
            }
        }
        Err(e) => error!("Failed to serialize response: {}", e),
    }
}

fn snapshot_response(session: &TrackerSession) -> Response {
    let snapshot = session.snapshot();
    Response::Snapshot {
        state: session.state(),
        status: session.status().to_string(),
        display: snapshot.display_line(),
        slots: snapshot.slots,
        transcript: session.transcript_log().entries().cloned().collect(),
    }
}

/// Apply one request to the session.
///
/// Transcription events produce no direct response; their effects are
/// reported through the session listener.
fn handle_request(session: &mut TrackerSession, request: Request) -> Option<Response> {
    match request {
        Request::Start => Some(match session.start() {
            Ok(()) => Response::Ok {
                message: session.status().to_string(),
            },
            Err(e) => Response::Error {
                message: e.to_string(),
            },
        }),
        Request::Stop => {
            session.stop();
            Some(Response::Ok {
                message: session.status().to_string(),
            })
        }
        Request::Result { fragments } => {
            session.handle_event(TranscriptEvent::Result { fragments });
            None
        }
        Request::Error { error } => {
            session.handle_event(TranscriptEvent::Error { kind: error });
            None
        }
        Request::End => {
            session.handle_event(TranscriptEvent::End);
            None
        }
        Request::Snapshot => Some(snapshot_response(session)),
        Request::Reset => {
            session.reset_track();
            Some(Response::Ok {
                message: "Track cleared".to_string(),
            })
        }
        Request::Shutdown => Some(Response::Ok {
            message: "Shutting down".to_string(),
        }),
    }
}

fn resolve_path(flag: Option<PathBuf>, configured: Option<&PathBuf>, fallback: &str) -> PathBuf {
    flag.or_else(|| configured.cloned())
        .unwrap_or_else(|| PathBuf::from(fallback))
}

fn build_session(args: &CliArgs, settings: &TrackerSettings) -> TrackerSession {
    let alias_path = resolve_path(
        args.aliases.clone(),
        settings.alias_dictionary_path.as_ref(),
        DEFAULT_ALIAS_PATH,
    );
    let state_path = resolve_path(
        args.state.clone(),
        settings.state_store_path.as_ref(),
        DEFAULT_STATE_STORE_PATH,
    );
    info!("Track state file: {}", state_path.display());

    let aliases = AliasMap::load_or_empty(&alias_path);
    let store = JsonFileStore::open(state_path);

    TrackerSession::new(
        settings,
        aliases,
        Box::new(store),
        Some(Box::new(ExternalFeed::new())),
    )
}

/// Run the tracker until stdin closes or a `shutdown` request arrives.
pub fn run(args: CliArgs) -> Result<()> {
    info!("Deck tracker starting...");

    let settings_path = args
        .settings
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH));
    let settings = settings::load_or_default(Path::new(&settings_path));

    let mut session = build_session(&args, &settings)
        .with_listener(|event| send_response(&Response::Event { event: event.clone() }));

    // Signal ready
    send_response(&Response::Ok {
        message: "Deck tracker ready".to_string(),
    });

    if args.autostart {
        if let Some(response) = handle_request(&mut session, Request::Start) {
            send_response(&response);
        }
    }

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let request: Request = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                send_response(&Response::Error {
                    message: format!("Invalid JSON: {}", e),
                });
                continue;
            }
        };

        let shutdown = request == Request::Shutdown;
        if let Some(response) = handle_request(&mut session, request) {
            send_response(&response);
        }
        if shutdown {
            break;
        }
    }

    session.stop();
    info!("Deck tracker shutting down");
    Ok(())
}
