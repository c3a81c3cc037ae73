//! Key/value persistence for the track.
//!
//! The track is stored as a JSON array of card names under [`DECK_STATE_KEY`].
//! Writes are best-effort: callers log failures and keep the in-memory state.

use crate::errors::StoreError;
use crate::history::HistoryTrack;
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Storage key holding the saved track.
pub const DECK_STATE_KEY: &str = "deckState";

/// A string key/value store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
}

/// Store that lives only as long as the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Store backed by a single JSON object on disk.
///
/// The whole file is rewritten on every `set`, through a temp file in the same
/// directory so a crash mid-write never leaves a truncated store behind.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
                Ok(values) => values,
                Err(e) => {
                    warn!(
                        "Ignoring malformed store file {}: {}",
                        path.display(),
                        e
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No store file at {}, starting empty", path.display());
                BTreeMap::new()
            }
            Err(e) => {
                warn!("Failed to read store file {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_to_disk(&self) -> Result<(), StoreError> {
        let parent_dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent_dir)?;

        let temp_file = NamedTempFile::new_in(parent_dir)?;
        {
            let mut writer = BufWriter::new(&temp_file);
            serde_json::to_writer_pretty(&mut writer, &self.values)?;
            writer.flush()?;
        }
        temp_file.persist(&self.path)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        self.write_to_disk()
    }
}

/// Restore the track saved under [`DECK_STATE_KEY`].
///
/// Missing, unreadable or malformed state yields an empty track.
pub fn load_track(store: &dyn KeyValueStore, capacity: usize) -> HistoryTrack {
    let raw = match store.get(DECK_STATE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return HistoryTrack::new(capacity),
        Err(e) => {
            warn!("Failed to read saved track: {}", e);
            return HistoryTrack::new(capacity);
        }
    };

    match serde_json::from_str::<Vec<String>>(&raw) {
        Ok(entries) => {
            let track = HistoryTrack::restore(entries, capacity);
            debug!("Restored track with {} cards", track.len());
            track
        }
        Err(e) => {
            warn!("Saved track is malformed, starting empty: {}", e);
            HistoryTrack::new(capacity)
        }
    }
}

/// Save the track under [`DECK_STATE_KEY`].
pub fn save_track(store: &mut dyn KeyValueStore, track: &HistoryTrack) -> Result<(), StoreError> {
    let value = serde_json::to_string(&track.to_vec())?;
    store.set(DECK_STATE_KEY, value)
}
