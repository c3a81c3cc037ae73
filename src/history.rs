//! The bounded card history ("track").
//!
//! Holds the most recently recognized cards in order, oldest first. The same
//! card recognized across consecutive transcript updates is only recorded
//! once.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Number of slots on the track.
pub const DEFAULT_TRACK_CAPACITY: usize = 8;

/// Bounded FIFO of canonical card names.
///
/// Invariants: `len() <= capacity()`, and no two adjacent entries are equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryTrack {
    slots: VecDeque<String>,
    capacity: usize,
}

impl Default for HistoryTrack {
    fn default() -> Self {
        Self::new(DEFAULT_TRACK_CAPACITY)
    }
}

impl HistoryTrack {
    /// Create an empty track. A capacity of 0 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Rebuild a track from previously saved entries.
    ///
    /// Only the last `capacity` entries are kept. Adjacent repeats in the saved
    /// data are collapsed so a hand-edited or foreign state cannot break the
    /// adjacency invariant.
    ///
    /// Truncation happens before collapsing, so a saved list longer than
    /// `capacity` with repeats in its tail restores to fewer than `capacity`
    /// entries even though older saved entries existed.
    pub fn restore(entries: Vec<String>, capacity: usize) -> Self {
        let mut track = Self::new(capacity);
        let skip = entries.len().saturating_sub(track.capacity);
        if skip > 0 {
            debug!(
                "Restored state has {} entries, keeping the last {}",
                entries.len(),
                track.capacity
            );
        }
        for name in entries.into_iter().skip(skip) {
            if track.slots.back() != Some(&name) {
                track.slots.push_back(name);
            }
        }
        track
    }

    /// Record a card at the tail of the track.
    ///
    /// Returns `false` without touching the track when `card` equals the most
    /// recent entry. Otherwise evicts the oldest entry if the track is full,
    /// appends `card` and returns `true`.
    pub fn append(&mut self, card: &str) -> bool {
        if self.slots.back().map(String::as_str) == Some(card) {
            debug!("Skipping repeated card '{}'", card);
            return false;
        }

        if self.slots.len() >= self.capacity {
            if let Some(evicted) = self.slots.pop_front() {
                debug!("Track full, evicting oldest card '{}'", evicted);
            }
        }

        self.slots.push_back(card.to_string());
        true
    }

    /// Remove every entry. Returns `true` if anything was removed.
    pub fn clear(&mut self) -> bool {
        let changed = !self.slots.is_empty();
        self.slots.clear();
        changed
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn last(&self) -> Option<&str> {
        self.slots.back().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(String::as_str)
    }

    /// Entries oldest first, as saved to storage.
    pub fn to_vec(&self) -> Vec<String> {
        self.slots.iter().cloned().collect()
    }

    pub fn snapshot(&self) -> TrackSnapshot {
        let mut slots: Vec<Option<String>> = self.slots.iter().cloned().map(Some).collect();
        slots.resize(self.capacity, None);
        TrackSnapshot { slots }
    }
}

/// Slot-by-slot view of the track for display.
///
/// Always holds exactly `capacity` slots; unfilled slots are `None`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TrackSnapshot {
    pub slots: Vec<Option<String>>,
}

impl TrackSnapshot {
    pub fn filled(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().flatten().map(String::as_str)
    }

    /// One-line rendering, e.g. `骑士 → 皇家巨人`, or `empty`.
    pub fn display_line(&self) -> String {
        let cards: Vec<&str> = self.filled().collect();
        if cards.is_empty() {
            "empty".to_string()
        } else {
            cards.join(" → ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track_of(cards: &[&str]) -> HistoryTrack {
        HistoryTrack::restore(cards.iter().map(|c| c.to_string()).collect(), 8)
    }

    fn has_adjacent_repeat(track: &HistoryTrack) -> bool {
        let cards: Vec<&str> = track.iter().collect();
        cards.windows(2).any(|w| w[0] == w[1])
    }

    #[test]
    fn test_append_suppresses_adjacent_duplicates() {
        let mut track = HistoryTrack::default();
        assert!(track.append("骑士"));
        assert!(!track.append("骑士"));
        assert!(track.append("皇家巨人"));
        assert!(track.append("骑士"));
        assert_eq!(track.to_vec(), vec!["骑士", "皇家巨人", "骑士"]);
    }

    #[test]
    fn test_full_track_evicts_oldest() {
        let mut track = track_of(&["a", "b", "c", "d", "e", "f", "g", "h"]);
        assert_eq!(track.len(), 8);
        assert!(track.append("i"));
        assert_eq!(
            track.to_vec(),
            vec!["b", "c", "d", "e", "f", "g", "h", "i"]
        );
    }

    #[test]
    fn test_rejected_append_on_full_track_evicts_nothing() {
        let mut track = track_of(&["a", "b", "c", "d", "e", "f", "g", "h"]);
        assert!(!track.append("h"));
        assert_eq!(track.iter().next(), Some("a"));
    }

    #[test]
    fn test_invariants_hold_for_long_sequences() {
        let mut track = HistoryTrack::default();
        let cards = ["a", "a", "b", "c", "c", "c", "a", "d", "e", "e", "f", "g", "h", "i", "i"];
        for round in 0..5 {
            for (i, card) in cards.iter().enumerate() {
                // Vary the sequence between rounds
                let card = if (i + round) % 4 == 0 { "z" } else { card };
                track.append(card);
                assert!(track.len() <= 8);
                assert!(!has_adjacent_repeat(&track));
            }
        }
    }

    #[test]
    fn test_restore_keeps_last_entries() {
        let saved = ["x", "y", "x", "y", "x", "y", "x", "y", "x", "y"];
        let track = track_of(&saved);
        assert_eq!(track.to_vec(), saved[2..].to_vec());
        assert_eq!(track.iter().next(), Some("x"));
        assert_eq!(track.last(), Some("y"));
    }

    #[test]
    fn test_restore_round_trips_valid_state() {
        let mut track = HistoryTrack::default();
        for card in ["骑士", "火球", "皇家巨人"] {
            track.append(card);
        }
        let restored = HistoryTrack::restore(track.to_vec(), 8);
        assert_eq!(restored, track);
    }

    #[test]
    fn test_restore_collapses_adjacent_repeats() {
        let track = track_of(&["a", "a", "b", "b", "a"]);
        assert_eq!(track.to_vec(), vec!["a", "b", "a"]);
    }

    #[test]
    fn test_restore_truncates_before_collapsing() {
        let saved = ["old", "a", "b", "b", "c", "d", "e", "f", "g"];
        let track = track_of(&saved);
        assert_eq!(track.len(), 7);
        assert_eq!(track.to_vec(), vec!["a", "b", "c", "d", "e", "f", "g"]);
    }

    #[test]
    fn test_zero_capacity_is_raised_to_one() {
        let mut track = HistoryTrack::new(0);
        assert_eq!(track.capacity(), 1);
        track.append("a");
        track.append("b");
        assert_eq!(track.to_vec(), vec!["b"]);
    }

    #[test]
    fn test_clear() {
        let mut track = track_of(&["a", "b"]);
        assert!(track.clear());
        assert!(track.is_empty());
        assert!(!track.clear());
    }

    #[test]
    fn test_snapshot_marks_empty_slots() {
        let track = track_of(&["骑士", "皇家巨人"]);
        let snapshot = track.snapshot();
        assert_eq!(snapshot.slots.len(), 8);
        assert_eq!(snapshot.slots[0].as_deref(), Some("骑士"));
        assert_eq!(snapshot.slots[1].as_deref(), Some("皇家巨人"));
        assert!(snapshot.slots[2..].iter().all(Option::is_none));
        assert_eq!(snapshot.display_line(), "骑士 → 皇家巨人");

        assert_eq!(HistoryTrack::default().snapshot().display_line(), "empty");
    }
}
