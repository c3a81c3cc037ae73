use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use strsim::normalized_levenshtein;

/// Scores how many distinct characters two strings share.
///
/// Each string is reduced to the set of its characters, and the score is the
/// size of the intersection divided by the size of the larger set. Empty
/// input on both sides scores 0.
///
/// This ignores character order and repetition, so anagrams score 1.0 and a
/// short token whose characters all appear in a longer alias can score well.
/// That is a known limitation of the measure, kept because spoken card names
/// are short and the recognizer mostly gets characters right but not always
/// their order.
///
/// # Returns
/// A score in `[0.0, 1.0]`
pub fn char_overlap(a: &str, b: &str) -> f64 {
    let set_a: HashSet<char> = a.chars().collect();
    let set_b: HashSet<char> = b.chars().collect();

    let shared = set_a.intersection(&set_b).count();
    let denominator = set_a.len().max(set_b.len()).max(1);

    shared as f64 / denominator as f64
}

/// Which similarity measure the matcher uses.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Scorer {
    /// Character-set overlap, see [`char_overlap`]
    #[default]
    CharOverlap,
    /// Normalized Levenshtein similarity, better suited to Latin-script aliases
    Levenshtein,
}

impl Scorer {
    pub fn score(self, a: &str, b: &str) -> f64 {
        match self {
            Scorer::CharOverlap => char_overlap(a, b),
            Scorer::Levenshtein => normalized_levenshtein(a, b),
        }
    }
}
