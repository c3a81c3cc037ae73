//! Fuzzy matching of transcript tokens against the card alias dictionary.

pub mod alias;
pub mod similarity;

pub use alias::{AliasMap, AliasMatcher, CardMatch, DEFAULT_MATCH_THRESHOLD};
pub use similarity::{char_overlap, Scorer};
