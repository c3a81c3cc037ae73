//! Splits raw transcript text into candidate tokens for matching.
//!
//! Tokenization is a policy: the whitespace splitter is the default, and the
//! keyword splitter additionally separates known card names spoken
//! back-to-back without a pause.

use log::warn;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub trait Tokenizer {
    /// Lowercase, trim and split `raw` into non-empty tokens.
    fn tokenize(&self, raw: &str) -> Vec<String>;
}

/// Tokenizer selection as stored in settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TokenizerPolicy {
    #[default]
    Whitespace,
    KeywordBoundary {
        #[serde(default)]
        keywords: Vec<String>,
    },
}

impl TokenizerPolicy {
    pub fn build(&self) -> Box<dyn Tokenizer> {
        match self {
            TokenizerPolicy::Whitespace => Box::new(WhitespaceTokenizer),
            TokenizerPolicy::KeywordBoundary { keywords } => {
                match KeywordBoundaryTokenizer::new(keywords) {
                    Some(tokenizer) => Box::new(tokenizer),
                    None => {
                        warn!("No usable boundary keywords, falling back to whitespace tokenizer");
                        Box::new(WhitespaceTokenizer)
                    }
                }
            }
        }
    }
}

fn whitespace_pieces(raw: &str) -> impl Iterator<Item = String> + '_ {
    raw.trim()
        .split_whitespace()
        .map(str::to_lowercase)
        .filter(|piece| !piece.is_empty())
}

/// Splits on whitespace only.
///
/// Card names spoken back-to-back without a pause arrive as one token and
/// are matched as a whole.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, raw: &str) -> Vec<String> {
        whitespace_pieces(raw).collect()
    }
}

/// Splits on whitespace and before every occurrence of a known keyword.
///
/// A keyword that appears inside a longer word also splits it: with `猪` as a
/// keyword, `野猪` becomes `野` and `猪`.
#[derive(Debug, Clone)]
pub struct KeywordBoundaryTokenizer {
    /// Alternation of the escaped keywords, anchored at the start
    keyword_prefix: Regex,
}

impl KeywordBoundaryTokenizer {
    /// Returns `None` when `keywords` holds no non-empty entry.
    pub fn new(keywords: &[String]) -> Option<Self> {
        let alternatives: Vec<String> = keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .map(|k| regex::escape(&k))
            .collect();

        if alternatives.is_empty() {
            return None;
        }

        let pattern = format!("^(?:{})", alternatives.join("|"));
        match Regex::new(&pattern) {
            Ok(keyword_prefix) => Some(Self { keyword_prefix }),
            Err(e) => {
                warn!("Invalid boundary keyword pattern: {}", e);
                None
            }
        }
    }

    fn split_piece(&self, piece: &str, out: &mut Vec<String>) {
        let mut start = 0;
        for (offset, _) in piece.char_indices().skip(1) {
            if self.keyword_prefix.is_match(&piece[offset..]) {
                out.push(piece[start..offset].to_string());
                start = offset;
            }
        }
        out.push(piece[start..].to_string());
    }
}

impl Tokenizer for KeywordBoundaryTokenizer {
    fn tokenize(&self, raw: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        for piece in whitespace_pieces(raw) {
            self.split_piece(&piece, &mut tokens);
        }
        tokens
    }
}
