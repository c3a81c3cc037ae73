use super::similarity::Scorer;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default minimum score an alias must exceed to count as a match.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.6;

/// Ordered mapping from spoken alias to canonical card name.
///
/// Iteration follows insertion order (document order when loaded from JSON),
/// which decides ties in [`AliasMatcher::find_best`].
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct AliasMap(IndexMap<String, String>);

impl AliasMap {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let map: IndexMap<String, String> =
            serde_json::from_str(json).context("alias dictionary is not a string map")?;
        Ok(Self(map))
    }

    /// Load the alias dictionary from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read alias dictionary {}", path.display()))?;
        Self::from_json_str(&raw)
    }

    /// Load the alias dictionary, falling back to an empty map on any failure.
    ///
    /// An empty map never matches, so the tracker keeps running but records
    /// nothing until a usable dictionary is provided.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(map) => {
                info!(
                    "Loaded {} aliases from {}",
                    map.len(),
                    path.display()
                );
                map
            }
            Err(e) => {
                warn!("Using empty alias dictionary: {:#}", e);
                Self::new()
            }
        }
    }

    pub fn insert(&mut self, alias: impl Into<String>, canonical: impl Into<String>) {
        self.0.insert(alias.into(), canonical.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(a, c)| (a.as_str(), c.as_str()))
    }
}

impl<A: Into<String>, C: Into<String>> FromIterator<(A, C)> for AliasMap {
    fn from_iter<I: IntoIterator<Item = (A, C)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(a, c)| (a.into(), c.into()))
                .collect(),
        )
    }
}

/// The winning alias for a token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardMatch {
    /// Canonical card name to record
    pub card: String,
    /// Alias that produced the best score
    pub alias: String,
    pub score: f64,
}

/// Finds the canonical card a token most likely refers to.
#[derive(Debug, Clone, Copy)]
pub struct AliasMatcher {
    threshold: f64,
    scorer: Scorer,
}

impl Default for AliasMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_MATCH_THRESHOLD, Scorer::default())
    }
}

impl AliasMatcher {
    pub fn new(threshold: f64, scorer: Scorer) -> Self {
        Self { threshold, scorer }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Find the best alias for `token`.
    ///
    /// A candidate only replaces the current best when its score is strictly
    /// greater than both the best so far and the threshold, so the first alias
    /// reaching a given score wins and a score equal to the threshold never
    /// matches.
    ///
    /// # Returns
    /// The best match, or `None` when no alias clears the threshold
    pub fn find_best(&self, token: &str, aliases: &AliasMap) -> Option<CardMatch> {
        let token = token.to_lowercase();
        let mut best: Option<CardMatch> = None;
        let mut best_score = 0.0;

        for (alias, card) in aliases.iter() {
            let score = self.scorer.score(&token, &alias.to_lowercase());
            if score > best_score && score > self.threshold {
                best_score = score;
                best = Some(CardMatch {
                    card: card.to_string(),
                    alias: alias.to_string(),
                    score,
                });
            }
        }

        match &best {
            Some(m) => debug!(
                "'{}' matched alias '{}' -> {} (score {:.3})",
                token, m.alias, m.card, m.score
            ),
            None => debug!("'{}' matched no alias above {}", token, self.threshold),
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_aliases() -> AliasMap {
        AliasMap::from_json_str(
            r#"{"骑士":"骑士","火球":"火球","猪":"皇家巨人","亡灵":"骷髅海",
                "弓箭手":"弓箭手","宝宝龙":"飞龙宝宝","野猪":"野猪骑士","气球":"气球兵"}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_json_preserves_document_order() {
        let aliases = sample_aliases();
        let order: Vec<&str> = aliases.iter().map(|(a, _)| a).collect();
        assert_eq!(
            order,
            vec!["骑士", "火球", "猪", "亡灵", "弓箭手", "宝宝龙", "野猪", "气球"]
        );
    }

    #[test]
    fn test_exact_alias_matches_canonical_name() {
        let matcher = AliasMatcher::default();
        let m = matcher.find_best("猪", &sample_aliases()).unwrap();
        assert_eq!(m.card, "皇家巨人");
        assert_eq!(m.alias, "猪");
        assert_eq!(m.score, 1.0);
    }

    #[test]
    fn test_case_is_normalized_on_both_sides() {
        let aliases: AliasMap = [("Hog Rider", "Hog Rider")].into_iter().collect();
        let m = AliasMatcher::default().find_best("HOG rider", &aliases);
        assert_eq!(m.map(|m| m.card), Some("Hog Rider".to_string()));
    }

    #[test]
    fn test_score_equal_to_threshold_does_not_match() {
        // {a,b,c} vs {a,b,c,d,e} scores exactly 3/5
        let aliases: AliasMap = [("abcde", "E")].into_iter().collect();
        assert!(AliasMatcher::default().find_best("abc", &aliases).is_none());

        // The same pair matches as soon as the threshold sits just below it
        let lenient = AliasMatcher::new(0.5999999, Scorer::CharOverlap);
        assert_eq!(lenient.find_best("abc", &aliases).unwrap().card, "E");
    }

    #[test]
    fn test_score_just_above_threshold_matches() {
        // {a,b} vs {a,b,c}: 2/3 > 0.6
        let aliases: AliasMap = [("abc", "C")].into_iter().collect();
        let m = AliasMatcher::default().find_best("ab", &aliases).unwrap();
        assert_eq!(m.card, "C");
    }

    #[test]
    fn test_first_alias_wins_ties() {
        let aliases: AliasMap = [("ab", "First"), ("ba", "Second")].into_iter().collect();
        let m = AliasMatcher::default().find_best("ab", &aliases).unwrap();
        assert_eq!(m.card, "First");

        let reversed: AliasMap = [("ba", "Second"), ("ab", "First")].into_iter().collect();
        let m = AliasMatcher::default().find_best("ab", &reversed).unwrap();
        assert_eq!(m.card, "Second");
    }

    #[test]
    fn test_higher_later_score_replaces_earlier() {
        let aliases: AliasMap = [("abcd", "Partial"), ("abc", "Exact")].into_iter().collect();
        let m = AliasMatcher::default().find_best("abc", &aliases).unwrap();
        assert_eq!(m.card, "Exact");
    }

    #[test]
    fn test_empty_map_never_matches() {
        let matcher = AliasMatcher::default();
        let empty = AliasMap::new();
        for token in ["骑士", "猪", "anything", ""] {
            assert!(matcher.find_best(token, &empty).is_none());
        }
    }

    #[test]
    fn test_load_or_empty_tolerates_missing_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("missing.json");
        assert!(AliasMap::load_or_empty(&missing).is_empty());

        let malformed = dir.path().join("bad.json");
        std::fs::write(&malformed, "[1, 2, 3]").unwrap();
        assert!(AliasMap::load_or_empty(&malformed).is_empty());

        let good = dir.path().join("good.json");
        std::fs::write(&good, r#"{"猪":"皇家巨人"}"#).unwrap();
        assert_eq!(AliasMap::load_or_empty(&good).len(), 1);
    }
}
