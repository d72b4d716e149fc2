//! Word-level scoring collaborators.
//!
//! The sentence scorer never trains a word scorer itself; it is handed one
//! implementing [`WordPairScore`]. Scores are costs: `0` means the two words
//! are certainly translations, `1` means no evidence. Gapped scorers may
//! return values above `1`.
use std::cell::RefCell;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Lower-cased source word -> lower-cased target word -> weight.
pub type TranslationTable = HashMap<String, HashMap<String, f64>>;

pub trait WordPairScore {
    /// Cost of pairing `a` (source side) with `b` (target side).
    fn score(&self, a: &str, b: &str) -> f64;

    /// Translation side-table, when the scorer is backed by one.
    fn translations(&self) -> Option<&TranslationTable> {
        None
    }
}

impl<F> WordPairScore for F
where
    F: Fn(&str, &str) -> f64,
{
    fn score(&self, a: &str, b: &str) -> f64 {
        self(a, b)
    }
}

/// Word scorer backed by a translation table.
///
/// Identical words cost `0`, a known translation costs `1 - weight`
/// (weight clamped to `[0, 1]`), and anything else costs `1`. Lookups are
/// case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslationTableScore {
    table: TranslationTable,
}

impl TranslationTableScore {
    pub fn new(table: TranslationTable) -> Self {
        TranslationTableScore { table }
    }

    /// Build a table from `(source, target, weight)` triples.
    pub fn from_entries<I, S, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, T, f64)>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let mut table = TranslationTable::new();
        for (source, target, weight) in entries {
            table
                .entry(source.as_ref().to_lowercase())
                .or_default()
                .insert(target.as_ref().to_lowercase(), weight);
        }
        TranslationTableScore { table }
    }

    pub fn table(&self) -> &TranslationTable {
        &self.table
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl WordPairScore for TranslationTableScore {
    fn score(&self, a: &str, b: &str) -> f64 {
        if a == b {
            return 0.0;
        }
        let weight = self
            .table
            .get(&a.to_lowercase())
            .and_then(|targets| targets.get(&b.to_lowercase()));
        match weight {
            Some(w) => 1.0 - w.clamp(0.0, 1.0),
            None => 1.0,
        }
    }

    fn translations(&self) -> Option<&TranslationTable> {
        Some(&self.table)
    }
}

/// Memoizes the most recent call of the wrapped scorer.
///
/// Greedy word matching scores one source word against every target word in
/// turn, so the cache only hits when the same target word appears twice in a
/// row. The cache uses interior mutability and is not `Sync`.
pub struct CachedWordPairScore<W> {
    inner: W,
    last: RefCell<Option<(String, String, f64)>>,
}

impl<W: WordPairScore> CachedWordPairScore<W> {
    pub fn new(inner: W) -> Self {
        CachedWordPairScore {
            inner,
            last: RefCell::new(None),
        }
    }

    pub fn inner(&self) -> &W {
        &self.inner
    }
}

impl<W: WordPairScore> WordPairScore for CachedWordPairScore<W> {
    fn score(&self, a: &str, b: &str) -> f64 {
        if let Some((last_a, last_b, value)) = self.last.borrow().as_ref() {
            if last_a == a && last_b == b {
                return *value;
            }
        }
        let value = self.inner.score(a, b);
        *self.last.borrow_mut() = Some((a.to_string(), b.to_string(), value));
        value
    }

    fn translations(&self) -> Option<&TranslationTable> {
        self.inner.translations()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_translation_table_score() {
        let scorer = TranslationTableScore::from_entries(vec![
            ("Cat", "chat", 1.0),
            ("sat", "assis", 0.75),
        ]);
        assert_eq!(scorer.score("cat", "Chat"), 0.0);
        assert!((scorer.score("sat", "assis") - 0.25).abs() < 1e-12);
        assert_eq!(scorer.score("dog", "chat"), 1.0);
        assert_eq!(scorer.score("Paris", "Paris"), 0.0);
        assert!(scorer.translations().unwrap().contains_key("cat"));
    }

    #[test]
    fn test_translation_table_serde() {
        let scorer = TranslationTableScore::from_entries(vec![("sat", "assis", 0.75)]);
        let json = serde_json::to_value(&scorer).unwrap();
        assert_eq!(json, serde_json::json!({ "sat": { "assis": 0.75 } }));
        let back: TranslationTableScore = serde_json::from_value(json).unwrap();
        assert_eq!(back, scorer);
    }

    #[test]
    fn test_closures_are_word_scorers() {
        let exact = |a: &str, b: &str| if a == b { 0.0 } else { 1.0 };
        assert_eq!(exact.score("x", "x"), 0.0);
        assert!(exact.translations().is_none());
    }

    #[test]
    fn test_cache_of_size_one() {
        let calls = Cell::new(0usize);
        let counting = |a: &str, b: &str| {
            calls.set(calls.get() + 1);
            if a == b {
                0.0
            } else {
                1.0
            }
        };
        let cached = CachedWordPairScore::new(counting);
        assert_eq!(cached.score("a", "a"), 0.0);
        assert_eq!(cached.score("a", "a"), 0.0);
        assert_eq!(calls.get(), 1);
        assert_eq!(cached.score("a", "b"), 1.0);
        assert_eq!(cached.score("a", "a"), 0.0);
        assert_eq!(calls.get(), 3);
    }
}
