//! Features reading the word scorer's translation table directly.
use std::collections::{HashMap, HashSet};

use crate::data_handling::SentencePair;
use crate::word_score::WordPairScore;

/// Sum of translation weights of the target words reachable from any source
/// word, normalised by the longer sentence.
///
/// When several source words translate to the same target word, the weight of
/// the last such source word wins.
pub(crate) fn linear_word_match(pair: &SentencePair, word_score: &dyn WordPairScore) -> f64 {
    let (Some(translations), longest) = (word_score.translations(), pair.max_len()) else {
        return 0.0;
    };
    if longest == 0 {
        return 0.0;
    }

    let mut values: HashMap<&str, f64> = HashMap::new();
    for word_a in pair.a().iter() {
        if let Some(targets) = translations.get(&word_a.to_lowercase()) {
            values.extend(targets.iter().map(|(w, &v)| (w.as_str(), v)));
        }
    }

    let total: f64 = pair
        .b()
        .iter()
        .map(|word_b| values.get(word_b.to_lowercase().as_str()).copied().unwrap_or(0.0))
        .sum();
    total / longest as f64
}

/// Number of target words that are a known translation of some source word,
/// normalised by the longer sentence.
pub(crate) fn linear_word_count(pair: &SentencePair, word_score: &dyn WordPairScore) -> f64 {
    let (Some(translations), longest) = (word_score.translations(), pair.max_len()) else {
        return 0.0;
    };
    if longest == 0 {
        return 0.0;
    }

    let known: HashSet<&str> = pair
        .a()
        .iter()
        .filter_map(|word_a| translations.get(&word_a.to_lowercase()))
        .flat_map(|targets| targets.keys().map(String::as_str))
        .collect();

    let hits = pair
        .b()
        .iter()
        .filter(|word_b| known.contains(word_b.to_lowercase().as_str()))
        .count();
    hits as f64 / longest as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_handling::Sentence;
    use crate::word_score::TranslationTableScore;

    fn table() -> TranslationTableScore {
        TranslationTableScore::from_entries(vec![
            ("the", "le", 0.5),
            ("the", "la", 0.4),
            ("cat", "chat", 0.9),
        ])
    }

    #[test]
    fn test_linear_word_match() {
        let p = SentencePair::new(
            Sentence::from_text("The cat", 0),
            Sentence::from_text("le Chat dort", 0),
        );
        let value = linear_word_match(&p, &table());
        assert!((value - (0.5 + 0.9) / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_linear_word_count() {
        let p = SentencePair::new(
            Sentence::from_text("the cat", 0),
            Sentence::from_text("la chat chat dort", 0),
        );
        assert!((linear_word_count(&p, &table()) - 3.0 / 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_without_table_or_words() {
        let plain = |_: &str, _: &str| 1.0;
        let p = SentencePair::new(Sentence::from_text("the", 0), Sentence::from_text("le", 0));
        assert_eq!(linear_word_count(&p, &plain), 0.0);
        let empty = SentencePair::new(Sentence::from_text("", 0), Sentence::from_text("", 0));
        assert_eq!(linear_word_match(&empty, &table()), 0.0);
    }
}
