//! Greedy word matching between the two sides of a sentence pair.
//!
//! Each source word is paired with its cheapest target word, in source order,
//! and each matched occurrence is consumed so it cannot be used twice. This is
//! a one-pass approximation of a minimum-cost bipartite matching and is
//! order-dependent on purpose: the trained classifiers were fit against it.
use std::collections::HashMap;

use crate::data_handling::{Sentence, SentencePair};
use crate::word_score::WordPairScore;

/// Multiset of the words still available on one side of the pair.
struct WordPool<'a> {
    counts: HashMap<&'a str, usize>,
    remaining: usize,
}

impl<'a> WordPool<'a> {
    fn new(sentence: &'a Sentence) -> Self {
        let mut counts = HashMap::new();
        for word in sentence.iter() {
            *counts.entry(word).or_insert(0) += 1;
        }
        WordPool {
            counts,
            remaining: sentence.len(),
        }
    }

    fn contains(&self, word: &str) -> bool {
        self.counts.get(word).map_or(false, |&n| n > 0)
    }

    fn take(&mut self, word: &str) {
        if let Some(n) = self.counts.get_mut(word) {
            if *n > 0 {
                *n -= 1;
                self.remaining -= 1;
            }
        }
    }

    fn len(&self) -> usize {
        self.remaining
    }
}

/// For every word of `a`, the cheapest word of `b` scoring strictly below `1`.
///
/// Ties keep the first target word reaching the best cost. Candidates are drawn
/// from the whole of `b`, not from the words still unmatched.
fn best_matches<'a>(
    a: &'a Sentence,
    b: &'a Sentence,
    word_score: &'a dyn WordPairScore,
) -> impl Iterator<Item = (f64, &'a str, &'a str)> + 'a {
    a.iter().filter_map(move |word_a| {
        let mut best = 1.0;
        let mut item = None;
        for word_b in b.iter() {
            let cost = word_score.score(word_a, word_b);
            if cost < best {
                best = cost;
                item = Some((cost, word_a, word_b));
            }
        }
        item
    })
}

/// Normalised mismatch cost of the greedy matching, `0` for a perfect match.
///
/// Pairs whose lengths differ by more than twice either length are not
/// matched at all and cost `1`. Two empty sentences cost `0`.
pub fn word_match(pair: &SentencePair, word_score: &dyn WordPairScore) -> f64 {
    let (a, b) = (pair.a(), pair.b());
    let diff = a.len().abs_diff(b.len());
    if diff > 2 * a.len() || diff > 2 * b.len() {
        return 1.0;
    }
    let longest = pair.max_len();
    if longest == 0 {
        return 0.0;
    }

    let mut pool_a = WordPool::new(a);
    let mut pool_b = WordPool::new(b);
    let mut cost = 0.0;
    for (pair_cost, word_a, word_b) in best_matches(a, b, word_score) {
        if pool_a.contains(word_a) && pool_b.contains(word_b) {
            cost += pair_cost;
            pool_a.take(word_a);
            pool_b.take(word_b);
        }
    }
    cost += (pool_a.len() + pool_b.len()) as f64;
    cost / longest as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exact(a: &str, b: &str) -> f64 {
        if a == b {
            0.0
        } else {
            1.0
        }
    }

    fn pair(a: &str, b: &str) -> SentencePair {
        SentencePair::new(Sentence::from_text(a, 0), Sentence::from_text(b, 0))
    }

    #[test]
    fn test_identical_sentences_match_perfectly() {
        let p = pair("the cat sat on the mat", "the cat sat on the mat");
        assert_eq!(word_match(&p, &exact), 0.0);
    }

    #[test]
    fn test_unbalanced_lengths_short_circuit() {
        let p = pair("a", "a b c d");
        assert_eq!(word_match(&p, &exact), 1.0);
        let p = pair("", "word");
        assert_eq!(word_match(&p, &exact), 1.0);
    }

    #[test]
    fn test_empty_pair_costs_nothing() {
        assert_eq!(word_match(&pair("", ""), &exact), 0.0);
    }

    #[test]
    fn test_unmatched_words_are_penalised() {
        // "x" and "y" find nothing under 1; "a" matches once.
        let p = pair("a x", "a y z");
        assert!((word_match(&p, &exact) - 3.0 / 3.0).abs() < 1e-12);
        let p = pair("a b", "a b c");
        assert!((word_match(&p, &exact) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_consumed_target_is_not_reused() {
        // Both source words prefer "b1"; the second one finds it consumed and
        // stays unmatched even though "b2" was available.
        let scorer = |a: &str, b: &str| match (a, b) {
            (_, "b1") => 0.1,
            ("a2", "b2") => 0.5,
            _ => 1.0,
        };
        let p = pair("a1 a2", "b1 b2");
        let expected = (0.1 + 2.0) / 2.0;
        assert!((word_match(&p, &scorer) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_duplicate_words_consumed_one_at_a_time() {
        let p = pair("la la", "la la");
        assert_eq!(word_match(&p, &exact), 0.0);
        let p = pair("la la", "la");
        assert!((word_match(&p, &exact) - 1.0 / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_ties_keep_first_target() {
        let scorer = |_: &str, b: &str| if b == "z" { 1.0 } else { 0.2 };
        let p = pair("q", "p z");
        let matches: Vec<_> = best_matches(p.a(), p.b(), &scorer).collect();
        assert_eq!(matches, vec![(0.2, "q", "p")]);
    }
}
