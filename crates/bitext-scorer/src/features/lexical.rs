//! Surface-level features comparing token counts between the two sides.
use crate::data_handling::{is_digit, is_title, is_upper, SentencePair};
use crate::math::ratio;
use crate::word_score::WordPairScore;

/// Single-character tokens counted by the `punctuation` feature.
pub const PUNCTUATION: [&str; 10] = [",", ".", "-", "?", "+", "<", ">", "_", "\\", "/"];

fn count_ratio<F>(pair: &SentencePair, predicate: F) -> f64
where
    F: Fn(&str) -> bool,
{
    ratio(pair.a().count_where(&predicate), pair.b().count_where(&predicate))
}

pub(crate) fn position_difference(pair: &SentencePair, _: &dyn WordPairScore) -> f64 {
    pair.a().position.abs_diff(pair.b().position) as f64
}

pub(crate) fn word_length_difference(pair: &SentencePair, _: &dyn WordPairScore) -> f64 {
    ratio(pair.a().len(), pair.b().len())
}

pub(crate) fn uppercase_words_difference(pair: &SentencePair, _: &dyn WordPairScore) -> f64 {
    count_ratio(pair, is_upper)
}

pub(crate) fn capitalized_words_difference(pair: &SentencePair, _: &dyn WordPairScore) -> f64 {
    count_ratio(pair, is_title)
}

pub(crate) fn commas(pair: &SentencePair, _: &dyn WordPairScore) -> f64 {
    count_ratio(pair, |w| w == ",")
}

pub(crate) fn question_marks(pair: &SentencePair, _: &dyn WordPairScore) -> f64 {
    count_ratio(pair, |w| w == "?")
}

pub(crate) fn punctuation(pair: &SentencePair, _: &dyn WordPairScore) -> f64 {
    count_ratio(pair, |w| PUNCTUATION.contains(&w))
}

pub(crate) fn digits(pair: &SentencePair, _: &dyn WordPairScore) -> f64 {
    count_ratio(pair, is_digit)
}
