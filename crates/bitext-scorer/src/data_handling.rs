//! Sentence, sentence pair and labeled alignment types.
//!
//! A `Sentence` is an ordered list of word tokens plus the sentence's position
//! inside its document. Pairs are immutable once built; `Alignment` adds the
//! boolean training target used when fitting the classifier.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    /// Token texts in sentence order
    pub words: Vec<String>,
    /// Index of the sentence within its document
    pub position: usize,
}

impl Sentence {
    pub fn new<I, S>(words: I, position: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Sentence {
            words: words.into_iter().map(Into::into).collect(),
            position,
        }
    }

    /// Build a sentence by splitting `text` on whitespace.
    pub fn from_text(text: &str, position: usize) -> Self {
        Self::new(text.split_whitespace(), position)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    /// Number of tokens satisfying `predicate`.
    pub fn count_where<F>(&self, predicate: F) -> usize
    where
        F: Fn(&str) -> bool,
    {
        self.iter().filter(|w| predicate(w)).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentencePair {
    a: Sentence,
    b: Sentence,
}

impl SentencePair {
    pub fn new(a: Sentence, b: Sentence) -> Self {
        SentencePair { a, b }
    }

    pub fn a(&self) -> &Sentence {
        &self.a
    }

    pub fn b(&self) -> &Sentence {
        &self.b
    }

    /// Length of the longer sentence, the normaliser shared by the match features.
    pub fn max_len(&self) -> usize {
        self.a.len().max(self.b.len())
    }
}

/// A sentence pair labeled with whether the two sides are translations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alignment {
    pub pair: SentencePair,
    pub aligned: bool,
}

impl Alignment {
    pub fn new(a: Sentence, b: Sentence, aligned: bool) -> Self {
        Alignment {
            pair: SentencePair::new(a, b),
            aligned,
        }
    }
}

/// True when the token has at least one cased character and none are lowercase.
pub fn is_upper(word: &str) -> bool {
    let mut cased = false;
    for c in word.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            cased = true;
        }
    }
    cased
}

/// True when every run of cased characters starts with an uppercase character
/// followed only by lowercase ones, e.g. `"Hello"` or `"Jean-Luc"`.
pub fn is_title(word: &str) -> bool {
    let mut cased = false;
    let mut previous_is_cased = false;
    for c in word.chars() {
        if c.is_uppercase() {
            if previous_is_cased {
                return false;
            }
            previous_is_cased = true;
            cased = true;
        } else if c.is_lowercase() {
            if !previous_is_cased {
                return false;
            }
            previous_is_cased = true;
            cased = true;
        } else {
            previous_is_cased = false;
        }
    }
    cased
}

/// True for non-empty tokens made only of decimal digits.
///
/// Vulgar fractions and numeral letters such as `½` or `Ⅻ` are numeric but
/// not digits.
pub fn is_digit(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.to_digit(10).is_some())
}
