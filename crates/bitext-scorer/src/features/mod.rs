//! Feature extraction for sentence pairs.
//!
//! A `FeatureExtractor` owns an ordered registry of named feature functions,
//! fixed at construction, and the word scorer some of them consult. Rows
//! produced by the extractor always list features in registry order.
use std::rc::Rc;

use ndarray::{Array1, Array2};

use crate::config::FeatureConfig;
use crate::data_handling::SentencePair;
use crate::error::{Result, ScoreError};
use crate::word_score::WordPairScore;

pub mod lexical;
pub mod translation;
pub mod word_match;

pub use word_match::word_match;

type FeatureFn = fn(&SentencePair, &dyn WordPairScore) -> f64;

/// A named feature computation.
#[derive(Clone, Copy)]
pub struct Feature {
    pub name: &'static str,
    compute: FeatureFn,
}

impl Feature {
    const fn new(name: &'static str, compute: FeatureFn) -> Self {
        Feature { name, compute }
    }

    pub fn compute(&self, pair: &SentencePair, word_score: &dyn WordPairScore) -> f64 {
        (self.compute)(pair, word_score)
    }
}

impl std::fmt::Debug for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Feature").field(&self.name).finish()
    }
}

/// Features computed for every pair, in column order.
pub const BASE_FEATURES: [Feature; 9] = [
    Feature::new("position_difference", lexical::position_difference),
    Feature::new("word_length_difference", lexical::word_length_difference),
    Feature::new("uppercase_words_difference", lexical::uppercase_words_difference),
    Feature::new("capitalized_words_difference", lexical::capitalized_words_difference),
    Feature::new("commas", lexical::commas),
    Feature::new("question_marks", lexical::question_marks),
    Feature::new("punctuation", lexical::punctuation),
    Feature::new("digits", lexical::digits),
    Feature::new("word_match", word_match::word_match),
];

pub const LINEAR_WORD_MATCH: Feature =
    Feature::new("linear_word_match", translation::linear_word_match);
pub const LINEAR_WORD_COUNT: Feature =
    Feature::new("linear_word_count", translation::linear_word_count);

/// Named feature values for one sentence pair, in registry order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    names: Vec<&'static str>,
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn names(&self) -> &[&'static str] {
        &self.names
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|&n| n == name)
            .map(|idx| self.values[idx])
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.names.iter().copied().zip(self.values.iter().copied())
    }

    pub fn into_array(self) -> Array1<f64> {
        Array1::from_vec(self.values)
    }
}

/// Maps sentence pairs onto fixed-width feature rows.
pub struct FeatureExtractor {
    features: Vec<Feature>,
    config: FeatureConfig,
    word_pair_score: Rc<dyn WordPairScore>,
}

impl FeatureExtractor {
    /// Build the registry for `config`.
    ///
    /// Fails when a translation-table feature is enabled but `word_pair_score`
    /// exposes no table.
    pub fn new(word_pair_score: Rc<dyn WordPairScore>, config: FeatureConfig) -> Result<Self> {
        let mut features = BASE_FEATURES.to_vec();
        for (enabled, feature) in [
            (config.linear_word_match, LINEAR_WORD_MATCH),
            (config.linear_word_count, LINEAR_WORD_COUNT),
        ] {
            if !enabled {
                continue;
            }
            if word_pair_score.translations().is_none() {
                return Err(ScoreError::MissingTranslations {
                    feature: feature.name,
                });
            }
            features.push(feature);
        }

        log::debug!(
            "Feature extractor with {} features: {:?}",
            features.len(),
            features.iter().map(|f| f.name).collect::<Vec<_>>()
        );

        Ok(FeatureExtractor {
            features,
            config,
            word_pair_score,
        })
    }

    pub fn word_pair_score(&self) -> &Rc<dyn WordPairScore> {
        &self.word_pair_score
    }

    pub fn config(&self) -> FeatureConfig {
        self.config
    }

    pub fn feature_names(&self) -> Vec<&'static str> {
        self.features.iter().map(|f| f.name).collect()
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    pub fn extract(&self, pair: &SentencePair) -> FeatureVector {
        let word_score = self.word_pair_score.as_ref();
        FeatureVector {
            names: self.feature_names(),
            values: self
                .features
                .iter()
                .map(|f| f.compute(pair, word_score))
                .collect(),
        }
    }

    /// Feature matrix with one row per pair.
    pub fn extract_matrix<'a, I>(&self, pairs: I) -> Array2<f64>
    where
        I: IntoIterator<Item = &'a SentencePair>,
    {
        let rows: Vec<FeatureVector> = pairs.into_iter().map(|p| self.extract(p)).collect();
        Array2::from_shape_fn((rows.len(), self.feature_count()), |(i, j)| {
            rows[i].values[j]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_handling::Sentence;
    use crate::word_score::TranslationTableScore;

    fn exact() -> Rc<dyn WordPairScore> {
        Rc::new(|a: &str, b: &str| if a == b { 0.0 } else { 1.0 })
    }

    #[test]
    fn test_default_registry_order() {
        let extractor = FeatureExtractor::new(exact(), FeatureConfig::default()).unwrap();
        assert_eq!(
            extractor.feature_names(),
            vec![
                "position_difference",
                "word_length_difference",
                "uppercase_words_difference",
                "capitalized_words_difference",
                "commas",
                "question_marks",
                "punctuation",
                "digits",
                "word_match",
            ]
        );
    }

    #[test]
    fn test_linear_features_need_translations() {
        let err = FeatureExtractor::new(exact(), FeatureConfig::with_linear_features());
        assert!(matches!(
            err,
            Err(ScoreError::MissingTranslations {
                feature: "linear_word_match"
            })
        ));

        let table: Rc<dyn WordPairScore> =
            Rc::new(TranslationTableScore::from_entries(vec![("dog", "chien", 1.0)]));
        let extractor =
            FeatureExtractor::new(table, FeatureConfig::with_linear_features()).unwrap();
        assert_eq!(extractor.feature_count(), 11);
    }

    #[test]
    fn test_extract_identical_pair() {
        let extractor = FeatureExtractor::new(exact(), FeatureConfig::default()).unwrap();
        let s = Sentence::from_text("Ottawa , 1867 ?", 4);
        let features = extractor.extract(&SentencePair::new(s.clone(), s));
        assert_eq!(features.get("position_difference"), Some(0.0));
        assert_eq!(features.get("word_match"), Some(0.0));
        for name in ["word_length_difference", "capitalized_words_difference", "commas", "digits"] {
            assert_eq!(features.get(name), Some(1.0), "{}", name);
        }
        assert_eq!(features.get("uppercase_words_difference"), Some(0.0));
        assert_eq!(features.get("linear_word_count"), None);
    }

    #[test]
    fn test_extract_matrix_shape() {
        let extractor = FeatureExtractor::new(exact(), FeatureConfig::default()).unwrap();
        let pairs = vec![
            SentencePair::new(Sentence::from_text("a b", 0), Sentence::from_text("a", 1)),
            SentencePair::new(Sentence::from_text("c", 2), Sentence::from_text("c d e f", 2)),
        ];
        let x = extractor.extract_matrix(&pairs);
        assert_eq!(x.dim(), (2, 9));
        assert_eq!(x[(0, 0)], 1.0);
        assert_eq!(x[(1, 8)], 1.0);
    }
}
