//! bitext-scorer: sentence pair likelihood scoring for bitext alignment.
//!
//! A [`SentencePairScorer`](sentence_pair_scorer::SentencePairScorer) turns a
//! pair of tokenised sentences into a score in `[0, 1]`. It extracts a fixed
//! set of similarity features (length and punctuation ratios, position
//! difference, greedy word matching through an injected
//! [`WordPairScore`](word_score::WordPairScore)), feeds them to a binary
//! classifier, calibrates the classifier's margin sign once at training time
//! and squashes the calibrated margin with a logistic function.
//!
//! Classifiers sit behind the [`ClassifierModel`](models::ClassifierModel)
//! trait. The default is a dependency-light linear SVM; a kernel SVM backed by
//! `linfa-svm` is available with the `svm` feature.
pub mod config;
pub mod data_handling;
pub mod error;
pub mod features;
pub mod math;
pub mod models;
pub mod preprocessing;
pub mod sentence_pair_scorer;
pub mod word_score;

pub use config::{FeatureConfig, ModelConfig, ModelType, ScorerConfig};
pub use data_handling::{Alignment, Sentence, SentencePair};
pub use error::ScoreError;
pub use sentence_pair_scorer::{SentencePairScorer, Sign};
pub use word_score::{CachedWordPairScore, TranslationTable, TranslationTableScore, WordPairScore};
