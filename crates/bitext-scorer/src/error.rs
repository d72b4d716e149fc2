use thiserror::Error;

/// Errors raised while training, scoring or persisting a sentence pair scorer.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// Every training example produced a raw classifier score of exactly zero.
    #[error("cannot infer sign with this data: every training example scored 0")]
    Calibration,

    /// `score` was called before a successful `train` or `load`.
    #[error("score not trained or loaded yet")]
    NotTrained,

    #[error("cannot train on an empty set of alignments")]
    EmptyTrainingSet,

    /// A translation-table feature was requested but the word scorer has no table.
    #[error("feature '{feature}' needs a word scorer with a translation table")]
    MissingTranslations { feature: &'static str },

    /// The word scorer given to `load` does not match the one the scorer was saved with.
    #[error("word scorer does not match the saved scorer: {0}")]
    WordScorerMismatch(String),

    #[error("expected {expected} features per row, found {found}")]
    FeatureMismatch { expected: usize, found: usize },

    #[error("classifier error: {0}")]
    Classifier(String),

    #[error("unsupported model: {0}")]
    UnsupportedModel(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScoreError>;
