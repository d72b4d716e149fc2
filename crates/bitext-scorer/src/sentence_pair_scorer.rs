//! Bounded likelihood score for sentence pairs.
//!
//! `SentencePairScorer` owns a trained classifier over the features of
//! [`FeatureExtractor`], a one-time sign calibration, and the logistic
//! squashing that maps calibrated margins into `[0, 1]`.
//!
//! The scorer holds its word scorer behind an `Rc` and is neither `Send` nor
//! `Sync`. Training and scoring on a shared instance must be serialised by the
//! caller.
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::config::{FeatureConfig, ModelConfig, ScorerConfig};
use crate::data_handling::{Alignment, Sentence, SentencePair};
use crate::error::{Result, ScoreError};
use crate::features::{FeatureExtractor, FeatureVector};
use crate::math::logistic;
use crate::models::factory::{build_model, restore_model};
use crate::models::ClassifierModel;
use crate::word_score::{TranslationTable, TranslationTableScore, WordPairScore};

/// Version of the JSON document written by [`SentencePairScorer::save`].
pub const FORMAT_VERSION: u32 = 1;

/// Polarity applied to raw classifier margins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sign {
    #[default]
    Positive,
    Negative,
}

impl Sign {
    pub fn value(self) -> f64 {
        match self {
            Sign::Positive => 1.0,
            Sign::Negative => -1.0,
        }
    }
}

struct TrainedModel {
    extractor: FeatureExtractor,
    classifier: Box<dyn ClassifierModel>,
    sign: Sign,
    steepness: f64,
}

#[derive(Serialize, Deserialize)]
struct PersistedModel {
    config: ModelConfig,
    state: serde_json::Value,
}

#[derive(Serialize, Deserialize)]
struct PersistedScorer {
    format_version: u32,
    created_at: DateTime<Utc>,
    sign: Sign,
    steepness: f64,
    features: FeatureConfig,
    feature_names: Vec<String>,
    /// Table behind the bound word scorer, if it has one.
    #[serde(default)]
    translations: Option<TranslationTable>,
    model: PersistedModel,
}

pub struct SentencePairScorer {
    config: ScorerConfig,
    trained: Option<TrainedModel>,
}

impl Default for SentencePairScorer {
    fn default() -> Self {
        Self::new(ScorerConfig::default())
    }
}

impl SentencePairScorer {
    /// Create an untrained scorer. `score` fails until `train` or `load` succeeds.
    pub fn new(config: ScorerConfig) -> Self {
        SentencePairScorer {
            config,
            trained: None,
        }
    }

    /// Restore a scorer previously written by [`save`](Self::save).
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        word_pair_score: Rc<dyn WordPairScore>,
    ) -> Result<Self> {
        let mut scorer = Self::default();
        scorer.load(path, word_pair_score)?;
        Ok(scorer)
    }

    /// Restore a scorer saved with a translation table, rebuilding a
    /// [`TranslationTableScore`] from the table stored in the document.
    pub fn from_path_with_saved_translations<P: AsRef<Path>>(path: P) -> Result<Self> {
        let persisted = read_persisted(path.as_ref())?;
        let table = persisted.translations.clone().ok_or_else(|| {
            ScoreError::WordScorerMismatch("no translation table was saved".to_string())
        })?;
        let mut scorer = Self::default();
        scorer.install(persisted, Rc::new(TranslationTableScore::new(table)), path.as_ref())?;
        Ok(scorer)
    }

    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    /// Range every score lies in.
    pub fn bounds(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    pub fn is_trained(&self) -> bool {
        self.trained.is_some()
    }

    pub fn sign(&self) -> Option<Sign> {
        self.trained.as_ref().map(|t| t.sign)
    }

    pub fn feature_names(&self) -> Option<Vec<&'static str>> {
        self.trained.as_ref().map(|t| t.extractor.feature_names())
    }

    /// The word scorer bound at training or load time.
    pub fn word_pair_score(&self) -> Result<&Rc<dyn WordPairScore>> {
        Ok(self.fitted()?.extractor.word_pair_score())
    }

    /// Train the scorer on labeled alignments, using the classifier named by
    /// the configuration.
    pub fn train(
        &mut self,
        examples: &[Alignment],
        word_pair_score: Rc<dyn WordPairScore>,
    ) -> Result<()> {
        let classifier = build_model(&self.config.model)?;
        self.train_with_model(examples, word_pair_score, classifier)
    }

    /// Train with a caller-supplied classifier.
    ///
    /// `save` records the configured model type, so only classifiers the
    /// factory can rebuild round-trip through `load`. On failure the
    /// previously trained state, if any, is left untouched.
    pub fn train_with_model(
        &mut self,
        examples: &[Alignment],
        word_pair_score: Rc<dyn WordPairScore>,
        mut classifier: Box<dyn ClassifierModel>,
    ) -> Result<()> {
        if examples.is_empty() {
            return Err(ScoreError::EmptyTrainingSet);
        }

        let extractor = FeatureExtractor::new(word_pair_score, self.config.features)?;
        let x = extractor.extract_matrix(examples.iter().map(|e| &e.pair));
        let y: Vec<bool> = examples.iter().map(|e| e.aligned).collect();

        log::info!(
            "Training {} on {} alignments ({} aligned) with {} features",
            classifier.name(),
            examples.len(),
            y.iter().filter(|&&l| l).count(),
            extractor.feature_count()
        );

        classifier.fit(&x, &y)?;
        let sign = infer_sign(classifier.as_ref(), &x)?;
        log::info!("Calibrated margin sign: {:?}", sign);

        self.trained = Some(TrainedModel {
            extractor,
            classifier,
            sign,
            steepness: self.config.steepness,
        });
        Ok(())
    }

    /// Likelihood score of `a` and `b`, always within `[0, 1]`.
    pub fn score(&self, a: &Sentence, b: &Sentence) -> Result<f64> {
        self.score_pair(&SentencePair::new(a.clone(), b.clone()))
    }

    pub fn score_pair(&self, pair: &SentencePair) -> Result<f64> {
        let trained = self.fitted()?;
        let row = trained.extractor.extract(pair).into_array();
        let margin = trained.classifier.decision_function(row.view())?;
        Ok(logistic(margin * trained.sign.value() * trained.steepness))
    }

    /// Feature values the classifier sees for `pair`.
    pub fn features(&self, pair: &SentencePair) -> Result<FeatureVector> {
        Ok(self.fitted()?.extractor.extract(pair))
    }

    /// Write the classifier state, sign and feature policy as one JSON document.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let trained = self.fitted()?;
        let persisted = PersistedScorer {
            format_version: FORMAT_VERSION,
            created_at: Utc::now(),
            sign: trained.sign,
            steepness: trained.steepness,
            features: trained.extractor.config(),
            feature_names: trained
                .extractor
                .feature_names()
                .into_iter()
                .map(String::from)
                .collect(),
            translations: trained.extractor.word_pair_score().translations().cloned(),
            model: PersistedModel {
                config: self.config.model.clone(),
                state: trained.classifier.save_state()?,
            },
        };

        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        serde_json::to_writer_pretty(&mut writer, &persisted)?;
        writer.flush()?;
        log::info!("Saved sentence pair scorer to {}", path.as_ref().display());
        Ok(())
    }

    /// Replace the current state with the one stored at `path`.
    ///
    /// Only the word scorer's translation table is stored, so the scorer has
    /// to be supplied again. Its table must equal the saved one (or both be
    /// absent); scorers without a table cannot be compared further.
    pub fn load<P: AsRef<Path>>(
        &mut self,
        path: P,
        word_pair_score: Rc<dyn WordPairScore>,
    ) -> Result<()> {
        let persisted = read_persisted(path.as_ref())?;
        self.install(persisted, word_pair_score, path.as_ref())
    }

    fn install(
        &mut self,
        persisted: PersistedScorer,
        word_pair_score: Rc<dyn WordPairScore>,
        path: &Path,
    ) -> Result<()> {
        let extractor = FeatureExtractor::new(word_pair_score, persisted.features)?;
        check_translations(
            persisted.translations.as_ref(),
            extractor.word_pair_score().translations(),
        )?;

        let names = extractor.feature_names();
        if names.len() != persisted.feature_names.len()
            || names.iter().zip(&persisted.feature_names).any(|(a, b)| *a != b.as_str())
        {
            return Err(ScoreError::FeatureMismatch {
                expected: persisted.feature_names.len(),
                found: names.len(),
            });
        }

        let classifier = restore_model(&persisted.model.config, persisted.model.state)?;
        log::info!(
            "Loaded {} scorer from {} (saved {})",
            classifier.name(),
            path.display(),
            persisted.created_at
        );

        self.config = ScorerConfig {
            steepness: persisted.steepness,
            features: persisted.features,
            model: persisted.model.config,
        };
        self.trained = Some(TrainedModel {
            extractor,
            classifier,
            sign: persisted.sign,
            steepness: persisted.steepness,
        });
        Ok(())
    }

    fn fitted(&self) -> Result<&TrainedModel> {
        self.trained.as_ref().ok_or(ScoreError::NotTrained)
    }
}

fn read_persisted(path: &Path) -> Result<PersistedScorer> {
    let reader = BufReader::new(File::open(path)?);
    let persisted: PersistedScorer = serde_json::from_reader(reader)?;
    if persisted.format_version != FORMAT_VERSION {
        return Err(ScoreError::UnsupportedModel(format!(
            "scorer format version {} (expected {})",
            persisted.format_version, FORMAT_VERSION
        )));
    }
    Ok(persisted)
}

fn check_translations(
    saved: Option<&TranslationTable>,
    supplied: Option<&TranslationTable>,
) -> Result<()> {
    match (saved, supplied) {
        (None, None) => Ok(()),
        (Some(saved), Some(supplied)) if saved == supplied => Ok(()),
        (Some(saved), Some(supplied)) => Err(ScoreError::WordScorerMismatch(format!(
            "translation table differs from the saved one ({} source words saved, {} supplied)",
            saved.len(),
            supplied.len()
        ))),
        (Some(_), None) => Err(ScoreError::WordScorerMismatch(
            "saved with a translation table but the supplied word scorer has none".to_string(),
        )),
        (None, Some(_)) => Err(ScoreError::WordScorerMismatch(
            "saved without a translation table but the supplied word scorer has one".to_string(),
        )),
    }
}

/// Polarity of the trained classifier's margins.
///
/// Looks at training rows in order and stops at the first one with a non-zero
/// margin. When that margin already agrees with the classifier's own label
/// (positive and `true`, or negative and `false`) the sign is flipped, which
/// makes the final score grow as the classifier leans towards "not aligned".
fn infer_sign(classifier: &dyn ClassifierModel, x: &Array2<f64>) -> Result<Sign> {
    for (i, row) in x.rows().into_iter().enumerate() {
        let margin = classifier.decision_function(row)?;
        if margin == 0.0 {
            continue;
        }
        let label = classifier.classify(row)?;
        log::trace!("Sign inferred from example {}: margin {}, label {}", i, margin, label);
        if (margin > 0.0 && label) || (margin < 0.0 && !label) {
            return Ok(Sign::Negative);
        }
        return Ok(Sign::Positive);
    }
    Err(ScoreError::Calibration)
}
