//! Linear soft-margin SVM trained with Pegasos-style stochastic sub-gradient
//! descent on standardised features.
//!
//! The bias is folded in as an extra constant feature, so it is regularised
//! together with the weights. Sampling order comes from a seeded `StdRng`,
//! which makes training deterministic for a given seed and dataset.
use ndarray::{Array1, Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::{ModelConfig, ModelType};
use crate::error::{Result, ScoreError};
use crate::models::classifier_trait::ClassifierModel;
use crate::preprocessing::{fit_scaler, Scaler};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearSvmState {
    pub scaler: Scaler,
    /// Weights over standardised features
    pub weights: Vec<f64>,
    pub bias: f64,
}

pub struct LinearSvm {
    lambda: f64,
    epochs: usize,
    seed: u64,
    state: Option<LinearSvmState>,
}

impl LinearSvm {
    pub fn new(params: &ModelConfig) -> Result<Self> {
        match params.model_type {
            ModelType::LinearSvm {
                lambda,
                epochs,
                seed,
            } => {
                if lambda.is_nan() || lambda <= 0.0 {
                    return Err(ScoreError::Classifier(format!(
                        "lambda must be positive, got {}",
                        lambda
                    )));
                }
                Ok(LinearSvm {
                    lambda,
                    epochs,
                    seed,
                    state: None,
                })
            }
            #[allow(unreachable_patterns)]
            ref other => Err(ScoreError::UnsupportedModel(format!(
                "expected linear_svm params, got {:?}",
                other
            ))),
        }
    }

    /// Rebuild a fitted model from a persisted state.
    pub fn from_state(params: &ModelConfig, state: LinearSvmState) -> Result<Self> {
        if state.weights.len() != state.scaler.ncols() {
            return Err(ScoreError::FeatureMismatch {
                expected: state.scaler.ncols(),
                found: state.weights.len(),
            });
        }
        let mut model = Self::new(params)?;
        model.state = Some(state);
        Ok(model)
    }

    pub fn state(&self) -> Option<&LinearSvmState> {
        self.state.as_ref()
    }

    fn fitted(&self) -> Result<&LinearSvmState> {
        self.state
            .as_ref()
            .ok_or_else(|| ScoreError::Classifier("linear svm used before fit".to_string()))
    }
}

impl ClassifierModel for LinearSvm {
    fn fit(&mut self, x: &Array2<f64>, y: &[bool]) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(ScoreError::Classifier(format!(
                "{} feature rows but {} labels",
                x.nrows(),
                y.len()
            )));
        }
        if x.nrows() == 0 {
            return Err(ScoreError::EmptyTrainingSet);
        }

        let scaler = fit_scaler(x);
        let x = scaler.transform(x);
        let n = x.nrows();
        let dim = x.ncols();

        // Last slot holds the bias.
        let mut w = Array1::<f64>::zeros(dim + 1);
        let mut rng = StdRng::seed_from_u64(self.seed);
        let iterations = self.epochs.max(1) * n;

        for t in 1..=iterations {
            let i = rng.gen_range(0..n);
            let row = x.row(i);
            let label = if y[i] { 1.0 } else { -1.0 };
            let eta = 1.0 / (self.lambda * t as f64);
            let margin = row.dot(&w.slice(ndarray::s![..dim])) + w[dim];

            w *= 1.0 - eta * self.lambda;
            if label * margin < 1.0 {
                w.slice_mut(ndarray::s![..dim])
                    .scaled_add(eta * label, &row);
                w[dim] += eta * label;
            }

            if t % n == 0 {
                log::trace!("Epoch {} of {}: |w| = {:.4}", t / n, self.epochs, w.dot(&w).sqrt());
            }
        }

        let bias = w[dim];
        let weights = w.slice(ndarray::s![..dim]).to_vec();
        log::debug!("Linear svm fit on {} rows: weights {:?}, bias {:.4}", n, weights, bias);

        self.state = Some(LinearSvmState {
            scaler,
            weights,
            bias,
        });
        Ok(())
    }

    fn decision_function(&self, x: ArrayView1<f64>) -> Result<f64> {
        let state = self.fitted()?;
        if x.len() != state.weights.len() {
            return Err(ScoreError::FeatureMismatch {
                expected: state.weights.len(),
                found: x.len(),
            });
        }
        let row = state.scaler.transform_row(x);
        Ok(row
            .iter()
            .zip(state.weights.iter())
            .map(|(v, w)| v * w)
            .sum::<f64>()
            + state.bias)
    }

    fn save_state(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self.fitted()?)?)
    }

    fn name(&self) -> &str {
        "linear_svm"
    }
}
