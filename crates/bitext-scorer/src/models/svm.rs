use linfa::dataset::Pr;
use linfa::traits::Predict;
use linfa::Dataset;
use linfa_svm::Svm;
use linfa_svm::SvmParams;
use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

use crate::config::{ModelConfig, ModelType};
use crate::error::{Result, ScoreError};
use crate::models::classifier_trait::ClassifierModel;
use crate::preprocessing::{fit_scaler, Scaler};

/// Probabilities are clamped away from 0 and 1 before taking the log-odds.
const PROBABILITY_EPS: f64 = 1e-12;

#[derive(Serialize, Deserialize)]
pub struct SvmState {
    pub scaler: Scaler,
    pub svm: Svm<f64, Pr>,
}

/// Kernel SVM backed by `linfa-svm`, with Platt-scaled outputs.
///
/// The margin reported to the scorer is the log-odds of the Platt
/// probability, so it is positive exactly when the model predicts `true`.
pub struct SvmClassifier {
    model: Option<SvmState>,
    params: ModelConfig,
}

impl SvmClassifier {
    pub fn new(params: ModelConfig) -> Self {
        SvmClassifier {
            model: None,
            params,
        }
    }

    pub fn from_state(params: ModelConfig, state: SvmState) -> Self {
        SvmClassifier {
            model: Some(state),
            params,
        }
    }

    fn fitted(&self) -> Result<&SvmState> {
        self.model
            .as_ref()
            .ok_or_else(|| ScoreError::Classifier("svm used before fit".to_string()))
    }
}

impl ClassifierModel for SvmClassifier {
    fn fit(&mut self, x: &Array2<f64>, y: &[bool]) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(ScoreError::Classifier(format!(
                "{} feature rows but {} labels",
                x.nrows(),
                y.len()
            )));
        }

        let scaler = fit_scaler(x);
        let dataset = Dataset::new(scaler.transform(x), Array1::from_vec(y.to_vec()));

        let ModelType::Svm {
            eps,
            c,
            kernel,
            gaussian_kernel_eps,
            polynomial_kernel_constant,
            polynomial_kernel_degree,
        } = &self.params.model_type
        else {
            return Err(ScoreError::UnsupportedModel(format!(
                "expected svm params, got {:?}",
                self.params.model_type
            )));
        };

        let (c1, c2) = *c;
        let model: SvmParams<f64, Pr> = Svm::<f64, Pr>::params().eps(*eps).pos_neg_weights(c1, c2);

        // Chain the kernel configuration based on the kernel type
        let model = match kernel.as_str() {
            "linear" => model.linear_kernel(),
            "gauss" => model.gaussian_kernel(*gaussian_kernel_eps),
            "poly" => model.polynomial_kernel(*polynomial_kernel_constant, *polynomial_kernel_degree),
            _ => {
                return Err(ScoreError::UnsupportedModel(format!(
                    "Unsupported kernel type: {}. Valid options are: linear, gauss, poly",
                    kernel
                )))
            }
        };

        let svm = <SvmParams<f64, Pr> as linfa::traits::Fit<_, _, _>>::fit(&model, &dataset)
            .map_err(|e| ScoreError::Classifier(e.to_string()))?;
        log::debug!("Kernel svm ({}) fit on {} rows", kernel, x.nrows());

        self.model = Some(SvmState { scaler, svm });
        Ok(())
    }

    fn decision_function(&self, x: ArrayView1<f64>) -> Result<f64> {
        let state = self.fitted()?;
        if x.len() != state.scaler.ncols() {
            return Err(ScoreError::FeatureMismatch {
                expected: state.scaler.ncols(),
                found: x.len(),
            });
        }
        let row = state.scaler.transform_row(x).insert_axis(Axis(0));
        let predictions = state.svm.predict(row);
        let p = predictions
            .targets()
            .iter()
            .map(|&v| *v as f64)
            .next()
            .unwrap_or(0.5)
            .clamp(PROBABILITY_EPS, 1.0 - PROBABILITY_EPS);
        Ok((p / (1.0 - p)).ln())
    }

    fn save_state(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self.fitted()?)?)
    }

    fn name(&self) -> &str {
        "svm"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_svm_classifier() {
        let x = array![
            [0.1, 1.0, 5.0],
            [0.4, -1.0, 5.0],
            [0.6, 1.0, 5.0],
            [0.9, -1.0, 5.0],
            [1.2, 1.0, 5.0],
            [1.5, -1.0, 5.0],
            [1.8, 1.0, 5.0],
            [2.1, -1.0, 5.0],
        ];
        // Target perfectly correlated with the second feature
        let y: Vec<bool> = x.column(1).iter().map(|&v| v > 0.0).collect();

        let params = ModelConfig::new(ModelType::Svm {
            eps: 1e-7,
            c: (1.0, 1.0),
            kernel: "linear".to_string(),
            gaussian_kernel_eps: 0.1,
            polynomial_kernel_constant: 1.0,
            polynomial_kernel_degree: 1.0,
        });
        let mut classifier = SvmClassifier::new(params);
        classifier.fit(&x, &y).unwrap();

        let margins: Vec<f64> = x
            .rows()
            .into_iter()
            .map(|row| classifier.decision_function(row).unwrap())
            .collect();
        let mean_pos = margins.iter().zip(&y).filter(|(_, &l)| l).map(|(m, _)| m).sum::<f64>();
        let mean_neg = margins.iter().zip(&y).filter(|(_, &l)| !l).map(|(m, _)| m).sum::<f64>();
        assert!(mean_pos > mean_neg, "margins: {:?}", margins);
    }
}
