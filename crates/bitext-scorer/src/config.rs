use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::error::Result;

/// Steepness applied to calibrated margins before logistic squashing.
pub const DEFAULT_STEEPNESS: f64 = 3.0;

/// Central configuration for a sentence pair scorer.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ScorerConfig {
    #[serde(default = "default_steepness")]
    pub steepness: f64,

    #[serde(default)]
    pub features: FeatureConfig,

    #[serde(default)]
    pub model: ModelConfig,
}

fn default_steepness() -> f64 {
    DEFAULT_STEEPNESS
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            steepness: DEFAULT_STEEPNESS,
            features: FeatureConfig::default(),
            model: ModelConfig::default(),
        }
    }
}

impl ScorerConfig {
    /// Read a JSON configuration file. Missing fields fall back to defaults.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Optional features layered on top of the always-on set.
///
/// Both linear features read the word scorer's translation table and are off
/// unless explicitly enabled.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureConfig {
    #[serde(default)]
    pub linear_word_match: bool,
    #[serde(default)]
    pub linear_word_count: bool,
}

impl FeatureConfig {
    pub fn with_linear_features() -> Self {
        Self {
            linear_word_match: true,
            linear_word_count: true,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct ModelConfig {
    #[serde(flatten)]
    pub model_type: ModelType,
}

impl ModelConfig {
    pub fn new(model_type: ModelType) -> Self {
        Self { model_type }
    }
}

/// Supported classifiers and their hyper-parameters.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum ModelType {
    /// Linear soft-margin SVM fit by stochastic sub-gradient descent.
    LinearSvm {
        /// L2 regularisation strength
        lambda: f64,
        /// Passes over the training set
        epochs: usize,
        /// Seed for the example sampling order
        seed: u64,
    },
    #[cfg(feature = "svm")]
    Svm {
        eps: f64,
        c: (f64, f64),
        kernel: String,
        gaussian_kernel_eps: f64,
        polynomial_kernel_constant: f64,
        polynomial_kernel_degree: f64,
    },
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::LinearSvm {
            lambda: 0.01,
            epochs: 200,
            seed: 42,
        }
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linear_svm" | "linear" => Ok(ModelType::default()),
            #[cfg(feature = "svm")]
            "svm" => Ok(ModelType::Svm {
                eps: 0.1,
                c: (1.0, 1.0),
                kernel: "linear".to_string(),
                gaussian_kernel_eps: 0.1,
                polynomial_kernel_constant: 1.0,
                polynomial_kernel_degree: 3.0,
            }),
            _ => Err(format!(
                "Unknown model type: {}. To use the kernel svm, please compile with `--features svm`",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ScorerConfig =
            serde_json::from_str(r#"{ "features": { "linear_word_count": true } }"#).unwrap();
        assert_eq!(config.steepness, DEFAULT_STEEPNESS);
        assert!(config.features.linear_word_count);
        assert!(!config.features.linear_word_match);
        assert_eq!(config.model, ModelConfig::default());
    }

    #[test]
    fn test_model_type_from_str() {
        assert_eq!("Linear_SVM".parse::<ModelType>(), Ok(ModelType::default()));
        assert!("xgboost".parse::<ModelType>().is_err());
    }

    #[test]
    fn test_model_config_json_shape() {
        let json = serde_json::to_value(ModelConfig::default()).unwrap();
        assert_eq!(json["model"], "linear_svm");
        assert_eq!(json["epochs"], 200);
    }
}
