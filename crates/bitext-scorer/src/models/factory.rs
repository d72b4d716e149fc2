use crate::config::{ModelConfig, ModelType};
use crate::error::Result;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::linear_svm::{LinearSvm, LinearSvmState};

/// Build an unfitted boxed classifier from a `ModelConfig`.
pub fn build_model(params: &ModelConfig) -> Result<Box<dyn ClassifierModel>> {
    match params.model_type {
        ModelType::LinearSvm { .. } => Ok(Box::new(LinearSvm::new(params)?)),

        #[cfg(feature = "svm")]
        ModelType::Svm { .. } => Ok(Box::new(crate::models::svm::SvmClassifier::new(
            params.clone(),
        ))),
        // When compiled, `ModelType` only contains the variants enabled by
        // features, so the arms above are exhaustive.
    }
}

/// Rebuild a fitted classifier from the state written by `ClassifierModel::save_state`.
pub fn restore_model(
    params: &ModelConfig,
    state: serde_json::Value,
) -> Result<Box<dyn ClassifierModel>> {
    match params.model_type {
        ModelType::LinearSvm { .. } => {
            let state: LinearSvmState = serde_json::from_value(state)?;
            Ok(Box::new(LinearSvm::from_state(params, state)?))
        }

        #[cfg(feature = "svm")]
        ModelType::Svm { .. } => {
            let state: crate::models::svm::SvmState = serde_json::from_value(state)?;
            Ok(Box::new(crate::models::svm::SvmClassifier::from_state(
                params.clone(),
                state,
            )))
        }
    }
}
