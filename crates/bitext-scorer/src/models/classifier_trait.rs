use ndarray::{Array2, ArrayView1};

use crate::error::Result;

/// Binary classifier contract consumed by the sentence pair scorer.
///
/// Labels are booleans (`true` for aligned pairs). The scorer only needs raw
/// margins, hard labels and an opaque persisted state; how a model is
/// optimised is its own business.
pub trait ClassifierModel {
    /// Fit the model on feature rows `x` with one label per row.
    fn fit(&mut self, x: &Array2<f64>, y: &[bool]) -> Result<()>;

    /// Raw, unbounded margin for one feature row.
    fn decision_function(&self, x: ArrayView1<f64>) -> Result<f64>;

    /// Hard label for one feature row.
    fn classify(&self, x: ArrayView1<f64>) -> Result<bool> {
        Ok(self.decision_function(x)? >= 0.0)
    }

    /// Serialisable snapshot of the fitted parameters.
    fn save_state(&self) -> Result<serde_json::Value>;

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}
