//! Per-column standardisation of feature matrices.
//!
//! Feature columns live on very different scales (`position_difference` is an
//! unbounded count, the ratios sit in `[0, 1]`), so models fit on
//! standardised rows. The scaler is serialisable and travels with the model.
use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

/// Simple standard scaler (per-column mean/std).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scaler {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

impl Scaler {
    /// Columns with a smaller spread are centred but not rescaled.
    const MIN_STD: f64 = 1e-9;

    pub fn ncols(&self) -> usize {
        self.mean.len()
    }

    pub fn transform_row(&self, row: ArrayView1<f64>) -> Array1<f64> {
        Array1::from_iter(
            row.iter()
                .zip(self.mean.iter().zip(self.std.iter()))
                .map(|(v, (m, s))| (v - m) / s),
        )
    }

    pub fn transform(&self, x: &Array2<f64>) -> Array2<f64> {
        let mut out = x.to_owned();
        for mut row in out.axis_iter_mut(Axis(0)) {
            for (c, v) in row.iter_mut().enumerate() {
                *v = (*v - self.mean[c]) / self.std[c];
            }
        }
        out
    }
}

/// Fit a `Scaler` from a matrix where rows are samples and columns are features.
///
/// An empty matrix yields a scaler with zero means and unit spreads.
pub fn fit_scaler(x: &Array2<f64>) -> Scaler {
    let ncols = x.ncols();
    if x.nrows() == 0 {
        return Scaler {
            mean: vec![0.0; ncols],
            std: vec![1.0; ncols],
        };
    }

    let mean = x
        .mean_axis(Axis(0))
        .map(|m| m.to_vec())
        .unwrap_or_else(|| vec![0.0; ncols]);
    let std = x
        .std_axis(Axis(0), 0.0)
        .iter()
        .map(|&s| if s < Scaler::MIN_STD { 1.0 } else { s })
        .collect();

    Scaler { mean, std }
}
