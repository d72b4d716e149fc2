//! Small numeric helpers shared by the feature extractor and the scorer.

/// Symmetric similarity of two non-negative counts: `min / max`.
///
/// The result is always in `[0, 1]`. Two zero counts are defined as `0.0`
/// rather than dividing by zero.
pub fn ratio(a: usize, b: usize) -> f64 {
    let max = a.max(b);
    if max == 0 {
        return 0.0;
    }
    a.min(b) as f64 / max as f64
}

/// Logistic squashing `1 / (1 + e^-x)`, mapping the real line onto `(0, 1)`.
///
/// Evaluated piecewise so large magnitudes saturate to `0.0` / `1.0`
/// instead of overflowing. `NaN` maps to `0.5` so callers always receive a
/// value inside the unit interval.
pub fn logistic(x: f64) -> f64 {
    if x.is_nan() {
        return 0.5;
    }
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let ez = x.exp();
        ez / (1.0 + ez)
    }
}
