//! Estimators shared by the forecasters
//!
//! Each function is pure and independent so the ensembles built on top of
//! them can be checked one piece at a time.

use serde::{Deserialize, Serialize};

/// A fitted line `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Ordinary least-squares fit over parallel `x`/`y` slices.
///
/// Callers must pass at least two points with distinct `x` values; the
/// denominator is zero otherwise.
pub fn fit_line(x: &[f64], y: &[f64]) -> LinearFit {
    debug_assert_eq!(x.len(), y.len());
    debug_assert!(x.len() >= 2);

    let n = x.len() as f64;
    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xy: f64 = x.iter().zip(y).map(|(xi, yi)| xi * yi).sum();
    let sum_x2: f64 = x.iter().map(|xi| xi * xi).sum();

    let slope = (n * sum_xy - sum_x * sum_y) / (n * sum_x2 - sum_x * sum_x);
    let intercept = (sum_y - slope * sum_x) / n;

    LinearFit { slope, intercept }
}

/// Round to the nearest integer, with halves going toward positive infinity
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Rounded mean of the last `min(window, len)` values (0 for an empty slice)
pub fn moving_average(values: &[f64], window: usize) -> f64 {
    let n = window.min(values.len());
    if n == 0 {
        return 0.0;
    }
    let tail = &values[values.len() - n..];
    round_half_up(tail.iter().sum::<f64>() / n as f64)
}

/// Rounded median (0 for an empty slice). Even-length input averages the two
/// central values before rounding.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        round_half_up((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        round_half_up(sorted[mid])
    }
}
