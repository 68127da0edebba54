//! STL (Seasonal-Trend decomposition using LOESS).
//!
//! Additive decomposition following Cleveland et al. (1990): an inner
//! loop alternates cycle-subseries smoothing and trend smoothing, and
//! an optional outer loop downweights outliers with bisquare weights.
//! The trend detector runs this in robust mode so one-off expense
//! spikes do not masquerade as drift.

use crate::decomposition::Decomposition;
use crate::error::{ForecastError, Result};
use crate::utils::median;

/// STL decomposer configuration.
#[derive(Debug, Clone)]
pub struct Stl {
    /// Seasonal cycle length.
    period: usize,
    /// Seasonal LOESS span (odd).
    seasonal_window: usize,
    /// Trend LOESS span (odd).
    trend_window: usize,
    /// Low-pass LOESS span (odd).
    lowpass_window: usize,
    /// Inner loop passes.
    inner_passes: usize,
    /// Outer (robustness) passes; 0 disables robust fitting.
    outer_passes: usize,
}

impl Stl {
    /// Create a decomposer with default spans for the given cycle
    /// length, per Cleveland et al.
    pub fn new(period: usize) -> Self {
        let ns = period.max(3);
        let nt = (1.5 * period as f64 / (1.0 - 1.5 / ns as f64)).ceil() as usize;
        Self {
            period,
            seasonal_window: odd(ns),
            trend_window: odd(nt),
            lowpass_window: odd(period),
            inner_passes: 2,
            outer_passes: 0,
        }
    }

    /// Override the seasonal span (rounded up to odd).
    pub fn with_seasonal_window(mut self, window: usize) -> Self {
        self.seasonal_window = odd(window.max(3));
        self
    }

    /// Enable robust fitting (six bisquare reweighting passes).
    pub fn robust(mut self) -> Self {
        self.outer_passes = 6;
        self
    }

    /// Decompose the series into trend, seasonal, and remainder.
    ///
    /// Needs two full cycles of data.
    pub fn decompose(&self, values: &[f64]) -> Result<Decomposition> {
        let n = values.len();
        if n == 0 {
            return Err(ForecastError::EmptyData);
        }
        if n < 2 * self.period {
            return Err(ForecastError::InsufficientData {
                needed: 2 * self.period,
                got: n,
            });
        }

        let mut seasonal = vec![0.0; n];
        let mut trend = vec![0.0; n];
        let mut weights = vec![1.0; n];

        let outer = self.outer_passes.max(1);
        for _ in 0..outer {
            for _ in 0..self.inner_passes {
                let detrended: Vec<f64> =
                    values.iter().zip(trend.iter()).map(|(y, t)| y - t).collect();

                let cycle_smoothed = self.smooth_cycle_subseries(&detrended, &weights);
                let low_pass = self.low_pass(&cycle_smoothed);
                for i in 0..n {
                    seasonal[i] = cycle_smoothed[i] - low_pass[i];
                }

                let deseasonalized: Vec<f64> = values
                    .iter()
                    .zip(seasonal.iter())
                    .map(|(y, s)| y - s)
                    .collect();
                trend = loess(&deseasonalized, self.trend_window, &weights);
            }

            if self.outer_passes > 0 {
                let remainder: Vec<f64> = (0..n)
                    .map(|i| values[i] - seasonal[i] - trend[i])
                    .collect();
                weights = bisquare_weights(&remainder);
            }
        }

        let remainder: Vec<f64> = (0..n)
            .map(|i| values[i] - seasonal[i] - trend[i])
            .collect();

        Ok(Decomposition {
            trend,
            seasonal,
            remainder,
        })
    }

    /// Smooth each cycle subseries (all values at the same position in
    /// the cycle) independently, then reassemble.
    fn smooth_cycle_subseries(&self, detrended: &[f64], weights: &[f64]) -> Vec<f64> {
        let n = detrended.len();
        let mut result = vec![0.0; n];

        for offset in 0..self.period {
            let indices: Vec<usize> = (offset..n).step_by(self.period).collect();
            let sub_values: Vec<f64> = indices.iter().map(|&i| detrended[i]).collect();
            let sub_weights: Vec<f64> = indices.iter().map(|&i| weights[i]).collect();

            let smoothed = loess(&sub_values, self.seasonal_window, &sub_weights);
            for (&i, &s) in indices.iter().zip(smoothed.iter()) {
                result[i] = s;
            }
        }

        result
    }

    /// Low-pass filter: three moving means followed by a LOESS pass.
    fn low_pass(&self, series: &[f64]) -> Vec<f64> {
        let ma = moving_mean(series, self.period);
        let ma = moving_mean(&ma, self.period);
        let ma = moving_mean(&ma, 3);
        let weights = vec![1.0; series.len()];
        loess(&ma, self.lowpass_window, &weights)
    }
}

fn odd(n: usize) -> usize {
    if n % 2 == 0 {
        n + 1
    } else {
        n
    }
}

/// Tricube-weighted local mean. A simplification of full local
/// regression that keeps the STL structure intact; the external
/// robustness weights participate in every window.
fn loess(values: &[f64], span: usize, weights: &[f64]) -> Vec<f64> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }

    let half = span / 2;
    let mut result = vec![0.0; n];

    for i in 0..n {
        let start = i.saturating_sub(half);
        let end = (i + half + 1).min(n);
        let max_dist = half as f64 + 1.0;

        let mut weight_sum = 0.0;
        let mut value_sum = 0.0;
        for j in start..end {
            let u = (i as f64 - j as f64).abs() / max_dist;
            let tricube = if u < 1.0 { (1.0 - u.powi(3)).powi(3) } else { 0.0 };
            let w = tricube * weights[j];
            weight_sum += w;
            value_sum += w * values[j];
        }

        result[i] = if weight_sum > 0.0 {
            value_sum / weight_sum
        } else {
            values[i]
        };
    }

    result
}

/// Centered moving mean with shrinking windows at the boundaries.
fn moving_mean(series: &[f64], window: usize) -> Vec<f64> {
    let n = series.len();
    let half = window / 2;
    let mut result = vec![0.0; n];

    for i in 0..n {
        let start = i.saturating_sub(half);
        let end = (i + half + 1).min(n);
        let sum: f64 = series[start..end].iter().sum();
        result[i] = sum / (end - start) as f64;
    }

    result
}

/// Bisquare robustness weights from the remainder, scaled by six times
/// the median absolute remainder.
fn bisquare_weights(remainder: &[f64]) -> Vec<f64> {
    let abs_remainder: Vec<f64> = remainder.iter().map(|r| r.abs()).collect();
    let h = 6.0 * median(&abs_remainder);

    remainder
        .iter()
        .map(|r| {
            if h < 1e-10 {
                return 1.0;
            }
            let u = r.abs() / h;
            if u < 1.0 {
                (1.0 - u * u).powi(2)
            } else {
                0.0
            }
        })
        .collect()
}
