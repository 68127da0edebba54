//! Classical multiplicative decomposition.
//!
//! Moving-average decomposition in the style of the textbook
//! procedure: a centered moving average estimates the trend, the
//! detrended ratios are averaged per cycle position to form the
//! seasonal component, and the remainder is what is left. The trend is
//! linearly extrapolated at both boundaries so edge periods still
//! receive estimates instead of missing values.

use crate::decomposition::Decomposition;
use crate::error::{ForecastError, Result};
use crate::utils::mean;

/// Decompose `values` multiplicatively with the given cycle length.
///
/// Requires at least two full cycles of data and strictly positive
/// values (ratios are meaningless otherwise).
pub fn decompose_multiplicative(values: &[f64], period: usize) -> Result<Decomposition> {
    if values.is_empty() {
        return Err(ForecastError::EmptyData);
    }
    if period < 2 {
        return Err(ForecastError::InvalidParameter(
            "cycle length must be at least 2".to_string(),
        ));
    }
    let n = values.len();
    if n < 2 * period {
        return Err(ForecastError::InsufficientData {
            needed: 2 * period,
            got: n,
        });
    }
    if values.iter().any(|v| !v.is_finite() || *v <= 0.0) {
        return Err(ForecastError::ComputationError(
            "multiplicative decomposition requires strictly positive values".to_string(),
        ));
    }

    let trend = extrapolated_trend(values, period)?;

    let detrended: Vec<f64> = values.iter().zip(trend.iter()).map(|(y, t)| y / t).collect();

    // Average the detrended ratios per cycle position, then center the
    // averages at 1.0.
    let mut sums = vec![0.0; period];
    let mut counts = vec![0usize; period];
    for (i, &d) in detrended.iter().enumerate() {
        sums[i % period] += d;
        counts[i % period] += 1;
    }
    let mut indices: Vec<f64> = sums
        .iter()
        .zip(counts.iter())
        .map(|(s, c)| s / *c as f64)
        .collect();
    let index_mean = mean(&indices);
    if index_mean.abs() < 1e-12 {
        return Err(ForecastError::ComputationError(
            "degenerate seasonal indices".to_string(),
        ));
    }
    for idx in indices.iter_mut() {
        *idx /= index_mean;
    }

    let seasonal: Vec<f64> = (0..n).map(|i| indices[i % period]).collect();
    let remainder: Vec<f64> = (0..n)
        .map(|i| values[i] / (trend[i] * seasonal[i]))
        .collect();

    Ok(Decomposition {
        trend,
        seasonal,
        remainder,
    })
}

/// Centered moving-average trend with linear extrapolation at both
/// ends. The interior uses a 2x`period` average for even periods so
/// the window stays centered on a calendar cycle.
fn extrapolated_trend(values: &[f64], period: usize) -> Result<Vec<f64>> {
    let n = values.len();
    let half = period / 2;

    let mut trend: Vec<Option<f64>> = vec![None; n];
    if period % 2 == 0 {
        // Endpoints of the window carry half weight.
        for i in half..n - half {
            let mut sum = 0.5 * values[i - half] + 0.5 * values[i + half];
            for j in (i - half + 1)..(i + half) {
                sum += values[j];
            }
            trend[i] = Some(sum / period as f64);
        }
    } else {
        for i in half..n - half {
            let window = &values[i - half..=i + half];
            trend[i] = Some(mean(window));
        }
    }

    let first = half;
    let last = n - half - 1;

    // Fit a line through the first `period` estimated points and
    // extend it backwards; same forwards from the last `period`.
    let lead_end = (first + period).min(last + 1);
    let (a, b) = fit_line(first, lead_end, &trend);
    for (i, t) in trend.iter_mut().enumerate().take(first) {
        *t = Some(a + b * i as f64);
    }

    let tail_start = (last + 1).saturating_sub(period).max(first);
    let (a, b) = fit_line(tail_start, last + 1, &trend);
    for (i, t) in trend.iter_mut().enumerate().skip(last + 1) {
        *t = Some(a + b * i as f64);
    }

    let trend: Vec<f64> = trend.into_iter().map(|t| t.unwrap_or(f64::NAN)).collect();
    if trend.iter().any(|t| !t.is_finite() || *t <= 0.0) {
        return Err(ForecastError::ComputationError(
            "trend estimate is not strictly positive".to_string(),
        ));
    }
    Ok(trend)
}

/// Least-squares line through the estimated trend points in
/// `[start, end)`, returned as (intercept, slope) over the global
/// index axis.
fn fit_line(start: usize, end: usize, trend: &[Option<f64>]) -> (f64, f64) {
    let points: Vec<(f64, f64)> = (start..end)
        .filter_map(|i| trend[i].map(|t| (i as f64, t)))
        .collect();
    let n = points.len() as f64;
    if points.len() < 2 {
        let level = points.first().map(|p| p.1).unwrap_or(0.0);
        return (level, 0.0);
    }

    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;
    let mut num = 0.0;
    let mut den = 0.0;
    for (x, y) in &points {
        num += (x - mean_x) * (y - mean_y);
        den += (x - mean_x).powi(2);
    }
    let slope = if den.abs() < 1e-12 { 0.0 } else { num / den };
    (mean_y - slope * mean_x, slope)
}
