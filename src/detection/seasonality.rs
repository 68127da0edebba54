//! Seasonality detection.
//!
//! Decomposes the historical series multiplicatively and condenses the
//! seasonal component into one multiplier per calendar key (month or
//! quarter, per the active frequency). Short or degenerate histories
//! degrade to neutral factors; detection never blocks forecasting.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::core::{Frequency, PeriodicSeries};
use crate::decomposition::decompose_multiplicative;
use crate::utils::mean;

/// Seasonal multipliers keyed by calendar period, centered at 1.0.
///
/// Immutable once built. Lookup is tagged by the frequency the factors
/// were detected under: a monthly map answers by month, a quarterly
/// map by quarter, and an unmatched key falls back to 1.0 rather than
/// failing the adjustment.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalFactors {
    frequency: Frequency,
    factors: BTreeMap<u32, f64>,
}

impl SeasonalFactors {
    /// Neutral factors: every key of the cycle maps to 1.0.
    pub fn neutral(frequency: Frequency) -> Self {
        let factors = (1..=frequency.cycle_length() as u32)
            .map(|key| (key, 1.0))
            .collect();
        Self { frequency, factors }
    }

    /// Build factors from precomputed per-key multipliers.
    pub fn from_factors(frequency: Frequency, factors: BTreeMap<u32, f64>) -> Self {
        Self { frequency, factors }
    }

    /// Frequency the factors were detected under.
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Multiplier for the period containing `date`: exact calendar-key
    /// match, else 1.0.
    pub fn factor_for(&self, date: NaiveDate) -> f64 {
        let key = self.frequency.period_key(date);
        self.factors.get(&key).copied().unwrap_or(1.0)
    }

    /// Multiplier for a raw calendar key, if present.
    pub fn get(&self, key: u32) -> Option<f64> {
        self.factors.get(&key).copied()
    }

    /// Mean of the stored multipliers.
    pub fn mean(&self) -> f64 {
        let values: Vec<f64> = self.factors.values().copied().collect();
        mean(&values)
    }

    /// Whether every stored multiplier is exactly 1.0.
    pub fn is_neutral(&self) -> bool {
        self.factors.values().all(|&f| f == 1.0)
    }
}

/// Detect seasonal factors from a historical series.
///
/// With fewer than two full cycles of history seasonality is
/// unreliable and the result is neutral. Otherwise the series is
/// decomposed multiplicatively at the frequency's cycle length (with
/// trend extrapolation at the boundaries), the seasonal component is
/// averaged per calendar key, and the map is renormalized so its mean
/// is exactly 1.0.
pub fn detect_seasonality(series: &PeriodicSeries, frequency: Frequency) -> SeasonalFactors {
    let min = frequency.min_seasonal_history();
    if series.len() < min {
        debug!(
            len = series.len(),
            min, "history too short for seasonality detection, using neutral factors"
        );
        return SeasonalFactors::neutral(frequency);
    }

    let decomposition = match decompose_multiplicative(series.values(), frequency.cycle_length()) {
        Ok(d) => d,
        Err(err) => {
            debug!(%err, "seasonal decomposition degraded to neutral factors");
            return SeasonalFactors::neutral(frequency);
        }
    };

    let normalizer = mean(&decomposition.seasonal);
    if !normalizer.is_finite() || normalizer.abs() < 1e-12 {
        debug!("seasonal component has degenerate mean, using neutral factors");
        return SeasonalFactors::neutral(frequency);
    }

    // Average the normalized component per calendar key.
    let mut sums: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
    for (date, seasonal) in series.periods().iter().zip(decomposition.seasonal.iter()) {
        let entry = sums.entry(frequency.period_key(*date)).or_insert((0.0, 0));
        entry.0 += seasonal / normalizer;
        entry.1 += 1;
    }
    let mut factors: BTreeMap<u32, f64> = sums
        .into_iter()
        .map(|(key, (sum, count))| (key, sum / count as f64))
        .collect();

    // Re-center so the mapping's mean is 1.0 even when the history is
    // not an exact multiple of the cycle.
    let values: Vec<f64> = factors.values().copied().collect();
    let map_mean = mean(&values);
    if map_mean.is_finite() && map_mean.abs() > 1e-12 {
        for factor in factors.values_mut() {
            *factor /= map_mean;
        }
    }

    SeasonalFactors::from_factors(frequency, factors)
}
