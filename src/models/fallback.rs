//! Deterministic mean-based fallback forecaster.

use crate::core::{continuation_dates, ForecastRecord, Frequency, PeriodicSeries};
use crate::error::{ForecastError, Result};
use crate::models::BaseForecaster;
use crate::utils::mean;

/// Forecasts the historical mean for every future period.
///
/// The deterministic degraded mode used whenever the remote predictor
/// is unavailable; also a usable standalone baseline.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanFallback;

impl MeanFallback {
    pub fn new() -> Self {
        Self
    }
}

impl BaseForecaster for MeanFallback {
    fn forecast(
        &self,
        series: &PeriodicSeries,
        periods: usize,
        frequency: Frequency,
    ) -> Result<Vec<ForecastRecord>> {
        let last = series.last_period().ok_or(ForecastError::EmptyData)?;
        let level = mean(series.values());

        let records = continuation_dates(last, periods, frequency)
            .into_iter()
            .map(|period_start| ForecastRecord::new(period_start, level))
            .collect();
        Ok(records)
    }

    fn name(&self) -> &str {
        "MeanFallback"
    }
}
