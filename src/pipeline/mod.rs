//! Forecast composition pipeline.
//!
//! Orchestrates the stages strictly in sequence: detect the seasonal
//! and trend factors from history, obtain the base forecast, then
//! apply the seasonal and trend corrections in place. Either the whole
//! pipeline succeeds or the compose call fails; no partial forecast is
//! ever returned.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{ForecastRecord, Frequency, PeriodicSeries};
use crate::detection::{detect_seasonality, detect_trend};
use crate::error::{ForecastError, Result};
use crate::models::{BaseForecaster, MeanFallback};

/// Composes base forecasts with seasonal and trend adjustments.
#[derive(Debug, Clone, Default)]
pub struct ForecastComposer<F> {
    base: F,
}

impl ForecastComposer<MeanFallback> {
    /// Composer over the deterministic mean forecaster.
    pub fn new() -> Self {
        Self {
            base: MeanFallback::new(),
        }
    }
}

impl<F: BaseForecaster> ForecastComposer<F> {
    /// Composer over a caller-provided base forecaster.
    pub fn with_forecaster(base: F) -> Self {
        Self { base }
    }

    /// Forecast `periods` future periods from the historical series.
    ///
    /// Fails on empty history or a zero horizon; detection stages
    /// never fail (they degrade to neutral factors), so any error
    /// comes from validation or the base forecaster itself.
    pub fn compose(
        &self,
        series: &PeriodicSeries,
        periods: usize,
        frequency: Frequency,
    ) -> Result<Vec<ForecastRecord>> {
        if series.is_empty() {
            return Err(ForecastError::EmptyData);
        }
        if periods == 0 {
            return Err(ForecastError::InvalidParameter(
                "periods must be at least 1".to_string(),
            ));
        }

        let seasonal = detect_seasonality(series, frequency);
        let trend = detect_trend(series, frequency);
        debug!(
            base = self.base.name(),
            periods,
            %frequency,
            neutral_seasonality = seasonal.is_neutral(),
            "composing forecast"
        );

        let mut forecast = self.base.forecast(series, periods, frequency)?;

        for record in forecast.iter_mut() {
            record.predicted *= seasonal.factor_for(record.period_start);
        }
        for (index, record) in forecast.iter_mut().enumerate() {
            record.predicted *= trend.projection(index + 1);
        }

        Ok(forecast)
    }
}

/// Forecast with the deterministic mean fallback as the base. The
/// offline entry point.
pub fn forecast_expenses(
    series: &PeriodicSeries,
    periods: usize,
    frequency: Frequency,
) -> Result<Vec<ForecastRecord>> {
    ForecastComposer::new().compose(series, periods, frequency)
}

/// One chronological point in a merged history/forecast view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MergedPoint {
    pub period_start: NaiveDate,
    /// Historical total, if the period is in the past.
    pub actual: Option<f64>,
    /// Predicted total, if the period is in the forecast.
    pub predicted: Option<f64>,
}

/// Outer-join history and forecast by period start, ascending. Meant
/// for presentation layers that chart both on one axis.
pub fn merge_with_history(
    series: &PeriodicSeries,
    forecast: &[ForecastRecord],
) -> Vec<MergedPoint> {
    let mut merged: std::collections::BTreeMap<NaiveDate, MergedPoint> =
        std::collections::BTreeMap::new();

    for (period_start, value) in series.iter() {
        merged.insert(
            period_start,
            MergedPoint {
                period_start,
                actual: Some(value),
                predicted: None,
            },
        );
    }
    for record in forecast {
        merged
            .entry(record.period_start)
            .and_modify(|point| point.predicted = Some(record.predicted))
            .or_insert(MergedPoint {
                period_start: record.period_start,
                actual: None,
                predicted: Some(record.predicted),
            });
    }

    merged.into_values().collect()
}
