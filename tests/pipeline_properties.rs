//! End-to-end pipeline scenarios and property-based invariants.
//!
//! Covers the contract of the full compose pipeline: length and date
//! invariants, determinism, degraded modes (short history, disabled
//! remote predictor), and the centering of detected seasonal factors.

use approx::assert_relative_eq;
use chrono::NaiveDate;
use proptest::prelude::*;

use expense_forecast::core::{Frequency, PeriodicSeries};
use expense_forecast::detection::{detect_seasonality, detect_trend, SeasonalFactors};
use expense_forecast::models::{AgentConfig, BaseForecaster, PredictionClient, ResilientForecaster};
use expense_forecast::pipeline::forecast_expenses;
use expense_forecast::{ForecastError, Result};

fn d(y: i32, m: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, 1).unwrap()
}

/// Monthly series starting January 2020.
fn monthly_series(values: &[f64]) -> PeriodicSeries {
    let periods: Vec<NaiveDate> = (0..values.len())
        .map(|i| d(2020 + i as i32 / 12, (i % 12) as u32 + 1))
        .collect();
    PeriodicSeries::new(periods, values.to_vec()).unwrap()
}

/// Strategy for positive monthly histories of at least two full
/// seasonal cycles, with a sinusoidal yearly pattern.
fn seasonal_values_strategy() -> impl Strategy<Value = Vec<f64>> {
    (24usize..72, 50.0..500.0f64, 0.05..0.4f64).prop_map(|(len, base, amplitude)| {
        (0..len)
            .map(|i| {
                base * (1.0 + amplitude * (2.0 * std::f64::consts::PI * i as f64 / 12.0).sin())
            })
            .collect()
    })
}

// =============================================================================
// Concrete scenarios
// =============================================================================

#[test]
fn constant_history_yields_constant_forecast() {
    let series = monthly_series(&[100.0; 24]);

    let seasonal = detect_seasonality(&series, Frequency::Monthly);
    for month in 1..=12 {
        assert_relative_eq!(seasonal.get(month).unwrap(), 1.0, epsilon = 1e-6);
    }

    let trend = detect_trend(&series, Frequency::Monthly);
    for &factor in trend.values() {
        assert_relative_eq!(factor, 1.0, epsilon = 1e-6);
    }

    let forecast = forecast_expenses(&series, 3, Frequency::Monthly).unwrap();
    assert_eq!(forecast.len(), 3);
    for record in &forecast {
        assert_relative_eq!(record.predicted, 100.0, epsilon = 1e-6);
    }
}

struct UnreachableService;

impl PredictionClient for UnreachableService {
    fn complete(&self, _prompt: &str) -> Result<String> {
        Err(ForecastError::PredictionUnavailable(
            "no route to host".to_string(),
        ))
    }
}

#[test]
fn disabled_remote_path_falls_back_to_historical_mean() {
    let values: Vec<f64> = (0..24).map(|i| 80.0 + (i % 5) as f64 * 10.0).collect();
    let series = monthly_series(&values);
    let expected_mean = values.iter().sum::<f64>() / values.len() as f64;

    // No API key: the remote path is never attempted.
    let forecaster =
        ResilientForecaster::new(AgentConfig::new(None, AgentConfig::DEFAULT_MODEL), UnreachableService);
    let forecast = forecaster
        .forecast(&series, 4, Frequency::Monthly)
        .unwrap();

    assert_eq!(forecast.len(), 4);
    for record in &forecast {
        assert_relative_eq!(record.predicted, expected_mean, epsilon = 1e-9);
    }
    // Dates increment monthly from the last historical period
    // (2021-12).
    assert_eq!(forecast[0].period_start, d(2022, 1));
    assert_eq!(forecast[1].period_start, d(2022, 2));
    assert_eq!(forecast[3].period_start, d(2022, 4));
}

#[test]
fn unreachable_service_falls_back_to_historical_mean() {
    let series = monthly_series(&[100.0; 24]);
    let forecaster = ResilientForecaster::new(
        AgentConfig::new(Some("key".to_string()), AgentConfig::DEFAULT_MODEL),
        UnreachableService,
    );

    let forecast = forecaster
        .forecast(&series, 2, Frequency::Monthly)
        .unwrap();
    assert_relative_eq!(forecast[0].predicted, 100.0, epsilon = 1e-9);
    assert_relative_eq!(forecast[1].predicted, 100.0, epsilon = 1e-9);
}

#[test]
fn unmatched_month_gets_factor_exactly_one() {
    let mut factors = std::collections::BTreeMap::new();
    factors.insert(1u32, 1.3);
    factors.insert(6u32, 0.7);
    let factors = SeasonalFactors::from_factors(Frequency::Monthly, factors);

    // September appears nowhere in the mapping's index.
    assert_eq!(factors.factor_for(d(2026, 9)), 1.0);
}

#[test]
fn neutral_seasonal_adjustment_is_the_identity() {
    let neutral = SeasonalFactors::neutral(Frequency::Monthly);
    let forecast = [(d(2025, 1), 123.4), (d(2025, 7), 88.8), (d(2025, 12), 9.0)];

    for (date, value) in forecast {
        assert_eq!(value * neutral.factor_for(date), value);
    }
}

#[test]
fn short_history_detectors_return_all_ones() {
    // 23 months: below the two-cycle seasonality threshold.
    let series = monthly_series(&(0..23).map(|i| 100.0 + i as f64).collect::<Vec<_>>());
    let seasonal = detect_seasonality(&series, Frequency::Monthly);
    assert!(seasonal.is_neutral());

    // 2 periods: below the trend threshold.
    let short = monthly_series(&[100.0, 150.0]);
    let trend = detect_trend(&short, Frequency::Monthly);
    assert_eq!(trend.values(), &[1.0, 1.0]);
}

#[test]
fn compose_length_invariant_across_horizons() {
    let series = monthly_series(&[100.0; 24]);
    for periods in [1usize, 3, 12, 24] {
        let forecast = forecast_expenses(&series, periods, Frequency::Monthly).unwrap();
        assert_eq!(forecast.len(), periods);
        // Dates are strictly increasing and contiguous.
        for pair in forecast.windows(2) {
            assert_eq!(
                Frequency::Monthly.next_period(pair[0].period_start),
                pair[1].period_start
            );
        }
    }
}

#[test]
fn compose_twice_produces_identical_output() {
    let values: Vec<f64> = (0..36)
        .map(|i| 200.0 + 40.0 * (2.0 * std::f64::consts::PI * i as f64 / 12.0).cos() + i as f64)
        .collect();
    let series = monthly_series(&values);

    let first = forecast_expenses(&series, 12, Frequency::Monthly).unwrap();
    let second = forecast_expenses(&series, 12, Frequency::Monthly).unwrap();
    assert_eq!(first, second);
}

#[test]
fn quarterly_pipeline_end_to_end() {
    let mut periods = Vec::new();
    let mut values = Vec::new();
    for i in 0..12 {
        periods.push(d(2021 + i / 4, (i % 4) as u32 * 3 + 1));
        values.push(if i % 4 == 3 { 400.0 } else { 200.0 });
    }
    let series = PeriodicSeries::new(periods, values).unwrap();

    let forecast = forecast_expenses(&series, 4, Frequency::Quarterly).unwrap();
    assert_eq!(forecast.len(), 4);
    assert_eq!(forecast[0].period_start, d(2024, 1));
    assert_eq!(forecast[3].period_start, d(2024, 10));

    // The Q4 spike in history should surface in the Q4 forecast.
    assert!(forecast[3].predicted > forecast[1].predicted);
}

// =============================================================================
// Property-based invariants
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn seasonal_factor_mean_is_one_for_long_histories(values in seasonal_values_strategy()) {
        let series = monthly_series(&values);
        let factors = detect_seasonality(&series, Frequency::Monthly);
        prop_assert!((factors.mean() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn forecast_length_matches_horizon(
        values in prop::collection::vec(1.0..1000.0f64, 1..60),
        periods in 1usize..25
    ) {
        let series = monthly_series(&values);
        let forecast = forecast_expenses(&series, periods, Frequency::Monthly).unwrap();
        prop_assert_eq!(forecast.len(), periods);
    }

    #[test]
    fn forecast_dates_continue_from_history(
        values in prop::collection::vec(1.0..1000.0f64, 1..60),
        periods in 1usize..13
    ) {
        let series = monthly_series(&values);
        let last = series.last_period().unwrap();
        let forecast = forecast_expenses(&series, periods, Frequency::Monthly).unwrap();
        prop_assert_eq!(forecast[0].period_start, Frequency::Monthly.next_period(last));
    }

    #[test]
    fn trend_factors_end_at_one(values in seasonal_values_strategy()) {
        let series = monthly_series(&values);
        let trend = detect_trend(&series, Frequency::Monthly);
        prop_assert!((trend.last() - 1.0).abs() < 1e-9);
    }
}
