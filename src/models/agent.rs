//! Language-model prediction boundary.
//!
//! The remote predictor is a black box that completes a text prompt;
//! transport, retries, and timeouts belong to the
//! [`PredictionClient`] implementation, not to this crate. This module
//! owns the prompt/response codec and the resilience policy: any
//! failure to obtain a well-formed forecast falls back to the
//! deterministic [`MeanFallback`], logged as a notice rather than
//! surfaced as an error.

use chrono::NaiveDate;
use tracing::warn;

use crate::core::{continuation_dates, ForecastRecord, Frequency, PeriodicSeries};
use crate::error::Result;
use crate::ingest::parse_date;
use crate::models::{BaseForecaster, MeanFallback};

/// Configuration for the remote predictor, passed in at construction.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// API key; `None` disables the remote path entirely.
    pub api_key: Option<String>,
    /// Model identifier forwarded to the prediction service.
    pub model: String,
}

impl AgentConfig {
    pub const DEFAULT_MODEL: &'static str = "gemini-2.5-flash";

    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            api_key,
            model: model.into(),
        }
    }

    /// Read `GEMINI_API_KEY` and `GEMINI_MODEL` from the environment,
    /// once, at construction time. An empty key counts as absent.
    pub fn from_env() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty());
        let model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| Self::DEFAULT_MODEL.to_string());
        Self { api_key, model }
    }

    /// Whether the remote path is enabled.
    pub fn remote_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

/// The black-box remote completion call.
///
/// Implementations wrap whatever transport reaches the prediction
/// service and return its raw text output. Errors should use
/// [`ForecastError::PredictionUnavailable`](crate::ForecastError::PredictionUnavailable).
pub trait PredictionClient {
    fn complete(&self, prompt: &str) -> Result<String>;
}

/// Render the history and instructions into the prediction prompt.
pub fn format_prompt(series: &PeriodicSeries, periods: usize, frequency: Frequency) -> String {
    let mut data = String::new();
    for (date, value) in series.iter() {
        data.push_str(&format!("{}: {}\n", date.format("%Y-%m-%d"), value));
    }

    format!(
        "Given the historical expense data below aggregated {frequency}, \
         predict the expense values for the next {periods} periods. \
         Output only the dates and predicted expenses in the format \
         YYYY-MM-DD: amount.\n\nHistorical data:\n{data}\nPredictions:"
    )
}

/// Parse `date: value` lines from the service response. Malformed
/// lines are skipped silently; callers validate the overall shape.
pub fn parse_predictions(text: &str) -> Vec<ForecastRecord> {
    let mut records = Vec::new();
    for line in text.lines() {
        let Some((date_part, value_part)) = line.split_once(':') else {
            continue;
        };
        let Some(date) = parse_date(date_part.trim()) else {
            continue;
        };
        let Ok(value) = value_part.trim().parse::<f64>() else {
            continue;
        };
        records.push(ForecastRecord::new(date, value));
    }
    records
}

/// Base forecaster backed by a remote prediction client, with the
/// mean fallback guaranteeing the contract on any failure.
#[derive(Debug, Clone)]
pub struct ResilientForecaster<C> {
    config: AgentConfig,
    client: C,
    fallback: MeanFallback,
}

impl<C: PredictionClient> ResilientForecaster<C> {
    pub fn new(config: AgentConfig, client: C) -> Self {
        Self {
            config,
            client,
            fallback: MeanFallback::new(),
        }
    }

    /// Check that the parsed records cover exactly the expected future
    /// periods, in order.
    fn matches_horizon(
        records: &[ForecastRecord],
        last: NaiveDate,
        periods: usize,
        frequency: Frequency,
    ) -> bool {
        if records.len() != periods {
            return false;
        }
        let expected = continuation_dates(last, periods, frequency);
        records
            .iter()
            .zip(expected.iter())
            .all(|(record, date)| frequency.period_start(record.period_start) == *date)
    }
}

impl<C: PredictionClient> BaseForecaster for ResilientForecaster<C> {
    fn forecast(
        &self,
        series: &PeriodicSeries,
        periods: usize,
        frequency: Frequency,
    ) -> Result<Vec<ForecastRecord>> {
        if !self.config.remote_enabled() {
            warn!("no API key configured, using mean fallback forecast");
            return self.fallback.forecast(series, periods, frequency);
        }
        let Some(last) = series.last_period() else {
            return self.fallback.forecast(series, periods, frequency);
        };

        let prompt = format_prompt(series, periods, frequency);
        let text = match self.client.complete(&prompt) {
            Ok(text) => text,
            Err(err) => {
                warn!(%err, model = %self.config.model, "prediction service failed, using mean fallback");
                return self.fallback.forecast(series, periods, frequency);
            }
        };

        let mut records = parse_predictions(&text);
        if !Self::matches_horizon(&records, last, periods, frequency) {
            warn!(
                parsed = records.len(),
                expected = periods,
                "prediction response malformed, using mean fallback"
            );
            return self.fallback.forecast(series, periods, frequency);
        }

        // Normalize any mid-period dates to period starts.
        for record in records.iter_mut() {
            record.period_start = frequency.period_start(record.period_start);
        }
        Ok(records)
    }

    fn name(&self) -> &str {
        "ResilientForecaster"
    }
}
