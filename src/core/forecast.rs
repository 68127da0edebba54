//! Forecast record structure and date-continuation helpers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::Frequency;

/// One forecast period: a period start and its predicted total.
///
/// Records are produced by a base forecaster and adjusted in place by
/// the seasonal and trend stages; the date never changes after
/// creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    /// First day of the forecast period.
    pub period_start: NaiveDate,
    /// Predicted expense total for the period.
    pub predicted: f64,
}

impl ForecastRecord {
    pub fn new(period_start: NaiveDate, predicted: f64) -> Self {
        Self {
            period_start,
            predicted,
        }
    }
}

/// The `periods` period starts that follow `last` at the frequency's
/// stride. Shared by the fallback forecaster and by remote-response
/// validation so "next period" is defined exactly once.
pub fn continuation_dates(
    last: NaiveDate,
    periods: usize,
    frequency: Frequency,
) -> Vec<NaiveDate> {
    let mut dates = Vec::with_capacity(periods);
    let mut current = last;
    for _ in 0..periods {
        current = frequency.next_period(current);
        dates.push(current);
    }
    dates
}
