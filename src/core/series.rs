//! Periodic series and frequency handling.
//!
//! A [`PeriodicSeries`] is the canonical historical input to the
//! forecasting pipeline: one summed value per calendar period, ordered
//! by period start. [`Frequency`] carries all period-dependent
//! constants (cycle length, decomposition windows, calendar stepping)
//! so that no downstream code ever inspects a date to decide how to
//! treat it.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};

/// Aggregation frequency of a periodic series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    /// One period per calendar month.
    Monthly,
    /// One period per calendar quarter.
    Quarterly,
}

impl Frequency {
    /// Number of periods in one full seasonal cycle (one year).
    pub fn cycle_length(&self) -> usize {
        match self {
            Frequency::Monthly => 12,
            Frequency::Quarterly => 4,
        }
    }

    /// Seasonal smoothing window used by the robust trend
    /// decomposition.
    pub fn seasonal_window(&self) -> usize {
        match self {
            Frequency::Monthly => 13,
            Frequency::Quarterly => 3,
        }
    }

    /// Minimum history length for reliable seasonality detection:
    /// two full seasonal cycles.
    pub fn min_seasonal_history(&self) -> usize {
        2 * self.cycle_length()
    }

    /// Number of calendar months covered by one period.
    pub fn months_per_period(&self) -> u32 {
        match self {
            Frequency::Monthly => 1,
            Frequency::Quarterly => 3,
        }
    }

    /// Calendar key of the period containing `date`: month 1-12 for
    /// monthly, quarter 1-4 for quarterly.
    pub fn period_key(&self, date: NaiveDate) -> u32 {
        match self {
            Frequency::Monthly => date.month(),
            Frequency::Quarterly => (date.month() - 1) / 3 + 1,
        }
    }

    /// First day of the period containing `date`.
    pub fn period_start(&self, date: NaiveDate) -> NaiveDate {
        let month = match self {
            Frequency::Monthly => date.month(),
            Frequency::Quarterly => (date.month() - 1) / 3 * 3 + 1,
        };
        month_start(date.year(), month as i32 - 1)
    }

    /// Start of the period immediately following the one containing
    /// `date`. This is the single calendar-stepping function shared by
    /// aggregation, fallback forecasting, and date continuation.
    pub fn next_period(&self, date: NaiveDate) -> NaiveDate {
        let start = self.period_start(date);
        month_start(
            start.year(),
            start.month() as i32 - 1 + self.months_per_period() as i32,
        )
    }

    /// Human-readable name, lower case ("monthly" / "quarterly").
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First day of a month addressed as a zero-based offset from January
/// of `year`. Offsets outside 0..12 roll the year.
fn month_start(year: i32, month0: i32) -> NaiveDate {
    let year = year + month0.div_euclid(12);
    let month = month0.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1).expect("month in 1..=12")
}

/// A univariate series with one value per calendar period.
///
/// Invariants enforced at construction: one value per period start,
/// period starts strictly increasing (which also rules out
/// duplicates). Gap-freeness under a frequency is the aggregator's
/// responsibility, not re-checked here.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodicSeries {
    periods: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl PeriodicSeries {
    /// Create a series from parallel period-start and value vectors.
    pub fn new(periods: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if periods.len() != values.len() {
            return Err(ForecastError::LengthMismatch {
                expected: periods.len(),
                got: values.len(),
            });
        }
        for i in 1..periods.len() {
            if periods[i] <= periods[i - 1] {
                return Err(ForecastError::NonChronological(i));
            }
        }
        Ok(Self { periods, values })
    }

    /// Create an empty series.
    pub fn empty() -> Self {
        Self {
            periods: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Internal constructor for callers that build the vectors in
    /// sorted order themselves (e.g. the aggregator).
    pub(crate) fn from_sorted_parts(periods: Vec<NaiveDate>, values: Vec<f64>) -> Self {
        debug_assert_eq!(periods.len(), values.len());
        debug_assert!(periods.windows(2).all(|w| w[0] < w[1]));
        Self { periods, values }
    }

    /// Number of periods.
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// Whether the series has no periods.
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Period starts, ascending.
    pub fn periods(&self) -> &[NaiveDate] {
        &self.periods
    }

    /// Values, aligned with [`periods`](Self::periods).
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Start of the most recent period, if any.
    pub fn last_period(&self) -> Option<NaiveDate> {
        self.periods.last().copied()
    }

    /// Iterate over (period_start, value) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.periods
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }
}
