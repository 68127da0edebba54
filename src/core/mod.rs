//! Core data structures for periodic expense forecasting.

mod forecast;
mod series;

pub use forecast::{continuation_dates, ForecastRecord};
pub use series::{Frequency, PeriodicSeries};
