//! # expense-forecast
//!
//! Forecasts a univariate series of periodic expense totals by
//! combining a base forecast — an external language-model predictor or
//! a deterministic mean fallback — with two locally computed
//! corrections: seasonal multipliers detected by multiplicative
//! decomposition and trend multipliers detected by robust STL.
//!
//! The pipeline is synchronous and stateless: every compose call
//! re-detects its factors from the history it is given.
//!
//! ```
//! use chrono::NaiveDate;
//! use expense_forecast::prelude::*;
//!
//! let periods: Vec<NaiveDate> = (0..24)
//!     .map(|i| NaiveDate::from_ymd_opt(2023 + i / 12, (i % 12) as u32 + 1, 1).unwrap())
//!     .collect();
//! let series = PeriodicSeries::new(periods, vec![100.0; 24]).unwrap();
//!
//! let forecast = forecast_expenses(&series, 3, Frequency::Monthly).unwrap();
//! assert_eq!(forecast.len(), 3);
//! ```

pub mod core;
pub mod decomposition;
pub mod detection;
pub mod error;
pub mod ingest;
pub mod models;
pub mod pipeline;
pub mod utils;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::core::{ForecastRecord, Frequency, PeriodicSeries};
    pub use crate::detection::{detect_seasonality, detect_trend, SeasonalFactors, TrendFactors};
    pub use crate::error::{ForecastError, Result};
    pub use crate::models::{BaseForecaster, MeanFallback};
    pub use crate::pipeline::{forecast_expenses, ForecastComposer};
}
