//! Detection of the local adjustment factors.
//!
//! This module derives the two corrections applied on top of a base
//! forecast:
//! - seasonal multipliers keyed by calendar period,
//! - trend multipliers anchored at the most recent historical period.

mod seasonality;
mod trend;

pub use seasonality::{detect_seasonality, SeasonalFactors};
pub use trend::{detect_trend, TrendFactors};
