//! Time series decomposition algorithms.
//!
//! Two decompositions back the detectors:
//! - [`decompose_multiplicative`]: classical moving-average
//!   decomposition with boundary trend extrapolation, used for
//!   seasonality detection.
//! - [`Stl`]: robust STL (Seasonal-Trend decomposition using LOESS),
//!   used for trend detection.

mod classical;
mod stl;

pub use classical::decompose_multiplicative;
pub use stl::Stl;

/// Components of a decomposed series, each aligned with the input.
///
/// Classical multiplicative decomposition satisfies
/// `y = trend * seasonal * remainder`; STL is additive,
/// `y = trend + seasonal + remainder`.
#[derive(Debug, Clone)]
pub struct Decomposition {
    /// Slow-moving level of the series.
    pub trend: Vec<f64>,
    /// Repeating within-cycle component.
    pub seasonal: Vec<f64>,
    /// Residual after removing trend and seasonal.
    pub remainder: Vec<f64>,
}
