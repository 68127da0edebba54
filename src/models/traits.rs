//! BaseForecaster trait defining the collaborator boundary.

use crate::core::{ForecastRecord, Frequency, PeriodicSeries};
use crate::error::Result;

/// Supplier of unadjusted future predictions.
///
/// Implementations must return exactly `periods` records whose period
/// starts continue from the series's last period at the frequency's
/// stride. This trait is object-safe and can be used with
/// `Box<dyn BaseForecaster>`.
pub trait BaseForecaster {
    /// Produce `periods` future records from the historical series.
    fn forecast(
        &self,
        series: &PeriodicSeries,
        periods: usize,
        frequency: Frequency,
    ) -> Result<Vec<ForecastRecord>>;

    /// Get the forecaster name.
    fn name(&self) -> &str;
}

/// Type alias for boxed forecaster trait objects.
pub type BoxedBaseForecaster = Box<dyn BaseForecaster>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MeanFallback;
    use chrono::NaiveDate;

    #[test]
    fn trait_is_object_safe() {
        let model: BoxedBaseForecaster = Box::new(MeanFallback::new());
        assert_eq!(model.name(), "MeanFallback");

        let periods = vec![
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        ];
        let series = PeriodicSeries::new(periods, vec![10.0, 20.0]).unwrap();
        let forecast = model.forecast(&series, 2, Frequency::Monthly).unwrap();
        assert_eq!(forecast.len(), 2);
    }
}
