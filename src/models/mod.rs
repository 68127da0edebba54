//! Base forecasters.
//!
//! A base forecaster supplies the unadjusted future values the
//! pipeline corrects for seasonality and trend. The remote
//! language-model path lives behind [`agent::PredictionClient`]; the
//! deterministic [`MeanFallback`] backs it up and can run on its own.

pub mod agent;
mod fallback;
mod traits;

pub use agent::{AgentConfig, PredictionClient, ResilientForecaster};
pub use fallback::MeanFallback;
pub use traits::{BaseForecaster, BoxedBaseForecaster};
