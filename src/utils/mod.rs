//! Utility functions shared across the pipeline.

pub mod stats;

pub use stats::{mean, median, variance};
