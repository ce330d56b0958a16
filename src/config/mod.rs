//! Configuration module for the candle-scope application.

mod api;
mod chart;

pub use api::{API, SYMBOLS};
pub use chart::CHART;
