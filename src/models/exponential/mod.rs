//! Exponential smoothing models.
//!
//! This module provides the two trend-following smoothers:
//! - Holt's linear trend (double exponential smoothing)
//! - Holt-Winters with multiplicative seasonality (triple exponential smoothing)
//!
//! Each is available as free functions returning the full fitted-plus-forecast
//! path and as a [`Forecaster`](crate::models::Forecaster) model.

pub mod bootstrap;
mod holt;
mod holt_winters;

pub use holt::{
    double_exponential_forecast, smooth_linear, HoltLinearTrend, LinearState, TrendInit,
};
pub use holt_winters::{
    forecast, forecast_with_reporter, seasonal_forecast, smooth_seasonal, HoltWinters,
    SeasonalState,
};
