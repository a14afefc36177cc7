//! # holt-winters
//!
//! Exponential smoothing forecasts with trend and seasonality.
//!
//! Provides Holt's linear trend (double exponential smoothing) and
//! multiplicative Holt-Winters (triple exponential smoothing) with the
//! bootstrap estimators for the initial level, trend and seasonal indices.
//! Both are pure functions over a slice of observations; progress of the
//! seasonal recurrence can be observed through a [`report::Reporter`].
//!
//! ```
//! use holt_winters::prelude::*;
//!
//! let sales = [362, 385, 432, 341, 382, 409, 498, 387];
//! let path = forecast(Some(&sales[..]), 0.5, 0.4, 0.3, 4, 4).unwrap().unwrap();
//! assert_eq!(path.len(), sales.len() + 4);
//! ```

#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)]

pub mod core;
pub mod error;
pub mod models;
pub mod report;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::core::{Forecast, TimeSeries};
    pub use crate::error::{ForecastError, Result};
    pub use crate::models::exponential::{
        double_exponential_forecast, forecast, forecast_with_reporter, HoltLinearTrend,
        HoltWinters, TrendInit,
    };
    pub use crate::models::Forecaster;
    pub use crate::report::{Recorder, Reporter, Silent, TextReport, TracingReporter};
}
