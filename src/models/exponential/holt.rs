//! Holt's linear trend (double exponential smoothing).
//!
//! Suitable for data with a linear trend but no seasonality.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::core::{extend_timestamps, Forecast, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::Forecaster;

/// How the initial trend is estimated from the raw series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendInit {
    /// `y[1] - y[0]`.
    #[default]
    FirstDifference,
    /// `(y[3] - y[0]) / 3`, only when more than four observations exist.
    /// Shorter series silently start from a zero trend.
    ThreeStep,
    /// `(y[n-1] - y[0]) / (n - 1)`, the average slope over the whole series.
    AverageSlope,
}

impl TrendInit {
    /// Numeric code of the method (0, 1 or 2).
    pub fn code(self) -> i32 {
        match self {
            TrendInit::FirstDifference => 0,
            TrendInit::ThreeStep => 1,
            TrendInit::AverageSlope => 2,
        }
    }

    /// Estimate the initial trend.
    ///
    /// Callers must have checked `values.len() >= 2` for the methods that
    /// need it.
    fn estimate(self, values: &[f64]) -> f64 {
        let n = values.len();
        match self {
            TrendInit::FirstDifference => values[1] - values[0],
            TrendInit::ThreeStep if n > 4 => (values[3] - values[0]) / 3.0,
            TrendInit::ThreeStep => 0.0,
            TrendInit::AverageSlope => (values[n - 1] - values[0]) / (n - 1) as f64,
        }
    }

    fn min_len(self) -> usize {
        match self {
            TrendInit::ThreeStep => 1,
            TrendInit::FirstDifference | TrendInit::AverageSlope => 2,
        }
    }
}

impl TryFrom<i32> for TrendInit {
    type Error = ForecastError;

    fn try_from(code: i32) -> Result<Self> {
        match code {
            0 => Ok(TrendInit::FirstDifference),
            1 => Ok(TrendInit::ThreeStep),
            2 => Ok(TrendInit::AverageSlope),
            other => Err(ForecastError::InvalidParameter(format!(
                "unknown trend initialization method {other}, expected 0, 1 or 2"
            ))),
        }
    }
}

/// Level and trend series produced by the double exponential recurrence.
///
/// Both vectors have one entry per observation.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearState {
    pub level: Vec<f64>,
    pub trend: Vec<f64>,
}

impl LinearState {
    /// Final level, `None` for an empty state.
    pub fn last_level(&self) -> Option<f64> {
        self.level.last().copied()
    }

    /// Final trend, `None` for an empty state.
    pub fn last_trend(&self) -> Option<f64> {
        self.trend.last().copied()
    }

    /// `level + k * trend` from the final state, for `k = 1..=horizon`.
    pub fn extrapolate(&self, horizon: usize) -> Result<Vec<f64>> {
        let (l, b) = self
            .last_level()
            .zip(self.last_trend())
            .ok_or(ForecastError::EmptyData)?;
        Ok((1..=horizon).map(|k| l + k as f64 * b).collect())
    }
}

/// Run the double exponential recurrence over `values`.
///
/// - Level: `s_i = α × y_i + (1-α) × (s_{i-1} + b_{i-1})`
/// - Trend: `b_i = γ × (s_i - s_{i-1}) + (1-γ) × b_{i-1}`
///
/// with `s_0 = y_0` and `b_0` from `init`. Coefficients are used as given.
pub fn smooth_linear(
    values: &[f64],
    alpha: f64,
    gamma: f64,
    init: TrendInit,
) -> Result<LinearState> {
    if values.is_empty() {
        return Err(ForecastError::EmptyData);
    }
    if values.len() < init.min_len() {
        return Err(ForecastError::InsufficientData {
            needed: init.min_len(),
            got: values.len(),
        });
    }

    let n = values.len();
    let mut level = vec![0.0; n];
    let mut trend = vec![0.0; n];
    level[0] = values[0];
    trend[0] = init.estimate(values);

    for i in 1..n {
        level[i] = alpha * values[i] + (1.0 - alpha) * (level[i - 1] + trend[i - 1]);
        trend[i] = gamma * (level[i] - level[i - 1]) + (1.0 - gamma) * trend[i - 1];
    }

    Ok(LinearState { level, trend })
}

/// One-step-ahead path: `out[0] = y_0`, `out[k] = s_{k-1} + b_{k-1}`.
fn one_step_path(state: &LinearState, len: usize) -> Vec<f64> {
    let mut out = vec![0.0; len];
    if let Some(first) = out.first_mut() {
        *first = state.level[0];
    }
    for (i, (l, b)) in state.level.iter().zip(&state.trend).enumerate() {
        match out.get_mut(i + 1) {
            Some(slot) => *slot = l + b,
            None => break,
        }
    }
    out
}

/// Double exponential smoothing forecast.
///
/// Returns `values.len() + horizon` entries: the one-step-ahead fitted
/// values for the observed range followed by the linear projection
/// `s_{n-1} + k × b_{n-1}` for `k = 1..=horizon`. Entry 0 is the first
/// observation.
///
/// # Example
/// ```
/// use holt_winters::models::exponential::{double_exponential_forecast, TrendInit};
///
/// let out = double_exponential_forecast(
///     &[10.0, 20.0, 30.0, 40.0, 50.0],
///     0.5,
///     0.5,
///     TrendInit::FirstDifference,
///     2,
/// )
/// .unwrap();
/// assert_eq!(out, vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0]);
/// ```
pub fn double_exponential_forecast(
    values: &[f64],
    alpha: f64,
    gamma: f64,
    init: TrendInit,
    horizon: usize,
) -> Result<Vec<f64>> {
    let state = smooth_linear(values, alpha, gamma, init)?;
    let n = values.len();

    let mut out = one_step_path(&state, n + horizon);
    out[n..].copy_from_slice(&state.extrapolate(horizon)?);
    Ok(out)
}

/// Holt's linear trend forecaster with fixed coefficients.
///
/// Wraps [`smooth_linear`] behind the [`Forecaster`] interface. Fitted
/// values are the one-step-ahead path and predictions the linear
/// extrapolation from the final level and trend.
#[derive(Debug, Clone)]
pub struct HoltLinearTrend {
    /// Level smoothing coefficient.
    alpha: f64,
    /// Trend smoothing coefficient.
    gamma: f64,
    init: TrendInit,
    state: Option<LinearState>,
    fitted: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
    origin: Option<(DateTime<Utc>, Duration)>,
}

impl HoltLinearTrend {
    /// Create a model that initializes the trend from the first difference.
    ///
    /// # Arguments
    /// * `alpha` - Level smoothing coefficient, conventionally in [0, 1]
    /// * `gamma` - Trend smoothing coefficient, conventionally in [0, 1]
    pub fn new(alpha: f64, gamma: f64) -> Self {
        Self::with_init(alpha, gamma, TrendInit::default())
    }

    /// Create a model with an explicit trend initialization method.
    pub fn with_init(alpha: f64, gamma: f64, init: TrendInit) -> Self {
        Self {
            alpha,
            gamma,
            init,
            state: None,
            fitted: None,
            residuals: None,
            origin: None,
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn init(&self) -> TrendInit {
        self.init
    }

    /// Get the final level.
    pub fn level(&self) -> Option<f64> {
        self.state.as_ref().and_then(LinearState::last_level)
    }

    /// Get the final trend.
    pub fn trend(&self) -> Option<f64> {
        self.state.as_ref().and_then(LinearState::last_trend)
    }

    /// Get the full level and trend series.
    pub fn state(&self) -> Option<&LinearState> {
        self.state.as_ref()
    }
}

impl Forecaster for HoltLinearTrend {
    fn fit(&mut self, series: &TimeSeries) -> Result<()> {
        let values = series.values();
        let state = smooth_linear(values, self.alpha, self.gamma, self.init)?;

        let fitted = one_step_path(&state, values.len());
        let residuals = values.iter().zip(&fitted).map(|(y, f)| y - f).collect();

        debug!(
            model = self.name(),
            observations = values.len(),
            alpha = self.alpha,
            gamma = self.gamma,
            init = self.init.code(),
            level = state.last_level(),
            trend = state.last_trend(),
            "fitted"
        );

        self.state = Some(state);
        self.fitted = Some(fitted);
        self.residuals = Some(residuals);
        self.origin = series.forecast_origin();
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let state = self.state.as_ref().ok_or(ForecastError::FitRequired)?;
        debug!(model = self.name(), horizon, "predict");

        let forecast = Forecast::from_values(state.extrapolate(horizon)?);
        Ok(match self.origin {
            Some((last, step)) => forecast.with_timestamps(extend_timestamps(last, step, horizon)?),
            None => forecast,
        })
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    fn name(&self) -> &str {
        "HoltLinearTrend"
    }
}
