//! Holt-Winters forecasting model.
//!
//! Also known as triple exponential smoothing. This variant uses
//! multiplicative seasonality: the level is deflated by the seasonal index of
//! the same position one period earlier, and forecasts are scaled by it.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use super::bootstrap::{check_seasons, initial_level, initial_trend, seasonal_indices};
use crate::core::{extend_timestamps, Forecast, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::Forecaster;
use crate::report::{InitialState, Reporter, Silent, StepRecord};

/// Level, trend and seasonal series of a completed Holt-Winters run.
///
/// All three vectors have one entry per observation. Index 0 of the level
/// and trend is never seeded and stays 0; the recurrence starts at index 2
/// from the values seeded at index 1. Seasonal entries below `period` hold
/// the bootstrap indices, later ones the smoothed updates.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalState {
    pub level: Vec<f64>,
    pub trend: Vec<f64>,
    pub seasonal: Vec<f64>,
}

impl SeasonalState {
    /// Number of observations the state covers.
    pub fn len(&self) -> usize {
        self.level.len()
    }

    pub fn is_empty(&self) -> bool {
        self.level.is_empty()
    }

    /// Forecast path `F` for horizon `m`, of length `len() + m`.
    ///
    /// `F[i + m] = (S[i] + m × B[i]) × I[i + m - period]` for every `i >= 2`
    /// with `i + m >= period`, plus the two seeds `F[m]` and `F[m + 1]` taken
    /// from indices 0 and 1. Entries not covered stay 0.
    ///
    /// Fails unless `1 <= period <= len()`, `m <= period` and `len() >= 2`.
    pub fn forecast_path(&self, period: usize, m: usize) -> Result<Vec<f64>> {
        let n = self.len();
        if self.trend.len() != n || self.seasonal.len() != n {
            return Err(ForecastError::DimensionMismatch {
                expected: n,
                got: self.trend.len().min(self.seasonal.len()),
            });
        }
        if n < 2 {
            return Err(ForecastError::InsufficientData { needed: 2, got: n });
        }
        check_horizon(period, m)?;
        if period > n {
            return Err(ForecastError::InsufficientData {
                needed: period,
                got: n,
            });
        }

        let h = m as f64;
        let mut path = vec![0.0; n + m];

        // Open question: index 0 is never seeded, so F[m] is always 0.
        path[m] = (self.level[0] + h * self.trend[0]) * self.seasonal[0];
        path[m + 1] = (self.level[1] + h * self.trend[1]) * self.seasonal[1];

        for i in 2..n {
            if i + m >= period {
                path[i + m] =
                    (self.level[i] + h * self.trend[i]) * self.seasonal[i + m - period];
            }
        }

        Ok(path)
    }
}

fn check_horizon(period: usize, horizon: usize) -> Result<()> {
    if period == 0 {
        return Err(ForecastError::InvalidParameter(
            "seasonal period must be positive".to_string(),
        ));
    }
    if horizon > period {
        return Err(ForecastError::InvalidParameter(format!(
            "horizon {horizon} exceeds seasonal period {period}"
        )));
    }
    Ok(())
}

fn validate(n: usize, period: usize, horizon: usize) -> Result<()> {
    check_seasons(n, period)?;
    check_horizon(period, horizon)
}

fn bootstrap(values: &[f64], period: usize) -> Result<InitialState> {
    let seasons = values.len() / period.max(1);
    Ok(InitialState {
        observations: values.len(),
        seasons,
        period,
        level: initial_level(values, period)?,
        trend: initial_trend(values, period)?,
        seasonal_indices: seasonal_indices(values, period, seasons)?,
    })
}

fn recurrence(
    values: &[f64],
    init: &InitialState,
    alpha: f64,
    beta: f64,
    gamma: f64,
) -> SeasonalState {
    let n = values.len();
    let period = init.period;

    let mut level = vec![0.0; n];
    let mut trend = vec![0.0; n];
    let mut seasonal = vec![0.0; n];

    // Open question: only index 1 is seeded; S[0] and B[0] stay 0.
    level[1] = init.level;
    trend[1] = init.trend;
    seasonal[..period].copy_from_slice(&init.seasonal_indices);

    for i in 2..n {
        let projected = level[i - 1] + trend[i - 1];
        level[i] = if i >= period {
            alpha * values[i] / seasonal[i - period] + (1.0 - alpha) * projected
        } else {
            alpha * values[i] + (1.0 - alpha) * projected
        };

        trend[i] = gamma * (level[i] - level[i - 1]) + (1.0 - gamma) * trend[i - 1];

        // Positions inside the first period keep their bootstrap index
        if i >= period {
            seasonal[i] = beta * values[i] / level[i] + (1.0 - beta) * seasonal[i - period];
        }
    }

    SeasonalState {
        level,
        trend,
        seasonal,
    }
}

/// Run the Holt-Winters recurrence and return the smoothed state.
///
/// - Level: `S_i = α × y_i / I_{i-L} + (1-α) × (S_{i-1} + B_{i-1})`
///   (undeflated `α × y_i` while `i < L`)
/// - Trend: `B_i = γ × (S_i - S_{i-1}) + (1-γ) × B_{i-1}`
/// - Seasonal: `I_i = β × y_i / S_i + (1-β) × I_{i-L}` once `i >= L`
///
/// `values` must hold at least two full periods. Coefficients are not
/// range-checked; zero observations or indices propagate as inf/NaN.
pub fn smooth_seasonal(
    values: &[f64],
    alpha: f64,
    beta: f64,
    gamma: f64,
    period: usize,
) -> Result<SeasonalState> {
    validate(values.len(), period, 0)?;
    let init = bootstrap(values, period)?;
    Ok(recurrence(values, &init, alpha, beta, gamma))
}

/// Holt-Winters forecast over real-valued observations.
///
/// Returns the forecast path of length `values.len() + m`: fitted values
/// overlapping the observations followed by `m` true forecasts. The
/// reporter receives the bootstrap values, the state after every step
/// `i = 2..n` and finally the complete path.
pub fn seasonal_forecast<R: Reporter>(
    values: &[f64],
    alpha: f64,
    beta: f64,
    gamma: f64,
    period: usize,
    m: usize,
    mut reporter: R,
) -> Result<Vec<f64>> {
    validate(values.len(), period, m)?;

    let init = bootstrap(values, period)?;
    reporter.initial(&init);

    let state = recurrence(values, &init, alpha, beta, gamma);
    let path = state.forecast_path(period, m)?;

    for i in 2..values.len() {
        reporter.step(&StepRecord {
            index: i,
            observation: values[i],
            level: state.level[i],
            trend: state.trend[i],
            seasonal: state.seasonal[i],
            forecast: path[i],
        });
    }

    reporter.finished(&path);
    Ok(path)
}

/// Holt-Winters forecast for integer observations.
///
/// An absent series yields `Ok(None)` rather than an error. Otherwise
/// returns `y.len() + m` values, see [`seasonal_forecast`].
///
/// # Arguments
/// * `alpha` - Level smoothing coefficient
/// * `beta` - Seasonal smoothing coefficient
/// * `gamma` - Trend smoothing coefficient
/// * `period` - Observations per season, e.g. 4 quarterly, 7 weekly, 12 monthly
/// * `m` - Horizon, at most `period`
///
/// # Example
/// ```
/// use holt_winters::models::exponential::forecast;
///
/// let y = [1, 3, 2, 6];
/// let path = forecast(Some(&y[..]), 0.5, 0.5, 0.5, 2, 1).unwrap().unwrap();
/// assert_eq!(path.len(), 5);
///
/// assert_eq!(forecast(None, 0.5, 0.5, 0.5, 2, 1).unwrap(), None);
/// ```
pub fn forecast(
    y: Option<&[i64]>,
    alpha: f64,
    beta: f64,
    gamma: f64,
    period: usize,
    m: usize,
) -> Result<Option<Vec<f64>>> {
    forecast_with_reporter(y, alpha, beta, gamma, period, m, Silent)
}

/// [`forecast`] with progress sent to `reporter`.
pub fn forecast_with_reporter<R: Reporter>(
    y: Option<&[i64]>,
    alpha: f64,
    beta: f64,
    gamma: f64,
    period: usize,
    m: usize,
    reporter: R,
) -> Result<Option<Vec<f64>>> {
    let Some(y) = y else {
        return Ok(None);
    };
    let values: Vec<f64> = y.iter().map(|&v| v as f64).collect();
    seasonal_forecast(&values, alpha, beta, gamma, period, m, reporter).map(Some)
}

/// Holt-Winters forecaster with fixed coefficients.
///
/// Fitted values are the one-step-ahead path (`m = 1`). `predict(h)` returns
/// the last `h` entries of the path for `m = h`, so the horizon is limited
/// to one period.
#[derive(Debug, Clone)]
pub struct HoltWinters {
    /// Level smoothing coefficient.
    alpha: f64,
    /// Seasonal smoothing coefficient.
    beta: f64,
    /// Trend smoothing coefficient.
    gamma: f64,
    /// Seasonal period.
    period: usize,
    initial: Option<InitialState>,
    state: Option<SeasonalState>,
    fitted: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
    origin: Option<(DateTime<Utc>, Duration)>,
}

impl HoltWinters {
    /// Create a new Holt-Winters model.
    pub fn new(alpha: f64, beta: f64, gamma: f64, period: usize) -> Self {
        Self {
            alpha,
            beta,
            gamma,
            period,
            initial: None,
            state: None,
            fitted: None,
            residuals: None,
            origin: None,
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Get the seasonal period.
    pub fn period(&self) -> usize {
        self.period
    }

    /// Bootstrap values of the last fit.
    pub fn initial_state(&self) -> Option<&InitialState> {
        self.initial.as_ref()
    }

    /// Smoothed state of the last fit.
    pub fn state(&self) -> Option<&SeasonalState> {
        self.state.as_ref()
    }

    /// Get the final level.
    pub fn level(&self) -> Option<f64> {
        self.state.as_ref().and_then(|s| s.level.last().copied())
    }

    /// Get the final trend.
    pub fn trend(&self) -> Option<f64> {
        self.state.as_ref().and_then(|s| s.trend.last().copied())
    }
}

impl Forecaster for HoltWinters {
    fn fit(&mut self, series: &TimeSeries) -> Result<()> {
        let values = series.values();
        validate(values.len(), self.period, 1)?;

        let init = bootstrap(values, self.period)?;
        let state = recurrence(values, &init, self.alpha, self.beta, self.gamma);

        let mut fitted = state.forecast_path(self.period, 1)?;
        fitted.truncate(values.len());
        let residuals = values.iter().zip(&fitted).map(|(y, f)| y - f).collect();

        debug!(
            model = self.name(),
            observations = values.len(),
            seasons = init.seasons,
            period = self.period,
            alpha = self.alpha,
            beta = self.beta,
            gamma = self.gamma,
            "fitted"
        );

        self.initial = Some(init);
        self.state = Some(state);
        self.fitted = Some(fitted);
        self.residuals = Some(residuals);
        self.origin = series.forecast_origin();
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let state = self.state.as_ref().ok_or(ForecastError::FitRequired)?;
        debug!(model = self.name(), horizon, "predict");

        let path = state.forecast_path(self.period, horizon)?;
        let forecast = Forecast::from_values(path[state.len()..].to_vec());
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
        "HoltWinters"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Recorder;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    fn quarterly_sales() -> Vec<i64> {
        vec![
            362, 385, 432, 341, 382, 409, 498, 387, 473, 513, 582, 474, 544, 582, 681, 557,
        ]
    }

    #[test]
    fn small_series_matches_hand_computation() {
        // a0 = 1, b0 = ((2-1) + (6-3)) / 4 = 1, indices = [0.5, 1.5]
        let path = forecast(Some(&[1, 3, 2, 6][..]), 0.5, 0.5, 0.5, 2, 1)
            .unwrap()
            .unwrap();

        assert_eq!(path.len(), 5);
        assert_eq!(path[0], 0.0);
        assert_eq!(path[1], 0.0);
        assert_relative_eq!(path[2], 3.0, epsilon = 1e-12);
        assert_relative_eq!(path[3], 6.75, epsilon = 1e-12);
        assert_relative_eq!(path[4], 3.28125, epsilon = 1e-12);
    }

    #[test]
    fn state_matches_hand_computation() {
        let state = smooth_seasonal(&[1.0, 3.0, 2.0, 6.0], 0.5, 0.5, 0.5, 2).unwrap();

        assert_eq!(state.level[..2], [0.0, 1.0]);
        assert_eq!(state.trend[..2], [0.0, 1.0]);
        assert_relative_eq!(state.level[2], 3.0, epsilon = 1e-12);
        assert_relative_eq!(state.trend[2], 1.5, epsilon = 1e-12);
        assert_relative_eq!(state.seasonal[2], 7.0 / 12.0, epsilon = 1e-12);
        assert_relative_eq!(state.level[3], 4.25, epsilon = 1e-12);
        assert_relative_eq!(state.trend[3], 1.375, epsilon = 1e-12);
        assert_relative_eq!(state.seasonal[3], 3.0 / 4.25 + 0.75, epsilon = 1e-12);
    }

    #[test]
    fn reporter_sees_bootstrap_steps_and_path() {
        let mut recorder = Recorder::new();
        let path =
            forecast_with_reporter(Some(&[1, 3, 2, 6][..]), 0.5, 0.5, 0.5, 2, 1, &mut recorder)
                .unwrap()
                .unwrap();

        let init = recorder.initial.as_ref().unwrap();
        assert_eq!(init.observations, 4);
        assert_eq!(init.seasons, 2);
        assert_eq!(init.level, 1.0);
        assert_eq!(init.trend, 1.0);
        assert_eq!(init.seasonal_indices, vec![0.5, 1.5]);

        let indices: Vec<usize> = recorder.steps.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![2, 3]);
        assert_eq!(recorder.steps[0].observation, 2.0);
        assert_eq!(recorder.steps[1].forecast, path[3]);
        assert_eq!(recorder.forecast.as_deref(), Some(path.as_slice()));
    }

    #[test]
    fn missing_series_returns_none() {
        assert_eq!(forecast(None, 0.5, 0.4, 0.3, 4, 2).unwrap(), None);

        let mut recorder = Recorder::new();
        let out = forecast_with_reporter(None, 0.5, 0.4, 0.3, 4, 2, &mut recorder).unwrap();
        assert!(out.is_none());
        assert!(recorder.initial.is_none());
    }

    #[test]
    fn rejects_unusable_parameters() {
        let y = quarterly_sales();
        assert!(matches!(
            forecast(Some(&y[..]), 0.5, 0.4, 0.3, 0, 1),
            Err(ForecastError::InvalidParameter(_))
        ));
        assert!(matches!(
            forecast(Some(&y[..]), 0.5, 0.4, 0.3, 4, 5),
            Err(ForecastError::InvalidParameter(_))
        ));
        assert_eq!(
            forecast(Some(&y[..7]), 0.5, 0.4, 0.3, 4, 1),
            Err(ForecastError::InsufficientData { needed: 8, got: 7 })
        );
    }

    #[test]
    fn output_length_is_observations_plus_horizon() {
        let y = quarterly_sales();
        for m in 0..=4 {
            let path = forecast(Some(&y[..]), 0.5, 0.4, 0.3, 4, m).unwrap().unwrap();
            assert_eq!(path.len(), y.len() + m);
            assert!(path[y.len()..].iter().all(|v| v.is_finite() && *v > 0.0));
        }
    }

    #[test]
    fn forecasts_follow_the_seasonal_shape() {
        let y = quarterly_sales();
        let path = forecast(Some(&y[..]), 0.5, 0.4, 0.3, 4, 4).unwrap().unwrap();
        let tail = &path[y.len()..];

        // Third quarter peaks
        assert!(tail[2] > tail[1]);
        assert!(tail[2] > tail[3]);
    }

    #[test]
    fn zero_observation_propagates_non_finite_values() {
        let y = [0, 0, 4, 6, 3, 5];
        let path = forecast(Some(&y[..]), 0.5, 0.5, 0.5, 2, 1).unwrap().unwrap();
        assert!(path.iter().any(|v| !v.is_finite()));
    }

    #[test]
    fn model_predict_matches_forecast_tail() {
        let y = quarterly_sales();
        let values: Vec<f64> = y.iter().map(|&v| v as f64).collect();

        let mut model = HoltWinters::new(0.5, 0.4, 0.3, 4);
        model.fit(&TimeSeries::from_values(values.clone())).unwrap();

        for h in 1..=4 {
            let path = forecast(Some(&y[..]), 0.5, 0.4, 0.3, 4, h).unwrap().unwrap();
            assert_eq!(model.predict(h).unwrap().primary(), &path[y.len()..]);
        }

        let one_step = forecast(Some(&y[..]), 0.5, 0.4, 0.3, 4, 1).unwrap().unwrap();
        assert_eq!(model.fitted_values().unwrap(), &one_step[..y.len()]);

        let residuals = model.residuals().unwrap();
        assert_relative_eq!(residuals[5], values[5] - one_step[5], epsilon = 1e-12);
        assert_eq!(model.initial_state().unwrap().seasons, 4);
    }

    #[test]
    fn model_rejects_horizon_beyond_period() {
        let values: Vec<f64> = quarterly_sales().iter().map(|&v| v as f64).collect();
        let mut model = HoltWinters::new(0.5, 0.4, 0.3, 4);
        model.fit(&TimeSeries::from_values(values)).unwrap();

        assert!(matches!(
            model.predict(5),
            Err(ForecastError::InvalidParameter(_))
        ));
        assert!(model.predict(0).unwrap().is_empty());
    }

    #[test]
    fn model_attaches_future_timestamps() {
        let values: Vec<f64> = quarterly_sales().iter().map(|&v| v as f64).collect();
        let base = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let timestamps: Vec<_> = (0..values.len())
            .map(|i| base + Duration::days(7 * i as i64))
            .collect();
        let ts = TimeSeries::univariate(timestamps, values).unwrap();

        let mut model = HoltWinters::new(0.5, 0.4, 0.3, 4);
        model.fit(&ts).unwrap();
        let forecast = model.predict(2).unwrap();

        let future = forecast.timestamps().unwrap();
        assert_eq!(future[0], base + Duration::days(7 * 16));
        assert_eq!(future[1], base + Duration::days(7 * 17));
    }

    #[test]
    fn model_requires_fit_and_enough_data() {
        let mut model = HoltWinters::new(0.5, 0.4, 0.3, 4);
        assert!(matches!(model.predict(1), Err(ForecastError::FitRequired)));
        assert!(model.level().is_none());

        let short = TimeSeries::from_values(vec![1.0, 2.0, 3.0]);
        assert_eq!(
            model.fit(&short),
            Err(ForecastError::InsufficientData { needed: 8, got: 3 })
        );
    }

    #[test]
    fn forecast_path_checks_its_arguments() {
        let state = smooth_seasonal(&[1.0, 3.0, 2.0, 6.0], 0.5, 0.5, 0.5, 2).unwrap();
        assert_eq!(state.forecast_path(2, 1).unwrap().len(), 5);

        assert!(matches!(
            state.forecast_path(2, 3),
            Err(ForecastError::InvalidParameter(_))
        ));
        assert!(matches!(
            state.forecast_path(0, 0),
            Err(ForecastError::InvalidParameter(_))
        ));
        assert_eq!(
            state.forecast_path(5, 1),
            Err(ForecastError::InsufficientData { needed: 5, got: 4 })
        );
    }

    #[test]
    fn forecast_path_rejects_short_or_ragged_state() {
        let short = SeasonalState {
            level: vec![1.0],
            trend: vec![0.0],
            seasonal: vec![1.0],
        };
        assert_eq!(
            short.forecast_path(1, 1),
            Err(ForecastError::InsufficientData { needed: 2, got: 1 })
        );

        let ragged = SeasonalState {
            level: vec![1.0, 2.0, 3.0],
            trend: vec![0.0, 0.0, 0.0],
            seasonal: vec![1.0],
        };
        assert_eq!(
            ragged.forecast_path(1, 1),
            Err(ForecastError::DimensionMismatch {
                expected: 3,
                got: 1
            })
        );
    }

    #[test]
    fn huge_period_is_rejected_without_overflow() {
        assert_eq!(
            forecast(Some(&[1, 2, 3, 4][..]), 0.5, 0.5, 0.5, usize::MAX / 2 + 1, 1),
            Err(ForecastError::InsufficientData {
                needed: usize::MAX,
                got: 4
            })
        );
    }

    #[test]
    fn empty_series_is_reported_as_empty() {
        assert_eq!(
            forecast(Some(&[][..]), 0.5, 0.5, 0.5, 4, 1),
            Err(ForecastError::EmptyData)
        );
    }
}
