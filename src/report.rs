//! Progress reporting for the Holt-Winters recurrence.
//!
//! The smoothing code never prints. Instead it hands its bootstrap values,
//! each recurrence step and the final forecast path to a [`Reporter`]. The
//! reporters here cover the common cases:
//!
//! - [`Silent`] discards everything.
//! - [`TracingReporter`] emits `tracing` events.
//! - [`TextReport`] collects human-readable lines.
//! - [`Recorder`] keeps the structured values for later inspection.

use std::fmt::Write;
use tracing::{debug, trace};

/// Bootstrap values computed before the recurrence starts.
#[derive(Debug, Clone, PartialEq)]
pub struct InitialState {
    /// Number of observations.
    pub observations: usize,
    /// Number of complete seasons in the observations.
    pub seasons: usize,
    /// Seasonal period.
    pub period: usize,
    /// Initial level estimate.
    pub level: f64,
    /// Initial trend estimate.
    pub trend: f64,
    /// Initial seasonal indices, one per position in the period.
    pub seasonal_indices: Vec<f64>,
}

/// State of the recurrence after processing one observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepRecord {
    pub index: usize,
    pub observation: f64,
    pub level: f64,
    pub trend: f64,
    pub seasonal: f64,
    /// Forecast path value at `index`.
    pub forecast: f64,
}

/// Receiver of progress information from the seasonal forecaster.
///
/// All methods default to doing nothing; implement the ones you need.
pub trait Reporter {
    /// Called once with the bootstrap values.
    fn initial(&mut self, state: &InitialState) {
        let _ = state;
    }

    /// Called for every recurrence step, in time order.
    fn step(&mut self, record: &StepRecord) {
        let _ = record;
    }

    /// Called once with the complete forecast path.
    fn finished(&mut self, forecast: &[f64]) {
        let _ = forecast;
    }
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn initial(&mut self, state: &InitialState) {
        (**self).initial(state)
    }

    fn step(&mut self, record: &StepRecord) {
        (**self).step(record)
    }

    fn finished(&mut self, forecast: &[f64]) {
        (**self).finished(forecast)
    }
}

/// Reporter that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Reporter for Silent {}

/// Reporter that forwards progress to `tracing`.
///
/// Bootstrap values and the final path are logged at `DEBUG`, individual
/// steps at `TRACE`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn initial(&mut self, state: &InitialState) {
        debug!(
            observations = state.observations,
            seasons = state.seasons,
            period = state.period,
            level = state.level,
            trend = state.trend,
            seasonal_indices = ?state.seasonal_indices,
            "Holt-Winters bootstrap"
        );
    }

    fn step(&mut self, record: &StepRecord) {
        trace!(
            i = record.index,
            y = record.observation,
            level = record.level,
            trend = record.trend,
            seasonal = record.seasonal,
            forecast = record.forecast,
            "Holt-Winters step"
        );
    }

    fn finished(&mut self, forecast: &[f64]) {
        debug!(len = forecast.len(), "Holt-Winters forecast complete");
    }
}

/// Reporter that renders a plain-text table of the run.
#[derive(Debug, Clone, Default)]
pub struct TextReport {
    out: String,
}

impl TextReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rendered text so far.
    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.out.lines()
    }

    pub fn into_string(self) -> String {
        self.out
    }

    fn block(&mut self, title: &str, values: &[f64]) {
        // Writing into a String cannot fail
        let _ = writeln!(self.out, "******************* {title} *********************");
        for v in values {
            let _ = writeln!(self.out, "{v}");
        }
        let _ = writeln!(self.out, "{}", "*".repeat(65));
    }
}

impl Reporter for TextReport {
    fn initial(&mut self, state: &InitialState) {
        let _ = writeln!(
            self.out,
            "Total observations: {}, Seasons {}, Periods {}",
            state.observations, state.seasons, state.period
        );
        let _ = writeln!(self.out, "Initial level value a0: {}", state.level);
        let _ = writeln!(self.out, "Initial trend value b0: {}", state.trend);
        self.block("Seasonal Indices: ", &state.seasonal_indices);
    }

    fn step(&mut self, r: &StepRecord) {
        let _ = writeln!(
            self.out,
            "i = {}, y = {}, S = {:.6}, Bt = {:.6}, It = {:.6}, F = {:.6}",
            r.index, r.observation, r.level, r.trend, r.seasonal, r.forecast
        );
    }

    fn finished(&mut self, forecast: &[f64]) {
        self.block("Forecast", forecast);
    }
}

/// Reporter that stores everything it receives.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    pub initial: Option<InitialState>,
    pub steps: Vec<StepRecord>,
    pub forecast: Option<Vec<f64>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reporter for Recorder {
    fn initial(&mut self, state: &InitialState) {
        self.initial = Some(state.clone());
    }

    fn step(&mut self, record: &StepRecord) {
        self.steps.push(*record);
    }

    fn finished(&mut self, forecast: &[f64]) {
        self.forecast = Some(forecast.to_vec());
    }
}
