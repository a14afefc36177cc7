//! TimeSeries data structure for representing observed values.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// A univariate time series with optional timestamps.
///
/// Timestamps, when present, are strictly increasing and parallel to the
/// values. A series built with [`TimeSeries::from_values`] carries no
/// timestamps and is indexed purely by position.
#[derive(Debug, Clone)]
pub struct TimeSeries {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Create a univariate time series from timestamps and values.
    pub fn univariate(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        if values.len() != timestamps.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: timestamps.len(),
                got: values.len(),
            });
        }

        // Validate timestamps are strictly increasing
        for i in 1..timestamps.len() {
            if timestamps[i] <= timestamps[i - 1] {
                return Err(ForecastError::TimestampError(
                    "timestamps must be strictly increasing".to_string(),
                ));
            }
        }

        Ok(Self { timestamps, values })
    }

    /// Create a series without timestamps.
    pub fn from_values(values: Vec<f64>) -> Self {
        Self {
            timestamps: Vec::new(),
            values,
        }
    }

    /// Get the number of observations.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the series is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get timestamps (empty when the series was built from values only).
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    pub fn has_timestamps(&self) -> bool {
        !self.timestamps.is_empty()
    }

    /// Get the observed values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Check if series has missing values (NaN or Inf).
    pub fn has_missing_values(&self) -> bool {
        self.values.iter().any(|v| !v.is_finite())
    }

    /// Infer frequency from timestamps.
    ///
    /// Returns the modal spacing between consecutive timestamps, provided it
    /// accounts for at least `tolerance` of all spacings.
    pub fn infer_frequency(&self, tolerance: f64) -> Result<Duration> {
        if self.timestamps.len() < 2 {
            return Err(ForecastError::InsufficientData {
                needed: 2,
                got: self.timestamps.len(),
            });
        }

        let mut counts: HashMap<i64, usize> = HashMap::new();
        for w in self.timestamps.windows(2) {
            *counts.entry((w[1] - w[0]).num_seconds()).or_insert(0) += 1;
        }

        // Ties resolve to the smallest spacing so the result is deterministic
        let (modal_diff, modal_count) = counts
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
            .map(|(&diff, &count)| (diff, count))
            .ok_or(ForecastError::FrequencyInference(
                "empty spacing data".to_string(),
            ))?;

        let total_count: usize = counts.values().sum();
        let modal_ratio = modal_count as f64 / total_count as f64;

        if modal_ratio < tolerance {
            return Err(ForecastError::FrequencyInference(
                "no unique modal spacing found".to_string(),
            ));
        }

        Ok(Duration::seconds(modal_diff))
    }

    /// Timestamps for the `horizon` steps following the last observation.
    pub fn future_timestamps(&self, horizon: usize) -> Result<Vec<DateTime<Utc>>> {
        let step = self.infer_frequency(0.5)?;
        let last = *self.timestamps.last().ok_or(ForecastError::EmptyData)?;
        extend_timestamps(last, step, horizon)
    }

    /// Last timestamp and regular spacing, if the series has both.
    pub(crate) fn forecast_origin(&self) -> Option<(DateTime<Utc>, Duration)> {
        let step = self.infer_frequency(0.5).ok()?;
        self.timestamps.last().map(|&last| (last, step))
    }
}

/// Extend `last` by `horizon` steps of `step`.
///
/// Fails when the horizon or a resulting timestamp is out of range.
pub(crate) fn extend_timestamps(
    last: DateTime<Utc>,
    step: Duration,
    horizon: usize,
) -> Result<Vec<DateTime<Utc>>> {
    let steps = i32::try_from(horizon).map_err(|_| {
        ForecastError::TimestampError(format!("horizon {horizon} exceeds i32::MAX steps"))
    })?;
    (1..=steps)
        .map(|k| {
            step.checked_mul(k)
                .and_then(|offset| last.checked_add_signed(offset))
                .ok_or_else(|| {
                    ForecastError::TimestampError(format!(
                        "timestamp {k} steps after {last} is out of range"
                    ))
                })
        })
        .collect()
}
