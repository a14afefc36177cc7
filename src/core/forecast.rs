//! Forecast result structure for holding predictions.

use chrono::{DateTime, Utc};

/// Point predictions beyond the end of the observed series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forecast {
    /// Point predictions, one per step ahead.
    point: Vec<f64>,
    /// Timestamps of the predicted steps, when the source series had any.
    timestamps: Option<Vec<DateTime<Utc>>>,
}

impl Forecast {
    /// Create an empty forecast.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a forecast from point predictions.
    pub fn from_values(values: Vec<f64>) -> Self {
        Self {
            point: values,
            timestamps: None,
        }
    }

    /// Attach timestamps to the predictions.
    ///
    /// Timestamps whose count does not match the horizon are dropped.
    pub fn with_timestamps(mut self, timestamps: Vec<DateTime<Utc>>) -> Self {
        if timestamps.len() == self.point.len() {
            self.timestamps = Some(timestamps);
        }
        self
    }

    /// Get the forecast horizon (number of steps).
    pub fn horizon(&self) -> usize {
        self.point.len()
    }

    /// Check if forecast is empty.
    pub fn is_empty(&self) -> bool {
        self.point.is_empty()
    }

    /// Get the point predictions.
    pub fn primary(&self) -> &[f64] {
        &self.point
    }

    pub fn timestamps(&self) -> Option<&[DateTime<Utc>]> {
        self.timestamps.as_deref()
    }

    /// Consume the forecast and return the point predictions.
    pub fn into_values(self) -> Vec<f64> {
        self.point
    }
}
