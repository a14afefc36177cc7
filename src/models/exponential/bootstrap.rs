//! Initial state estimators for multiplicative Holt-Winters.
//!
//! These compute the level, trend and seasonal indices the seasonal
//! recurrence starts from. Every estimator needs at least two full seasons
//! of data and returns an error otherwise.

use crate::error::{ForecastError, Result};

/// Check that `n` observations cover two full seasons of `period`.
pub(crate) fn check_seasons(n: usize, period: usize) -> Result<()> {
    if n == 0 {
        return Err(ForecastError::EmptyData);
    }
    if period == 0 {
        return Err(ForecastError::InvalidParameter(
            "seasonal period must be positive".to_string(),
        ));
    }
    if n / 2 < period {
        return Err(ForecastError::InsufficientData {
            needed: period.saturating_mul(2),
            got: n,
        });
    }
    Ok(())
}

/// Initial level: the first observation.
///
/// `period` is accepted for symmetry with the other estimators and only
/// takes part in the length check.
pub fn initial_level(values: &[f64], period: usize) -> Result<f64> {
    check_seasons(values.len(), period)?;
    Ok(values[0])
}

/// Initial trend from the first two seasons.
///
/// Sums the season-over-season differences `values[period + j] - values[j]`
/// and divides by `period²`, which is the mean per-step slope across the
/// first two seasons.
///
/// Open question: the divisor reads as a damped `period`-divisor in some
/// descriptions of the method. It is kept as `period²`; changing it shifts
/// every downstream value.
pub fn initial_trend(values: &[f64], period: usize) -> Result<f64> {
    check_seasons(values.len(), period)?;
    let sum: f64 = (0..period).map(|j| values[period + j] - values[j]).sum();
    let p = period as f64;
    Ok(sum / (p * p))
}

/// Initial multiplicative seasonal indices by the ratio-to-season-mean method.
///
/// Each observation of the first `seasons` complete seasons is divided by the
/// mean of its own season; the index for position `p` is the average of
/// those ratios at `p` across seasons. A season whose mean is zero yields
/// non-finite indices.
pub fn seasonal_indices(values: &[f64], period: usize, seasons: usize) -> Result<Vec<f64>> {
    check_seasons(values.len(), period)?;
    if seasons == 0 {
        return Err(ForecastError::InvalidParameter(
            "at least one season is required".to_string(),
        ));
    }
    match seasons.checked_mul(period) {
        Some(covered) if covered <= values.len() => {}
        covered => {
            return Err(ForecastError::InsufficientData {
                needed: covered.unwrap_or(usize::MAX),
                got: values.len(),
            })
        }
    }

    let season_means: Vec<f64> = (0..seasons)
        .map(|s| values[s * period..(s + 1) * period].iter().sum::<f64>() / period as f64)
        .collect();

    Ok((0..period)
        .map(|p| {
            let total: f64 = season_means
                .iter()
                .enumerate()
                .map(|(s, mean)| values[s * period + p] / mean)
                .sum();
            total / seasons as f64
        })
        .collect())
}
