//! Shared numeric helpers for indicator calculations.
//!
//! Every helper returns a series aligned index-for-index with its input.
//! Positions without enough history hold `f64::NAN`.

use crate::domain::error::IndicatorError;
use crate::domain::indicator::IndicatorType;

/// Reject a zero period before any window arithmetic.
pub fn check_period(
    indicator: &IndicatorType,
    name: &str,
    period: usize,
) -> Result<(), IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::InvalidParameter {
            indicator: indicator.to_string(),
            reason: format!("{name} must be at least 1"),
        });
    }
    Ok(())
}

/// Whole-series precondition: `actual` must be at least `required`.
pub fn require_len(
    indicator: &IndicatorType,
    required: usize,
    actual: usize,
) -> Result<(), IndicatorError> {
    if actual < required {
        return Err(IndicatorError::InsufficientData {
            indicator: indicator.to_string(),
            required,
            actual,
        });
    }
    Ok(())
}

pub fn nan_series(len: usize) -> Vec<f64> {
    vec![f64::NAN; len]
}

/// EMA multiplier 2/(n+1).
pub fn smoothing_multiplier(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

/// Trailing-window mean using a running sum. NaN before index `period - 1`.
pub fn rolling_mean(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = nan_series(values.len());
    if period == 0 || values.len() < period {
        return out;
    }

    let mut window_sum = 0.0;
    for (i, &v) in values.iter().enumerate() {
        window_sum += v;
        if i >= period {
            window_sum -= values[i - period];
        }
        if i + 1 >= period {
            out[i] = window_sum / period as f64;
        }
    }
    out
}

/// EMA seeded with the SMA of the first `period` values.
pub fn exponential_average(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = nan_series(values.len());
    if period == 0 || values.len() < period {
        return out;
    }

    let k = smoothing_multiplier(period);
    let mut ema = values[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = ema;
    for i in period..values.len() {
        ema = (values[i] - ema) * k + ema;
        out[i] = ema;
    }
    out
}

/// Start of the trailing run of non-NaN values, or `values.len()` if the
/// last value is NaN.
pub fn defined_suffix_start(values: &[f64]) -> usize {
    values
        .iter()
        .rposition(|v| v.is_nan())
        .map_or(0, |i| i + 1)
}

/// Apply `smooth` to the contiguous non-NaN suffix of `values` and map the
/// result back to the original positions. A suffix shorter than `period`
/// yields an all-NaN series.
pub fn smooth_defined_suffix(
    values: &[f64],
    period: usize,
    smooth: fn(&[f64], usize) -> Vec<f64>,
) -> Vec<f64> {
    let mut out = nan_series(values.len());
    let start = defined_suffix_start(values);
    let suffix = &values[start..];
    if period == 0 || suffix.len() < period {
        return out;
    }
    for (offset, v) in smooth(suffix, period).into_iter().enumerate() {
        out[start + offset] = v;
    }
    out
}

/// Index-wise `a - b`; NaN wherever either side is NaN.
pub fn difference(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter().zip(b).map(|(x, y)| x - y).collect()
}
