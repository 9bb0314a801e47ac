//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! StdDev is the population standard deviation, sqrt(mean(x²) - mean(x)²).
//!
//! Default parameters: period=20, multiplier=2.0
//! Warmup: first (period-1) positions are NaN.

use crate::domain::error::IndicatorError;
use crate::domain::indicator::IndicatorType;
use crate::domain::indicator_helpers::{check_period, nan_series, require_len};

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_MULTIPLIER: f64 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

pub fn calculate_bollinger(
    prices: &[f64],
    period: usize,
    multiplier: f64,
) -> Result<BollingerBands, IndicatorError> {
    let kind = IndicatorType::bollinger(period, multiplier);
    check_period(&kind, "period", period)?;
    require_len(&kind, period, prices.len())?;

    let mut bands = BollingerBands {
        upper: nan_series(prices.len()),
        middle: nan_series(prices.len()),
        lower: nan_series(prices.len()),
    };

    for i in (period - 1)..prices.len() {
        let window = &prices[i + 1 - period..=i];
        let mean = window.iter().sum::<f64>() / period as f64;
        let mean_sq = window.iter().map(|p| p * p).sum::<f64>() / period as f64;
        // Rounding can push a flat window's variance slightly below zero.
        let stddev = (mean_sq - mean * mean).max(0.0).sqrt();

        bands.middle[i] = mean;
        bands.upper[i] = mean + multiplier * stddev;
        bands.lower[i] = mean - multiplier * stddev;
    }

    Ok(bands)
}
