//! Stochastic oscillator.
//!
//! raw %K[i] = (C[i] - LL(n)) / (HH(n) - LL(n)) * 100, 50 when HH == LL
//! %K = SMA(raw %K, smooth_k), %D = SMA(%K, smooth_d)

use crate::domain::error::IndicatorError;
use crate::domain::indicator::IndicatorType;
use crate::domain::indicator_helpers::{
    check_period, nan_series, require_len, rolling_mean, smooth_defined_suffix,
};
use crate::domain::ohlcv::Bar;

pub const DEFAULT_PERIOD: usize = 14;
pub const DEFAULT_SMOOTH_K: usize = 3;
pub const DEFAULT_SMOOTH_D: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct StochasticOutput {
    pub k: Vec<f64>,
    pub d: Vec<f64>,
}

fn raw_k(bars: &[Bar], period: usize) -> Vec<f64> {
    let mut values = nan_series(bars.len());
    for i in (period - 1)..bars.len() {
        let window = &bars[i + 1 - period..=i];
        let highest = window.iter().map(|b| b.high).fold(f64::MIN, f64::max);
        let lowest = window.iter().map(|b| b.low).fold(f64::MAX, f64::min);
        let range = highest - lowest;
        values[i] = if range == 0.0 {
            50.0
        } else {
            (bars[i].close - lowest) / range * 100.0
        };
    }
    values
}

pub fn calculate_stochastic(
    bars: &[Bar],
    period: usize,
    smooth_k: usize,
    smooth_d: usize,
) -> Result<StochasticOutput, IndicatorError> {
    let kind = IndicatorType::Stochastic {
        period,
        smooth_k,
        smooth_d,
    };
    check_period(&kind, "period", period)?;
    check_period(&kind, "%K smoothing", smooth_k)?;
    check_period(&kind, "%D smoothing", smooth_d)?;
    require_len(&kind, period, bars.len())?;

    let k = smooth_defined_suffix(&raw_k(bars, period), smooth_k, rolling_mean);
    let d = smooth_defined_suffix(&k, smooth_d, rolling_mean);
    Ok(StochasticOutput { k, d })
}
