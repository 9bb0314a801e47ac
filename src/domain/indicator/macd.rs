//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of the defined part of the MACD line
//! Histogram = MACD Line - Signal Line
//!
//! Default parameters: fast=12, slow=26, signal=9
//! Warmup: MACD line from max(fast, slow) - 1, signal and histogram
//! a further signal - 1 positions later.

use crate::domain::error::IndicatorError;
use crate::domain::indicator::IndicatorType;
use crate::domain::indicator_helpers::{
    check_period, difference, exponential_average, require_len, smooth_defined_suffix,
};

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdOutput {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

pub fn calculate_macd(
    prices: &[f64],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> Result<MacdOutput, IndicatorError> {
    let kind = IndicatorType::Macd {
        fast,
        slow,
        signal: signal_period,
    };
    check_period(&kind, "fast period", fast)?;
    check_period(&kind, "slow period", slow)?;
    check_period(&kind, "signal period", signal_period)?;
    require_len(&kind, fast.max(slow), prices.len())?;

    let ema_fast = exponential_average(prices, fast);
    let ema_slow = exponential_average(prices, slow);
    let macd = difference(&ema_fast, &ema_slow);
    let signal = smooth_defined_suffix(&macd, signal_period, exponential_average);
    let histogram = difference(&macd, &signal);

    Ok(MacdOutput {
        macd,
        signal,
        histogram,
    })
}

pub fn calculate_macd_default(prices: &[f64]) -> Result<MacdOutput, IndicatorError> {
    calculate_macd(prices, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}
