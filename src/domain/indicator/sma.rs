//! Simple Moving Average.
//!
//! SMA(n)[i] = mean(P[i-n+1..=i]). Warmup: first (n-1) positions are NaN.

use crate::domain::error::IndicatorError;
use crate::domain::indicator::IndicatorType;
use crate::domain::indicator_helpers::{check_period, require_len, rolling_mean};

pub fn calculate_sma(prices: &[f64], period: usize) -> Result<Vec<f64>, IndicatorError> {
    let kind = IndicatorType::Sma(period);
    check_period(&kind, "period", period)?;
    require_len(&kind, period, prices.len())?;
    Ok(rolling_mean(prices, period))
}
