//! ROC (Rate of Change) indicator.
//!
//! ROC(n)[i] = (P[i] - P[i-n]) / P[i-n] * 100
//! Warmup: first n positions are NaN. A zero base price yields NaN.

use crate::domain::error::IndicatorError;
use crate::domain::indicator::IndicatorType;
use crate::domain::indicator_helpers::{check_period, nan_series, require_len};

pub const DEFAULT_PERIOD: usize = 12;

pub fn calculate_roc(prices: &[f64], period: usize) -> Result<Vec<f64>, IndicatorError> {
    let kind = IndicatorType::Roc(period);
    check_period(&kind, "period", period)?;
    require_len(&kind, period + 1, prices.len())?;

    let mut values = nan_series(prices.len());
    for i in period..prices.len() {
        let base = prices[i - period];
        if base != 0.0 {
            values[i] = (prices[i] - base) / base * 100.0;
        }
    }
    Ok(values)
}
