//! Weighted Moving Average indicator.
//!
//! O(n) sliding window implementation.
//! WMA(n) = (1*P[i-n+1] + 2*P[i-n+2] + ... + n*P[i]) / (n*(n+1)/2)
//! Warmup: first (n-1) positions are NaN.

use crate::domain::error::IndicatorError;
use crate::domain::indicator::IndicatorType;
use crate::domain::indicator_helpers::{check_period, nan_series, require_len};

pub fn calculate_wma(prices: &[f64], period: usize) -> Result<Vec<f64>, IndicatorError> {
    let kind = IndicatorType::Wma(period);
    check_period(&kind, "period", period)?;
    require_len(&kind, period, prices.len())?;

    let mut values = nan_series(prices.len());
    let divisor = (period * (period + 1)) as f64 / 2.0;
    let mut weighted_sum: f64 = 0.0;
    let mut window_sum: f64 = 0.0;

    for (i, &price) in prices.iter().enumerate() {
        if i < period {
            weighted_sum += (i + 1) as f64 * price;
            window_sum += price;
        } else {
            // Every weight drops by one, the new price enters with weight n.
            weighted_sum += period as f64 * price - window_sum;
            window_sum += price - prices[i - period];
        }

        if i + 1 >= period {
            values[i] = weighted_sum / divisor;
        }
    }

    Ok(values)
}
