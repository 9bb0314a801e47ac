//! Average True Range.
//!
//! TR[0] = high - low, TR[i] = max(H-L, |H-C[i-1]|, |L-C[i-1]|); ATR = EMA(TR, n).

use crate::domain::error::IndicatorError;
use crate::domain::indicator::IndicatorType;
use crate::domain::indicator_helpers::{check_period, exponential_average, require_len};
use crate::domain::ohlcv::Bar;

pub const DEFAULT_PERIOD: usize = 14;

/// Per-bar true range. The first bar has no previous close.
pub fn true_ranges(bars: &[Bar]) -> Vec<f64> {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            if i == 0 {
                bar.high - bar.low
            } else {
                bar.true_range(bars[i - 1].close)
            }
        })
        .collect()
}

pub fn calculate_atr(bars: &[Bar], period: usize) -> Result<Vec<f64>, IndicatorError> {
    let kind = IndicatorType::Atr(period);
    check_period(&kind, "period", period)?;
    require_len(&kind, period, bars.len())?;
    Ok(exponential_average(&true_ranges(bars), period))
}
