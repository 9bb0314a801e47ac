//! ADX (Average Directional Index).
//!
//! From consecutive bars: TR, +DM = up move when it beats the down move,
//! -DM = down move when it beats the up move. TR, +DM and -DM are
//! EMA-smoothed over n, giving +DI = 100 * +DM / TR and -DI likewise.
//! DX = |+DI - -DI| / (+DI + -DI) * 100 (0 when both are 0); ADX = EMA(DX, n).
//!
//! Warmup: the smoothed TR/DM seed covers the first n moves, so DI lines
//! start at index n + 1 (one smoothing step past the seed) and ADX at 2n.

use crate::domain::error::IndicatorError;
use crate::domain::indicator::IndicatorType;
use crate::domain::indicator_helpers::{
    check_period, exponential_average, nan_series, require_len, smooth_defined_suffix,
};
use crate::domain::ohlcv::Bar;

pub const DEFAULT_PERIOD: usize = 14;

#[derive(Debug, Clone, PartialEq)]
pub struct AdxOutput {
    pub adx: Vec<f64>,
    pub plus_di: Vec<f64>,
    pub minus_di: Vec<f64>,
}

fn ratio_pct(num: f64, den: f64) -> f64 {
    if den == 0.0 { 0.0 } else { num / den * 100.0 }
}

pub fn calculate_adx(bars: &[Bar], period: usize) -> Result<AdxOutput, IndicatorError> {
    let kind = IndicatorType::Adx(period);
    check_period(&kind, "period", period)?;
    require_len(&kind, 2 * period + 1, bars.len())?;

    let n = bars.len();
    let mut tr = nan_series(n);
    let mut plus_dm = nan_series(n);
    let mut minus_dm = nan_series(n);

    for i in 1..n {
        let (prev, bar) = (&bars[i - 1], &bars[i]);
        let up = bar.high - prev.high;
        let down = prev.low - bar.low;
        tr[i] = bar.true_range(prev.close);
        plus_dm[i] = if up > down && up > 0.0 { up } else { 0.0 };
        minus_dm[i] = if down > up && down > 0.0 { down } else { 0.0 };
    }

    let tr_s = smooth_defined_suffix(&tr, period, exponential_average);
    let plus_s = smooth_defined_suffix(&plus_dm, period, exponential_average);
    let minus_s = smooth_defined_suffix(&minus_dm, period, exponential_average);

    let mut plus_di = nan_series(n);
    let mut minus_di = nan_series(n);
    let mut dx = nan_series(n);
    for i in (period + 1)..n {
        if tr_s[i].is_nan() {
            continue;
        }
        plus_di[i] = ratio_pct(plus_s[i], tr_s[i]);
        minus_di[i] = ratio_pct(minus_s[i], tr_s[i]);
        dx[i] = ratio_pct((plus_di[i] - minus_di[i]).abs(), plus_di[i] + minus_di[i]);
    }

    let adx = smooth_defined_suffix(&dx, period, exponential_average);
    Ok(AdxOutput {
        adx,
        plus_di,
        minus_di,
    })
}
