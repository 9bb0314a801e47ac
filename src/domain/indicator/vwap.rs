//! VWAP (Volume Weighted Average Price), cumulative over the whole series.
//!
//! VWAP[i] = sum(TP[0..=i] * V[0..=i]) / sum(V[0..=i]), TP = (H + L + C) / 3.
//! While cumulative volume is still zero the typical price is used, so every
//! position is defined.

use crate::domain::ohlcv::Bar;

pub fn calculate_vwap(bars: &[Bar]) -> Vec<f64> {
    let mut cum_pv = 0.0;
    let mut cum_volume = 0.0;

    bars.iter()
        .map(|bar| {
            let tp = bar.typical_price();
            let volume = bar.volume as f64;
            cum_pv += tp * volume;
            cum_volume += volume;
            if cum_volume == 0.0 { tp } else { cum_pv / cum_volume }
        })
        .collect()
}
