//! RSI (Relative Strength Index) indicator implementation.
//!
//! Uses Wilder's smoothing for average gain/loss calculation:
//! - First average: simple mean of gains/losses over the first n price changes
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: positions 0..=n are NaN. The seed averages the first n price
//! changes and the first emitted value at index n+1 already carries one
//! smoothing step, so at least n+2 prices are required.

use crate::domain::error::IndicatorError;
use crate::domain::indicator::IndicatorType;
use crate::domain::indicator_helpers::{check_period, nan_series, require_len};

pub const DEFAULT_PERIOD: usize = 14;

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}

pub fn calculate_rsi(prices: &[f64], period: usize) -> Result<Vec<f64>, IndicatorError> {
    let kind = IndicatorType::Rsi(period);
    check_period(&kind, "period", period)?;
    require_len(&kind, period + 2, prices.len())?;

    let mut values = nan_series(prices.len());

    // gains[j]/losses[j] describe the move from prices[j] to prices[j + 1]
    let (gains, losses): (Vec<f64>, Vec<f64>) = prices
        .windows(2)
        .map(|w| {
            let change = w[1] - w[0];
            (change.max(0.0), (-change).max(0.0))
        })
        .unzip();

    let mut avg_gain = gains[..period].iter().sum::<f64>() / period as f64;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / period as f64;

    for i in (period + 1)..prices.len() {
        avg_gain = (avg_gain * (period - 1) as f64 + gains[i - 1]) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + losses[i - 1]) / period as f64;
        values[i] = rsi_value(avg_gain, avg_loss);
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rsi_warmup_period() {
        let prices: Vec<f64> = (1..=16).map(|i| 100.0 + (i as f64 % 5.0) * 2.0).collect();
        let out = calculate_rsi(&prices, 14).unwrap();

        assert_eq!(out.len(), 16);
        for (i, v) in out.iter().enumerate().take(15) {
            assert!(v.is_nan(), "position {} should be NaN", i);
        }
        assert!(!out[15].is_nan());
    }

    #[test]
    fn rsi_first_value_after_period_plus_one() {
        let prices: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let out = calculate_rsi(&prices, 14).unwrap();
        let leading_nan = out.iter().take_while(|v| v.is_nan()).count();
        assert_eq!(leading_nan, 15);
    }

    #[test]
    fn rsi_all_gains_no_losses() {
        let prices: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let out = calculate_rsi(&prices, 14).unwrap();
        for v in out.iter().filter(|v| !v.is_nan()) {
            assert!((v - 100.0).abs() < f64::EPSILON, "RSI should be 100 when all gains");
        }
        assert_eq!(out.iter().filter(|v| !v.is_nan()).count(), 15);
    }

    #[test]
    fn rsi_all_losses_no_gains() {
        let prices: Vec<f64> = (0..16).map(|i| 100.0 - i as f64).collect();
        let out = calculate_rsi(&prices, 14).unwrap();
        assert!(out[15].abs() < f64::EPSILON, "RSI should be 0 when all losses");
    }

    #[test]
    fn rsi_flat_prices_use_zero_loss_convention() {
        let out = calculate_rsi(&[50.0; 6], 3).unwrap();
        assert!(out[..4].iter().all(|v| v.is_nan()));
        assert!(out[4..].iter().all(|v| (*v - 100.0).abs() < f64::EPSILON));
    }

    #[test]
    fn rsi_in_range() {
        let prices: Vec<f64> = (1..=40)
            .map(|i| 100.0 + (i as f64 % 7.0 - 3.0) * 2.0)
            .collect();
        let out = calculate_rsi(&prices, 14).unwrap();
        for v in out.iter().filter(|v| !v.is_nan()) {
            assert!((0.0..=100.0).contains(v), "RSI {} out of range", v);
        }
    }

    #[test]
    fn rsi_wilder_smoothing_step() {
        // changes: +2, -1, +1, -2, +3
        let prices = [10.0, 12.0, 11.0, 12.0, 10.0, 13.0];
        let out = calculate_rsi(&prices, 3).unwrap();
        assert!(out[3].is_nan());

        let (g0, l0) = (3.0 / 3.0, 1.0 / 3.0);
        let g1 = (g0 * 2.0 + 0.0) / 3.0;
        let l1 = (l0 * 2.0 + 2.0) / 3.0;
        assert_relative_eq!(out[4], 100.0 - 100.0 / (1.0 + g1 / l1), epsilon = 1e-9);

        let g2 = (g1 * 2.0 + 3.0) / 3.0;
        let l2 = (l1 * 2.0 + 0.0) / 3.0;
        assert_relative_eq!(out[5], 100.0 - 100.0 / (1.0 + g2 / l2), epsilon = 1e-9);
    }

    #[test]
    fn rsi_insufficient_data() {
        let err = calculate_rsi(&[1.0; 15], 14).unwrap_err();
        assert_eq!(
            err,
            IndicatorError::InsufficientData {
                indicator: "RSI(14)".into(),
                required: 16,
                actual: 15,
            }
        );
    }

    #[test]
    fn rsi_zero_period() {
        assert!(calculate_rsi(&[1.0, 2.0], 0).is_err());
    }
}
