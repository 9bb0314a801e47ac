//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seed with the SMA of the first n prices, then
//! EMA[i] = (P[i] - EMA[i-1]) * k + EMA[i-1].
//! Warmup: first (n-1) positions are NaN.

use crate::domain::error::IndicatorError;
use crate::domain::indicator::IndicatorType;
use crate::domain::indicator_helpers::{check_period, exponential_average, require_len};

pub fn calculate_ema(prices: &[f64], period: usize) -> Result<Vec<f64>, IndicatorError> {
    let kind = IndicatorType::Ema(period);
    check_period(&kind, "period", period)?;
    require_len(&kind, period, prices.len())?;
    Ok(exponential_average(prices, period))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ema_warmup() {
        let out = calculate_ema(&[10.0, 20.0, 30.0, 40.0, 50.0], 3).unwrap();
        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        assert!(out[2..].iter().all(|v| !v.is_nan()));
    }

    #[test]
    fn ema_seed_is_sma() {
        let out = calculate_ema(&[1.0, 2.0, 3.0, 4.0, 5.0], 3).unwrap();
        assert!((out[2] - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_recursive_calculation() {
        let out = calculate_ema(&[1.0, 2.0, 3.0, 4.0, 5.0], 3).unwrap();

        let k = 2.0 / 4.0;
        let ema_3 = (4.0 - 2.0) * k + 2.0;
        let ema_4 = (5.0 - ema_3) * k + ema_3;
        assert!((out[3] - ema_3).abs() < f64::EPSILON);
        assert!((out[4] - ema_4).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_period_1() {
        let out = calculate_ema(&[10.0, 20.0, 30.0], 1).unwrap();
        assert_eq!(out, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn ema_equal_prices() {
        let out = calculate_ema(&[100.0; 5], 3).unwrap();
        for v in &out[2..] {
            assert!((v - 100.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn ema_insufficient_data() {
        assert!(matches!(
            calculate_ema(&[10.0, 20.0], 5),
            Err(IndicatorError::InsufficientData {
                required: 5,
                actual: 2,
                ..
            })
        ));
    }

    #[test]
    fn ema_period_0() {
        assert!(calculate_ema(&[10.0, 20.0], 0).is_err());
    }
}
