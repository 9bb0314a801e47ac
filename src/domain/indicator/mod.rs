//! Technical indicator implementations.
//!
//! This module provides types for requesting and holding indicator output:
//! - `IndicatorType`: indicator identity + parameters (serves as HashMap key)
//! - `Line`: one named output series, aligned index-for-index with the bars
//! - `IndicatorSeries`: all lines produced by one indicator
//!
//! Leading positions without enough history are `f64::NAN`; the series are
//! never shortened.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod obv;
pub mod roc;
pub mod rsi;
pub mod sma;
pub mod stochastic;
pub mod vwap;
pub mod wma;

pub use adx::{calculate_adx, AdxOutput};
pub use atr::calculate_atr;
pub use bollinger::{calculate_bollinger, BollingerBands};
pub use ema::calculate_ema;
pub use macd::{calculate_macd, MacdOutput};
pub use obv::calculate_obv;
pub use roc::calculate_roc;
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;
pub use stochastic::{calculate_stochastic, StochasticOutput};
pub use vwap::calculate_vwap;
pub use wma::calculate_wma;

use crate::domain::error::{IndicatorError, TickerlensError};
use crate::domain::ohlcv::{closes, Bar};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Wma(usize),
    Rsi(usize),
    Roc(usize),
    Atr(usize),
    Adx(usize),
    Obv,
    Vwap,
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    Stochastic {
        period: usize,
        smooth_k: usize,
        smooth_d: usize,
    },
    /// The multiplier is held as its IEEE-754 bits so the type stays `Hash + Eq`.
    Bollinger {
        period: usize,
        multiplier_bits: u64,
    },
}

/// One named output series.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub label: &'static str,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub lines: Vec<Line>,
}

impl IndicatorSeries {
    fn single(indicator_type: IndicatorType, values: Vec<f64>) -> Self {
        Self {
            indicator_type,
            lines: vec![Line {
                label: "value",
                values,
            }],
        }
    }

    pub fn line(&self, label: &str) -> Option<&[f64]> {
        self.lines
            .iter()
            .find(|l| l.label == label)
            .map(|l| l.values.as_slice())
    }

    /// Number of positions in each line (equal to the input bar count).
    pub fn len(&self) -> usize {
        self.lines.first().map_or(0, |l| l.values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IndicatorType {
    pub fn bollinger(period: usize, multiplier: f64) -> Self {
        IndicatorType::Bollinger {
            period,
            multiplier_bits: multiplier.to_bits(),
        }
    }

    /// Band width multiplier, for Bollinger requests only.
    pub fn multiplier(&self) -> Option<f64> {
        match self {
            IndicatorType::Bollinger {
                multiplier_bits, ..
            } => Some(f64::from_bits(*multiplier_bits)),
            _ => None,
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Wma(period) => write!(f, "WMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Roc(period) => write!(f, "ROC({})", period),
            IndicatorType::Atr(period) => write!(f, "ATR({})", period),
            IndicatorType::Adx(period) => write!(f, "ADX({})", period),
            IndicatorType::Obv => write!(f, "OBV"),
            IndicatorType::Vwap => write!(f, "VWAP"),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
            IndicatorType::Stochastic {
                period,
                smooth_k,
                smooth_d,
            } => write!(f, "STOCH({},{},{})", period, smooth_k, smooth_d),
            IndicatorType::Bollinger {
                period,
                multiplier_bits,
            } => write!(f, "BOLLINGER({},{})", period, f64::from_bits(*multiplier_bits)),
        }
    }
}

impl FromStr for IndicatorType {
    type Err = TickerlensError;

    /// Parse `name[:p1[,p2[,p3]]]`, e.g. `sma:50`, `macd:12,26,9`, `bb:20,2.5`.
    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let unknown = |reason: String| TickerlensError::UnknownIndicator {
            spec: spec.to_string(),
            reason,
        };

        let trimmed = spec.trim();
        let (name, params) = match trimmed.split_once(':') {
            Some((n, p)) => (n.trim().to_lowercase(), p.trim()),
            None => (trimmed.to_lowercase(), ""),
        };
        let params: Vec<&str> = if params.is_empty() {
            Vec::new()
        } else {
            params.split(',').map(str::trim).collect()
        };

        let max_params = match name.as_str() {
            "obv" | "vwap" => 0,
            "sma" | "ema" | "wma" | "rsi" | "roc" | "atr" | "adx" => 1,
            "bollinger" | "bb" => 2,
            "macd" | "stoch" | "stochastic" => 3,
            _ => return Err(unknown("unrecognized indicator name".into())),
        };
        if params.len() > max_params {
            return Err(unknown(format!(
                "expected at most {} parameter(s), got {}",
                max_params,
                params.len()
            )));
        }

        let period = |idx: usize, default: usize| -> Result<usize, TickerlensError> {
            match params.get(idx) {
                None => Ok(default),
                Some(raw) => match raw.parse::<usize>() {
                    Ok(p) if p > 0 => Ok(p),
                    _ => Err(unknown(format!("invalid period '{}'", raw))),
                },
            }
        };

        Ok(match name.as_str() {
            "sma" => IndicatorType::Sma(period(0, 20)?),
            "ema" => IndicatorType::Ema(period(0, 20)?),
            "wma" => IndicatorType::Wma(period(0, 20)?),
            "rsi" => IndicatorType::Rsi(period(0, 14)?),
            "roc" => IndicatorType::Roc(period(0, 12)?),
            "atr" => IndicatorType::Atr(period(0, 14)?),
            "adx" => IndicatorType::Adx(period(0, 14)?),
            "obv" => IndicatorType::Obv,
            "vwap" => IndicatorType::Vwap,
            "macd" => IndicatorType::Macd {
                fast: period(0, macd::DEFAULT_FAST)?,
                slow: period(1, macd::DEFAULT_SLOW)?,
                signal: period(2, macd::DEFAULT_SIGNAL)?,
            },
            "stoch" | "stochastic" => IndicatorType::Stochastic {
                period: period(0, stochastic::DEFAULT_PERIOD)?,
                smooth_k: period(1, stochastic::DEFAULT_SMOOTH_K)?,
                smooth_d: period(2, stochastic::DEFAULT_SMOOTH_D)?,
            },
            _ => {
                let mult = match params.get(1) {
                    None => bollinger::DEFAULT_MULTIPLIER,
                    Some(raw) => match raw.parse::<f64>() {
                        Ok(m) if m.is_finite() && m > 0.0 => m,
                        _ => return Err(unknown(format!("invalid multiplier '{}'", raw))),
                    },
                };
                IndicatorType::bollinger(period(0, bollinger::DEFAULT_PERIOD)?, mult)
            }
        })
    }
}

/// Compute one indicator over `bars`.
pub fn compute(bars: &[Bar], indicator: &IndicatorType) -> Result<IndicatorSeries, IndicatorError> {
    let kind = indicator.clone();
    let series = match *indicator {
        IndicatorType::Sma(period) => IndicatorSeries::single(kind, calculate_sma(&closes(bars), period)?),
        IndicatorType::Ema(period) => IndicatorSeries::single(kind, calculate_ema(&closes(bars), period)?),
        IndicatorType::Wma(period) => IndicatorSeries::single(kind, calculate_wma(&closes(bars), period)?),
        IndicatorType::Rsi(period) => IndicatorSeries::single(kind, calculate_rsi(&closes(bars), period)?),
        IndicatorType::Roc(period) => IndicatorSeries::single(kind, calculate_roc(&closes(bars), period)?),
        IndicatorType::Atr(period) => IndicatorSeries::single(kind, calculate_atr(bars, period)?),
        IndicatorType::Obv => IndicatorSeries::single(kind, calculate_obv(bars)),
        IndicatorType::Vwap => IndicatorSeries::single(kind, calculate_vwap(bars)),
        IndicatorType::Adx(period) => {
            let out = calculate_adx(bars, period)?;
            IndicatorSeries {
                indicator_type: kind,
                lines: vec![
                    Line { label: "adx", values: out.adx },
                    Line { label: "plus_di", values: out.plus_di },
                    Line { label: "minus_di", values: out.minus_di },
                ],
            }
        }
        IndicatorType::Macd { fast, slow, signal } => {
            let out = calculate_macd(&closes(bars), fast, slow, signal)?;
            IndicatorSeries {
                indicator_type: kind,
                lines: vec![
                    Line { label: "macd", values: out.macd },
                    Line { label: "signal", values: out.signal },
                    Line { label: "histogram", values: out.histogram },
                ],
            }
        }
        IndicatorType::Stochastic {
            period,
            smooth_k,
            smooth_d,
        } => {
            let out = calculate_stochastic(bars, period, smooth_k, smooth_d)?;
            IndicatorSeries {
                indicator_type: kind,
                lines: vec![
                    Line { label: "k", values: out.k },
                    Line { label: "d", values: out.d },
                ],
            }
        }
        IndicatorType::Bollinger {
            period,
            multiplier_bits,
        } => {
            let out = calculate_bollinger(&closes(bars), period, f64::from_bits(multiplier_bits))?;
            IndicatorSeries {
                indicator_type: kind,
                lines: vec![
                    Line { label: "upper", values: out.upper },
                    Line { label: "middle", values: out.middle },
                    Line { label: "lower", values: out.lower },
                ],
            }
        }
    };
    Ok(series)
}

/// Compute each requested indicator independently; one failure does not
/// affect the others. Results are returned in request order.
pub fn compute_indicators(
    bars: &[Bar],
    indicators: &[IndicatorType],
) -> Vec<(IndicatorType, Result<IndicatorSeries, IndicatorError>)> {
    indicators
        .iter()
        .map(|ind| (ind.clone(), compute(bars, ind)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bars(prices: &[f64]) -> Vec<Bar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                timestamp: 1_704_067_200 + i as i64 * 86_400,
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1000,
            })
            .collect()
    }

    #[test]
    fn indicator_type_display_sma() {
        assert_eq!(IndicatorType::Sma(20).to_string(), "SMA(20)");
    }

    #[test]
    fn indicator_type_display_macd() {
        let macd = IndicatorType::Macd {
            fast: 12,
            slow: 26,
            signal: 9,
        };
        assert_eq!(macd.to_string(), "MACD(12,26,9)");
    }

    #[test]
    fn indicator_type_display_bollinger() {
        assert_eq!(IndicatorType::bollinger(20, 2.0).to_string(), "BOLLINGER(20,2)");
        assert_eq!(IndicatorType::bollinger(20, 2.5).to_string(), "BOLLINGER(20,2.5)");
    }

    #[test]
    fn indicator_type_hash_eq() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(IndicatorType::Sma(20), "sma20");
        map.insert(IndicatorType::Sma(50), "sma50");
        assert_eq!(map.get(&IndicatorType::Sma(20)), Some(&"sma20"));
        assert_eq!(map.get(&IndicatorType::Sma(50)), Some(&"sma50"));
        assert_eq!(map.get(&IndicatorType::Ema(20)), None);
    }

    #[test]
    fn parse_spec_with_defaults() {
        assert_eq!("sma".parse::<IndicatorType>().unwrap(), IndicatorType::Sma(20));
        assert_eq!("RSI".parse::<IndicatorType>().unwrap(), IndicatorType::Rsi(14));
        assert_eq!(
            "macd".parse::<IndicatorType>().unwrap(),
            IndicatorType::Macd {
                fast: 12,
                slow: 26,
                signal: 9
            }
        );
        assert_eq!(
            "stoch".parse::<IndicatorType>().unwrap(),
            IndicatorType::Stochastic {
                period: 14,
                smooth_k: 3,
                smooth_d: 3
            }
        );
        assert_eq!("vwap".parse::<IndicatorType>().unwrap(), IndicatorType::Vwap);
    }

    #[test]
    fn parse_spec_with_params() {
        assert_eq!("ema:50".parse::<IndicatorType>().unwrap(), IndicatorType::Ema(50));
        assert_eq!(
            " macd : 5, 35, 5 ".parse::<IndicatorType>().unwrap(),
            IndicatorType::Macd {
                fast: 5,
                slow: 35,
                signal: 5
            }
        );
        assert_eq!(
            "bb:10,1.5".parse::<IndicatorType>().unwrap(),
            IndicatorType::bollinger(10, 1.5)
        );
    }

    #[test]
    fn bollinger_multiplier_is_not_rounded() {
        let precise: IndicatorType = "bb:20,2.125".parse().unwrap();
        assert_eq!(precise.to_string(), "BOLLINGER(20,2.125)");
        assert_eq!(precise.multiplier(), Some(2.125));
        assert_ne!(precise, IndicatorType::bollinger(20, 2.13));

        let tiny: IndicatorType = "bb:20,0.004".parse().unwrap();
        assert_eq!(tiny.to_string(), "BOLLINGER(20,0.004)");
        assert_eq!(IndicatorType::Sma(20).multiplier(), None);
    }

    #[test]
    fn compute_bollinger_uses_exact_multiplier() {
        // alternating 1, 3: population stddev over an even window is 1
        let prices: Vec<f64> = (0..20).map(|i| if i % 2 == 0 { 1.0 } else { 3.0 }).collect();
        let bars = make_bars(&prices);
        for (spec, mult) in [("bb:4,2.125", 2.125), ("bb:4,0.004", 0.004)] {
            let series = compute(&bars, &spec.parse().unwrap()).unwrap();
            let upper = series.line("upper").unwrap();
            let middle = series.line("middle").unwrap();
            assert!((upper[19] - middle[19] - mult).abs() < 1e-12, "{spec}");
        }
    }

    #[test]
    fn parse_spec_rejects_bad_input() {
        assert!("foo:3".parse::<IndicatorType>().is_err());
        assert!("sma:0".parse::<IndicatorType>().is_err());
        assert!("sma:x".parse::<IndicatorType>().is_err());
        assert!("sma:5,6".parse::<IndicatorType>().is_err());
        assert!("obv:3".parse::<IndicatorType>().is_err());
        assert!("bollinger:20,-1".parse::<IndicatorType>().is_err());
    }

    #[test]
    fn compute_single_line() {
        let bars = make_bars(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let series = compute(&bars, &IndicatorType::Sma(3)).unwrap();
        assert_eq!(series.len(), 5);
        let values = series.line("value").unwrap();
        assert!(values[1].is_nan());
        assert_eq!(values[4], 4.0);
    }

    #[test]
    fn compute_multi_line_labels() {
        let bars = make_bars(&(0..40).map(|i| 100.0 + i as f64).collect::<Vec<_>>());
        let macd = compute(
            &bars,
            &IndicatorType::Macd {
                fast: 12,
                slow: 26,
                signal: 9,
            },
        )
        .unwrap();
        let labels: Vec<_> = macd.lines.iter().map(|l| l.label).collect();
        assert_eq!(labels, vec!["macd", "signal", "histogram"]);
        assert!(macd.lines.iter().all(|l| l.values.len() == 40));
    }

    #[test]
    fn compute_indicators_isolates_failures() {
        let bars = make_bars(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let results = compute_indicators(
            &bars,
            &[IndicatorType::Sma(3), IndicatorType::Sma(200), IndicatorType::Obv],
        );
        assert_eq!(results.len(), 3);
        assert!(results[0].1.is_ok());
        assert!(matches!(
            results[1].1,
            Err(IndicatorError::InsufficientData {
                required: 200,
                actual: 5,
                ..
            })
        ));
        assert!(results[2].1.is_ok());
    }
}
