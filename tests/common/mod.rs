#![allow(dead_code)]

use std::collections::HashMap;
use tickerlens::domain::error::TickerlensError;
pub use tickerlens::domain::ohlcv::Bar;
pub use tickerlens::domain::quote::Quote;
use tickerlens::ports::data_port::DataPort;

/// 2024-01-15 00:00:00 UTC
pub const BASE_TS: i64 = 1_705_276_800;
pub const DAY: i64 = 86_400;

pub struct MockDataPort {
    pub bars: HashMap<String, Vec<Bar>>,
    pub quotes: Vec<Quote>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            bars: HashMap::new(),
            quotes: Vec::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<Bar>) -> Self {
        self.bars.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_quote(mut self, quote: Quote) -> Self {
        self.quotes.push(quote);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(&self, symbol: &str) -> Result<Vec<Bar>, TickerlensError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(TickerlensError::Data {
                reason: reason.clone(),
            });
        }
        match self.bars.get(symbol) {
            Some(bars) if !bars.is_empty() => Ok(bars.clone()),
            _ => Err(TickerlensError::NoData {
                symbol: symbol.to_string(),
            }),
        }
    }

    fn fetch_quotes(&self, symbols: &[String]) -> Result<Vec<Quote>, TickerlensError> {
        if symbols.is_empty() {
            return Ok(self.quotes.clone());
        }
        Ok(symbols
            .iter()
            .filter_map(|s| self.quotes.iter().find(|q| &q.symbol == s).cloned())
            .collect())
    }

    fn list_symbols(&self) -> Result<Vec<String>, TickerlensError> {
        let mut symbols: Vec<String> = self.bars.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

/// Bar at day `i` after [`BASE_TS`] with a one-point range around `close`.
pub fn make_bar(i: usize, close: f64) -> Bar {
    Bar {
        timestamp: BASE_TS + i as i64 * DAY,
        open: close,
        high: close + 1.0,
        low: close - 1.0,
        close,
        volume: 1_000,
    }
}

pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| make_bar(i, c))
        .collect()
}

/// Linear ramp of `n` closes starting at `start`.
pub fn ramp(n: usize, start: f64, step: f64) -> Vec<f64> {
    (0..n).map(|i| start + i as f64 * step).collect()
}

pub fn make_quote(symbol: &str, price: f64) -> Quote {
    Quote {
        symbol: symbol.to_string(),
        price,
        previous_close: price,
        open: price,
        high: price,
        low: price,
        volume: 1_000_000,
        average_volume: 1_000_000,
        fifty_two_week_high: price,
        fifty_two_week_low: price,
        ..Quote::default()
    }
}

/// A small universe with a mix of present and absent ratios.
pub fn sample_quotes() -> Vec<Quote> {
    vec![
        Quote {
            pe_ratio: Some(29.4),
            dividend_yield: Some(0.5),
            market_cap: 2.9e12,
            change_percent: 0.64,
            ..make_quote("AAPL", 189.5)
        },
        Quote {
            pe_ratio: None,
            forward_pe: Some(60.2),
            market_cap: 8.0e11,
            change_percent: -1.96,
            ..make_quote("TSLA", 250.0)
        },
        Quote {
            pe_ratio: Some(24.1),
            dividend_yield: Some(3.1),
            market_cap: 2.6e11,
            change_percent: 0.2,
            ..make_quote("KO", 60.0)
        },
        Quote {
            pe_ratio: Some(11.8),
            dividend_yield: Some(2.4),
            market_cap: 4.9e11,
            change_percent: -0.4,
            ..make_quote("JPM", 172.3)
        },
    ]
}
