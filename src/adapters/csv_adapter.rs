//! CSV file data adapter.
//!
//! Layout under the base directory:
//! - `<SYMBOL>.csv`: `date,open,high,low,close,volume`, date as `YYYY-MM-DD`
//!   or integer epoch seconds
//! - `quotes.csv`: one quote per row, camelCase headers matching [`Quote`]

use crate::domain::error::TickerlensError;
use crate::domain::ohlcv::Bar;
use crate::domain::quote::Quote;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, warn};

pub const QUOTES_FILE: &str = "quotes.csv";

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn bars_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol.to_uppercase()))
    }

    fn read(&self, path: &PathBuf) -> Result<String, TickerlensError> {
        fs::read_to_string(path).map_err(|e| TickerlensError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })
    }
}

fn column<T: FromStr>(record: &csv::StringRecord, idx: usize, name: &str) -> Result<T, TickerlensError>
where
    T::Err: std::fmt::Display,
{
    let raw = record.get(idx).ok_or_else(|| TickerlensError::Data {
        reason: format!("missing {} column", name),
    })?;
    raw.trim().parse().map_err(|e| TickerlensError::Data {
        reason: format!("invalid {} value '{}': {}", name, raw, e),
    })
}

/// Epoch seconds from either an integer or a `YYYY-MM-DD` date (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Result<i64, TickerlensError> {
    let raw = raw.trim();
    if let Ok(ts) = raw.parse::<i64>() {
        return Ok(ts);
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| TickerlensError::Data {
        reason: format!("invalid date '{}': {}", raw, e),
    })?;
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .ok_or_else(|| TickerlensError::Data {
            reason: format!("invalid date '{}'", raw),
        })
}

impl DataPort for CsvAdapter {
    fn fetch_bars(&self, symbol: &str) -> Result<Vec<Bar>, TickerlensError> {
        let path = self.bars_path(symbol);
        let content = self.read(&path)?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| TickerlensError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            let date = record.get(0).ok_or_else(|| TickerlensError::Data {
                reason: "missing date column".into(),
            })?;

            bars.push(Bar {
                timestamp: parse_timestamp(date)?,
                open: column(&record, 1, "open")?,
                high: column(&record, 2, "high")?,
                low: column(&record, 3, "low")?,
                close: column(&record, 4, "close")?,
                volume: column(&record, 5, "volume")?,
            });
        }

        if bars.is_empty() {
            return Err(TickerlensError::NoData {
                symbol: symbol.to_uppercase(),
            });
        }

        bars.sort_by_key(|b| b.timestamp);
        let before = bars.len();
        bars.dedup_by_key(|b| b.timestamp);
        if bars.len() != before {
            warn!(symbol, dropped = before - bars.len(), "duplicate timestamps dropped");
        }
        debug!(symbol, bars = bars.len(), "loaded bars");
        Ok(bars)
    }

    fn fetch_quotes(&self, symbols: &[String]) -> Result<Vec<Quote>, TickerlensError> {
        let path = self.base_path.join(QUOTES_FILE);
        let content = self.read(&path)?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut quotes = Vec::new();
        for result in rdr.deserialize::<Quote>() {
            let quote = result.map_err(|e| TickerlensError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;
            quotes.push(quote);
        }

        if symbols.is_empty() {
            debug!(quotes = quotes.len(), "loaded all quotes");
            return Ok(quotes);
        }

        // Requested order, skipping symbols with no quote row.
        let mut selected = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            match quotes.iter().find(|q| q.symbol.eq_ignore_ascii_case(symbol)) {
                Some(q) => selected.push(q.clone()),
                None => warn!(symbol = %symbol, "no quote found"),
            }
        }
        Ok(selected)
    }

    fn list_symbols(&self) -> Result<Vec<String>, TickerlensError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| TickerlensError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| TickerlensError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if name_str == QUOTES_FILE {
                continue;
            }
            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
