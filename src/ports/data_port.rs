//! Market data access port trait.

use crate::domain::error::TickerlensError;
use crate::domain::ohlcv::Bar;
use crate::domain::quote::Quote;

pub trait DataPort {
    /// Bars for `symbol`, ascending by timestamp.
    fn fetch_bars(&self, symbol: &str) -> Result<Vec<Bar>, TickerlensError>;

    /// Quotes for `symbols`, or every available quote when `symbols` is empty.
    fn fetch_quotes(&self, symbols: &[String]) -> Result<Vec<Quote>, TickerlensError>;

    fn list_symbols(&self) -> Result<Vec<String>, TickerlensError>;
}
