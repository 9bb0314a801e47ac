//! Filter field names and their resolution against a [`Quote`].
//!
//! Names are matched case-insensitively. Unknown names resolve to `None`
//! like any absent value, so a filter over an unknown field matches nothing
//! instead of failing.

use crate::domain::quote::Quote;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Price,
    Change,
    ChangePercent,
    Open,
    High,
    Low,
    PreviousClose,
    Volume,
    AverageVolume,
    MarketCap,
    Pe,
    ForwardPe,
    PriceToBook,
    Eps,
    DividendYield,
    FiftyTwoWeekHigh,
    FiftyTwoWeekLow,
    FiftyTwoWeekChangePercent,
}

impl Field {
    pub const ALL: [Field; 18] = [
        Field::Price,
        Field::Change,
        Field::ChangePercent,
        Field::Open,
        Field::High,
        Field::Low,
        Field::PreviousClose,
        Field::Volume,
        Field::AverageVolume,
        Field::MarketCap,
        Field::Pe,
        Field::ForwardPe,
        Field::PriceToBook,
        Field::Eps,
        Field::DividendYield,
        Field::FiftyTwoWeekHigh,
        Field::FiftyTwoWeekLow,
        Field::FiftyTwoWeekChangePercent,
    ];

    /// Look up a field by name or alias.
    pub fn from_name(name: &str) -> Option<Field> {
        let field = match name.to_ascii_lowercase().as_str() {
            "price" | "p" => Field::Price,
            "change" => Field::Change,
            "changepercent" | "changepct" | "change%" => Field::ChangePercent,
            "open" => Field::Open,
            "high" => Field::High,
            "low" => Field::Low,
            "prevclose" | "previousclose" => Field::PreviousClose,
            "volume" | "vol" => Field::Volume,
            "avgvolume" | "averagevolume" | "avgvol" => Field::AverageVolume,
            "marketcap" | "mcap" => Field::MarketCap,
            "pe" => Field::Pe,
            "forwardpe" | "fpe" => Field::ForwardPe,
            "pb" | "pricetobook" => Field::PriceToBook,
            "eps" => Field::Eps,
            "yield" | "dividendyield" | "dy" => Field::DividendYield,
            "52whigh" | "fiftytwoweekhigh" => Field::FiftyTwoWeekHigh,
            "52wlow" | "fiftytwoweeklow" => Field::FiftyTwoWeekLow,
            "52wchange%" | "52wchangepct" | "fiftytwoweekchangepct" => {
                Field::FiftyTwoWeekChangePercent
            }
            _ => return None,
        };
        Some(field)
    }

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Field::Price => "price",
            Field::Change => "change",
            Field::ChangePercent => "changepercent",
            Field::Open => "open",
            Field::High => "high",
            Field::Low => "low",
            Field::PreviousClose => "prevclose",
            Field::Volume => "volume",
            Field::AverageVolume => "avgvolume",
            Field::MarketCap => "marketcap",
            Field::Pe => "pe",
            Field::ForwardPe => "forwardpe",
            Field::PriceToBook => "pb",
            Field::Eps => "eps",
            Field::DividendYield => "yield",
            Field::FiftyTwoWeekHigh => "52whigh",
            Field::FiftyTwoWeekLow => "52wlow",
            Field::FiftyTwoWeekChangePercent => "52wchange%",
        }
    }

    /// Value of this field in `quote`, `None` when not available.
    pub fn value(self, quote: &Quote) -> Option<f64> {
        match self {
            Field::Price => Some(quote.price),
            Field::Change => Some(quote.change),
            Field::ChangePercent => Some(quote.change_percent),
            Field::Open => Some(quote.open),
            Field::High => Some(quote.high),
            Field::Low => Some(quote.low),
            Field::PreviousClose => Some(quote.previous_close),
            Field::Volume => Some(quote.volume as f64),
            Field::AverageVolume => Some(quote.average_volume as f64),
            Field::MarketCap => Some(quote.market_cap),
            Field::Pe => quote.pe_ratio,
            Field::ForwardPe => quote.forward_pe,
            Field::PriceToBook => quote.price_to_book,
            Field::Eps => quote.eps,
            Field::DividendYield => quote.dividend_yield,
            Field::FiftyTwoWeekHigh => Some(quote.fifty_two_week_high),
            Field::FiftyTwoWeekLow => Some(quote.fifty_two_week_low),
            Field::FiftyTwoWeekChangePercent => Some(quote.fifty_two_week_change_percent),
        }
    }
}

/// Resolve a textual field name against `quote`.
pub fn resolve(quote: &Quote, name: &str) -> Option<f64> {
    Field::from_name(name).and_then(|f| f.value(quote))
}
