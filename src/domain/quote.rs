//! Quote snapshot for one security.

use serde::{Deserialize, Serialize};

/// Current-market fields for one symbol. Fields the upstream provider may
/// not supply are `Option`: `None` means "not available", which is distinct
/// from a reported zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub previous_close: f64,
    pub volume: i64,
    pub average_volume: i64,
    pub market_cap: f64,
    #[serde(default)]
    pub pe_ratio: Option<f64>,
    #[serde(default)]
    pub forward_pe: Option<f64>,
    #[serde(default)]
    pub price_to_book: Option<f64>,
    #[serde(default)]
    pub eps: Option<f64>,
    #[serde(default)]
    pub dividend_yield: Option<f64>,
    pub fifty_two_week_high: f64,
    pub fifty_two_week_low: f64,
    pub fifty_two_week_change_percent: f64,
}
