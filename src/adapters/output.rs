//! Rendering of screen results and indicator tables.
//!
//! Missing values (absent quote fields, NaN indicator positions) render as
//! `-` in tables, empty cells in csv/tsv and `null` in json.

use crate::domain::error::TickerlensError;
use crate::domain::indicator::IndicatorSeries;
use crate::domain::ohlcv::Bar;
use crate::domain::quote::Quote;
use chrono::DateTime;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Tsv,
    Json,
    Minimal,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Table => "table",
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Json => "json",
            OutputFormat::Minimal => "minimal",
        };
        f.write_str(name)
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "csv" => Ok(OutputFormat::Csv),
            "tsv" => Ok(OutputFormat::Tsv),
            "json" => Ok(OutputFormat::Json),
            "minimal" => Ok(OutputFormat::Minimal),
            other => Err(format!(
                "unknown format '{}' (expected table, csv, tsv, json or minimal)",
                other
            )),
        }
    }
}

const QUOTE_HEADERS: [&str; 9] = [
    "symbol",
    "price",
    "change",
    "change%",
    "volume",
    "avgvolume",
    "marketcap",
    "pe",
    "yield",
];

fn quote_row(q: &Quote) -> Vec<Option<String>> {
    let money = |v: f64| Some(format!("{:.2}", v));
    let optional = |v: Option<f64>| v.map(|x| format!("{:.2}", x));
    vec![
        Some(q.symbol.clone()),
        money(q.price),
        money(q.change),
        money(q.change_percent),
        Some(q.volume.to_string()),
        Some(q.average_volume.to_string()),
        Some(format!("{:.0}", q.market_cap)),
        optional(q.pe_ratio),
        optional(q.dividend_yield),
    ]
}

/// Render the quotes that passed a screen.
pub fn render_quotes(quotes: &[&Quote], format: OutputFormat) -> Result<String, TickerlensError> {
    match format {
        OutputFormat::Json => to_json(&quotes),
        OutputFormat::Minimal => Ok(quotes.iter().map(|q| format!("{}\n", q.symbol)).collect()),
        _ => {
            let headers: Vec<String> = QUOTE_HEADERS.iter().map(|h| h.to_string()).collect();
            let rows: Vec<_> = quotes.iter().map(|q| quote_row(q)).collect();
            render_grid(&headers, &rows, format)
        }
    }
}

/// Column name for one line of a series: `SMA(20)` or `MACD(12,26,9).signal`.
pub fn column_name(series: &IndicatorSeries, label: &str) -> String {
    if series.lines.len() == 1 {
        series.indicator_type.to_string()
    } else {
        format!("{}.{}", series.indicator_type, label)
    }
}

/// `YYYY-MM-DD` for an epoch-seconds timestamp.
pub fn format_date(timestamp: i64) -> String {
    match DateTime::from_timestamp(timestamp, 0) {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => timestamp.to_string(),
    }
}

fn defined(v: f64) -> Option<f64> {
    if v.is_nan() { None } else { Some(v) }
}

#[derive(Serialize)]
struct JsonColumn {
    name: String,
    values: Vec<Option<f64>>,
}

#[derive(Serialize)]
struct JsonIndicators<'a> {
    symbol: &'a str,
    dates: Vec<String>,
    columns: Vec<JsonColumn>,
}

/// Render indicator lines aligned with `bars`, one row per bar. `tail`
/// keeps only the last N rows.
pub fn render_indicators(
    symbol: &str,
    bars: &[Bar],
    series: &[IndicatorSeries],
    tail: Option<usize>,
    format: OutputFormat,
) -> Result<String, TickerlensError> {
    let start = match tail {
        Some(n) => bars.len().saturating_sub(n),
        None => 0,
    };

    let columns: Vec<(String, &[f64])> = series
        .iter()
        .flat_map(|s| {
            s.lines
                .iter()
                .map(move |line| (column_name(s, line.label), line.values.as_slice()))
        })
        .collect();

    match format {
        OutputFormat::Json => {
            let doc = JsonIndicators {
                symbol,
                dates: bars[start..].iter().map(|b| format_date(b.timestamp)).collect(),
                columns: columns
                    .iter()
                    .map(|(name, values)| JsonColumn {
                        name: name.clone(),
                        values: values.iter().skip(start).map(|&v| defined(v)).collect(),
                    })
                    .collect(),
            };
            to_json(&doc)
        }
        OutputFormat::Minimal => {
            // Latest defined value of each column.
            let mut out = String::new();
            for (name, values) in &columns {
                let last = values.iter().rev().copied().find(|v| !v.is_nan());
                match last {
                    Some(v) => out.push_str(&format!("{} {:.4}\n", name, v)),
                    None => out.push_str(&format!("{} -\n", name)),
                }
            }
            Ok(out)
        }
        _ => {
            let mut headers = vec!["date".to_string()];
            headers.extend(columns.iter().map(|(name, _)| name.clone()));
            let rows: Vec<Vec<Option<String>>> = (start..bars.len())
                .map(|i| {
                    let mut row = vec![Some(format_date(bars[i].timestamp))];
                    row.extend(columns.iter().map(|(_, values)| {
                        values
                            .get(i)
                            .copied()
                            .and_then(defined)
                            .map(|v| format!("{:.4}", v))
                    }));
                    row
                })
                .collect();
            render_grid(&headers, &rows, format)
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, TickerlensError> {
    serde_json::to_string_pretty(value)
        .map(|mut s| {
            s.push('\n');
            s
        })
        .map_err(|e| TickerlensError::Output {
            reason: format!("json encoding failed: {}", e),
        })
}

fn render_grid(
    headers: &[String],
    rows: &[Vec<Option<String>>],
    format: OutputFormat,
) -> Result<String, TickerlensError> {
    match format {
        OutputFormat::Csv => render_delimited(headers, rows, b','),
        OutputFormat::Tsv => render_delimited(headers, rows, b'\t'),
        _ => Ok(render_table(headers, rows)),
    }
}

fn render_delimited(
    headers: &[String],
    rows: &[Vec<Option<String>>],
    delimiter: u8,
) -> Result<String, TickerlensError> {
    let output_err = |e: &dyn fmt::Display| TickerlensError::Output {
        reason: e.to_string(),
    };

    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());
    wtr.write_record(headers).map_err(|e| output_err(&e))?;
    for row in rows {
        wtr.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))
            .map_err(|e| output_err(&e))?;
    }
    let bytes = wtr.into_inner().map_err(|e| output_err(&e))?;
    String::from_utf8(bytes).map_err(|e| output_err(&e))
}

// First column left-aligned, the rest right-aligned.
fn render_table(headers: &[String], rows: &[Vec<Option<String>>]) -> String {
    let cells: Vec<Vec<&str>> = rows
        .iter()
        .map(|row| row.iter().map(|c| c.as_deref().unwrap_or("-")).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }

    let format_line = |values: &[&str]| -> String {
        let parts: Vec<String> = values
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (v, &w))| {
                if i == 0 {
                    format!("{:<w$}", v, w = w)
                } else {
                    format!("{:>w$}", v, w = w)
                }
            })
            .collect();
        format!("{}\n", parts.join("  ").trim_end())
    };

    let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();
    let mut out = format_line(&header_refs);
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    let rule_refs: Vec<&str> = rule.iter().map(String::as_str).collect();
    out.push_str(&format_line(&rule_refs));
    for row in &cells {
        out.push_str(&format_line(row));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::{compute, IndicatorType};

    fn quote(symbol: &str, price: f64, pe: Option<f64>) -> Quote {
        Quote {
            symbol: symbol.into(),
            price,
            pe_ratio: pe,
            volume: 1_000,
            ..Quote::default()
        }
    }

    fn bars(n: usize) -> Vec<Bar> {
        (0..n)
            .map(|i| {
                let close = 100.0 + i as f64;
                Bar {
                    timestamp: 1_705_276_800 + i as i64 * 86_400,
                    open: close,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 1_000,
                }
            })
            .collect()
    }

    #[test]
    fn format_names_round_trip() {
        for fmt in [
            OutputFormat::Table,
            OutputFormat::Csv,
            OutputFormat::Tsv,
            OutputFormat::Json,
            OutputFormat::Minimal,
        ] {
            assert_eq!(fmt.to_string().parse::<OutputFormat>().unwrap(), fmt);
        }
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn quotes_csv_leaves_absent_cells_empty() {
        let a = quote("AAPL", 189.5, Some(29.4));
        let b = quote("TSLA", 250.0, None);
        let out = render_quotes(&[&a, &b], OutputFormat::Csv).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines[0],
            "symbol,price,change,change%,volume,avgvolume,marketcap,pe,yield"
        );
        assert_eq!(lines[1], "AAPL,189.50,0.00,0.00,1000,0,0,29.40,");
        assert_eq!(lines[2], "TSLA,250.00,0.00,0.00,1000,0,0,,");
    }

    #[test]
    fn quotes_tsv_uses_tabs() {
        let a = quote("KO", 60.0, None);
        let out = render_quotes(&[&a], OutputFormat::Tsv).unwrap();
        assert!(out.lines().nth(1).unwrap().starts_with("KO\t60.00\t"));
    }

    #[test]
    fn quotes_table_marks_absent_with_dash() {
        let a = quote("TSLA", 250.0, None);
        let out = render_quotes(&[&a], OutputFormat::Table).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("symbol"));
        assert!(lines[1].starts_with("------"));
        assert!(lines[2].ends_with('-'));
    }

    #[test]
    fn quotes_json_uses_null_for_absent() {
        let a = quote("TSLA", 250.0, None);
        let out = render_quotes(&[&a], OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["symbol"], "TSLA");
        assert!(value[0]["peRatio"].is_null());
    }

    #[test]
    fn quotes_minimal_lists_symbols() {
        let a = quote("A", 1.0, None);
        let b = quote("B", 2.0, None);
        assert_eq!(render_quotes(&[&a, &b], OutputFormat::Minimal).unwrap(), "A\nB\n");
        assert_eq!(render_quotes(&[], OutputFormat::Minimal).unwrap(), "");
    }

    #[test]
    fn column_names_for_single_and_multi_line() {
        let bars = bars(40);
        let sma = compute(&bars, &IndicatorType::Sma(3)).unwrap();
        let macd = compute(
            &bars,
            &IndicatorType::Macd {
                fast: 3,
                slow: 6,
                signal: 2,
            },
        )
        .unwrap();
        assert_eq!(column_name(&sma, "value"), "SMA(3)");
        assert_eq!(column_name(&macd, "signal"), "MACD(3,6,2).signal");
    }

    #[test]
    fn indicators_csv_has_empty_warmup_cells() {
        let bars = bars(4);
        let sma = compute(&bars, &IndicatorType::Sma(3)).unwrap();
        let out = render_indicators("X", &bars, &[sma], None, OutputFormat::Csv).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "date,SMA(3)");
        assert_eq!(lines[1], "2024-01-15,");
        assert_eq!(lines[2], "2024-01-16,");
        assert_eq!(lines[3], "2024-01-17,101.0000");
        assert_eq!(lines[4], "2024-01-18,102.0000");
    }

    #[test]
    fn indicators_tail_keeps_last_rows() {
        let bars = bars(10);
        let sma = compute(&bars, &IndicatorType::Sma(3)).unwrap();
        let out = render_indicators("X", &bars, &[sma], Some(2), OutputFormat::Csv).unwrap();
        assert_eq!(out.lines().count(), 3);
        assert!(out.ends_with("2024-01-24,108.0000\n"));

        let all = compute(&bars, &IndicatorType::Sma(3)).unwrap();
        let out = render_indicators("X", &bars, &[all], Some(100), OutputFormat::Csv).unwrap();
        assert_eq!(out.lines().count(), 11);
    }

    #[test]
    fn indicators_json_nan_is_null() {
        let bars = bars(3);
        let sma = compute(&bars, &IndicatorType::Sma(2)).unwrap();
        let out = render_indicators("X", &bars, &[sma], None, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["symbol"], "X");
        assert_eq!(value["dates"][0], "2024-01-15");
        assert_eq!(value["columns"][0]["name"], "SMA(2)");
        assert!(value["columns"][0]["values"][0].is_null());
        assert_eq!(value["columns"][0]["values"][1], 100.5);
    }

    #[test]
    fn indicators_minimal_prints_latest_value() {
        let bars = bars(5);
        let sma = compute(&bars, &IndicatorType::Sma(5)).unwrap();
        let out = render_indicators("X", &bars, &[sma], None, OutputFormat::Minimal).unwrap();
        assert_eq!(out, "SMA(5) 102.0000\n");
    }

    #[test]
    fn indicators_table_uses_dash_for_nan() {
        let bars = bars(3);
        let sma = compute(&bars, &IndicatorType::Sma(2)).unwrap();
        let out = render_indicators("X", &bars, &[sma], None, OutputFormat::Table).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], format!("date{}SMA(2)", " ".repeat(10)));
        assert_eq!(lines[2], format!("2024-01-15{}-", " ".repeat(9)));
        assert_eq!(lines[3], "2024-01-16  100.5000");
    }

    #[test]
    fn format_date_falls_back_to_raw_timestamp() {
        assert_eq!(format_date(0), "1970-01-01");
        assert_eq!(format_date(i64::MAX), i64::MAX.to_string());
    }
}
