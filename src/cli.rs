//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info, warn};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::output::{render_indicators, render_quotes, OutputFormat};
use crate::domain::error::{IndicatorError, TickerlensError};
use crate::domain::field::Field;
use crate::domain::filter::{screen, Filter};
use crate::domain::indicator::{compute_indicators, IndicatorType};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

/// Indicators computed when neither `--indicator` nor `[indicators] list`
/// names any.
pub const DEFAULT_INDICATORS: [&str; 3] = ["sma", "rsi", "macd"];

#[derive(Parser, Debug)]
#[command(
    name = "tickerlens",
    about = "Stock screener and technical indicator calculator"
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Screen quotes with a filter expression
    Screen {
        /// e.g. "pe < 20 and yield > 2"
        #[arg(short, long)]
        filter: Option<String>,
        /// Comma-separated symbols (default: every quote)
        #[arg(short, long, value_delimiter = ',')]
        symbols: Vec<String>,
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Compute technical indicators for one symbol
    Indicators {
        #[arg(short, long)]
        symbol: String,
        /// Indicator spec, e.g. sma:50, macd:12,26,9, bb:20,2 (repeatable)
        #[arg(short, long = "indicator")]
        indicators: Vec<String>,
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
        /// Only print the last N rows
        #[arg(long)]
        tail: Option<usize>,
    },
    /// Parse a filter expression and print its tree
    Check { expr: String },
    /// List symbols with bar files in the data directory
    Symbols {
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Options after merging CLI flags over config values.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub filter: String,
    pub format: OutputFormat,
    pub indicators: Vec<String>,
    pub symbols: Vec<String>,
    pub tail: Option<usize>,
}

/// Flags given on the command line; `None`/empty means "not given".
#[derive(Debug, Default)]
pub struct Overrides {
    pub data_dir: Option<PathBuf>,
    pub filter: Option<String>,
    pub format: Option<OutputFormat>,
    pub indicators: Vec<String>,
    pub symbols: Vec<String>,
    pub tail: Option<usize>,
}

pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Screen {
            filter,
            symbols,
            data_dir,
            config,
            format,
        } => run_screen(
            config.as_deref(),
            Overrides {
                data_dir,
                filter,
                format,
                symbols,
                ..Overrides::default()
            },
        ),
        Command::Indicators {
            symbol,
            indicators,
            data_dir,
            config,
            format,
            tail,
        } => run_indicators(
            config.as_deref(),
            Overrides {
                data_dir,
                format,
                indicators,
                tail,
                ..Overrides::default()
            },
            &symbol,
        ),
        Command::Check { expr } => run_check(&expr),
        Command::Symbols { data_dir, config } => run_symbols(
            config.as_deref(),
            Overrides {
                data_dir,
                ..Overrides::default()
            },
        ),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, TickerlensError> {
    info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path)
}

/// Merge command-line flags over config values. Flags always win.
pub fn resolve_settings(
    config: Option<&dyn ConfigPort>,
    overrides: Overrides,
) -> Result<Settings, TickerlensError> {
    let from_config = |section: &str, key: &str| {
        config
            .and_then(|c| c.get_string(section, key))
            .filter(|v| !v.trim().is_empty())
    };

    let data_dir = overrides
        .data_dir
        .or_else(|| from_config("data", "dir").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));

    let filter = overrides
        .filter
        .or_else(|| from_config("screen", "filter"))
        .unwrap_or_default();

    let format = match overrides.format {
        Some(f) => f,
        None => match from_config("output", "format") {
            Some(raw) => raw
                .parse::<OutputFormat>()
                .map_err(|reason| TickerlensError::ConfigInvalid {
                    section: "output".into(),
                    key: "format".into(),
                    reason,
                })?,
            None => OutputFormat::default(),
        },
    };

    let indicators = if !overrides.indicators.is_empty() {
        overrides.indicators
    } else {
        let listed = config
            .map(|c| c.get_list("indicators", "list", ' '))
            .unwrap_or_default();
        if listed.is_empty() {
            DEFAULT_INDICATORS.iter().map(|s| s.to_string()).collect()
        } else {
            listed
        }
    };

    let symbols = if overrides.symbols.is_empty() {
        config
            .map(|c| c.get_list("screen", "symbols", ','))
            .unwrap_or_default()
    } else {
        overrides.symbols
    };

    // [indicators] tail = 0 (or absent) prints every row.
    let tail = overrides.tail.or_else(|| {
        config
            .map(|c| c.get_int("indicators", "tail", 0))
            .filter(|&n| n > 0)
            .map(|n| n as usize)
    });

    Ok(Settings {
        data_dir,
        filter,
        format,
        indicators,
        symbols,
        tail,
    })
}

fn settings_for(config_path: Option<&Path>, overrides: Overrides) -> Result<Settings, TickerlensError> {
    let config = config_path.map(load_config).transpose()?;
    let settings = resolve_settings(config.as_ref().map(|c| c as &dyn ConfigPort), overrides)?;
    debug!(?settings, "resolved settings");
    Ok(settings)
}

/// Parse every spec, failing on the first bad one.
pub fn parse_indicator_specs(specs: &[String]) -> Result<Vec<IndicatorType>, TickerlensError> {
    specs.iter().map(|s| s.parse::<IndicatorType>()).collect()
}

/// Fetch quotes, apply `filter`, render the passing ones.
pub fn screen_pipeline(
    data: &dyn DataPort,
    filter: &Filter,
    symbols: &[String],
    format: OutputFormat,
) -> Result<String, TickerlensError> {
    let quotes = data.fetch_quotes(symbols)?;
    let passing = screen(filter, &quotes);
    info!(
        filter = filter.source(),
        total = quotes.len(),
        passing = passing.len(),
        "screen complete"
    );
    render_quotes(&passing, format)
}

/// Rendered indicator table plus the indicators that could not be computed.
#[derive(Debug)]
pub struct IndicatorReport {
    pub output: String,
    pub computed: usize,
    pub failures: Vec<(IndicatorType, IndicatorError)>,
}

impl IndicatorReport {
    pub fn all_failed(&self) -> bool {
        self.computed == 0 && !self.failures.is_empty()
    }

    /// Turn a report where nothing was computed into an error.
    pub fn require_any(&self, symbol: &str) -> Result<(), TickerlensError> {
        if self.all_failed() {
            return Err(TickerlensError::AllIndicatorsFailed {
                symbol: symbol.to_string(),
                failed: self.failures.len(),
            });
        }
        Ok(())
    }
}

/// Fetch bars for `symbol` and compute each indicator independently.
pub fn indicators_pipeline(
    data: &dyn DataPort,
    symbol: &str,
    indicators: &[IndicatorType],
    tail: Option<usize>,
    format: OutputFormat,
) -> Result<IndicatorReport, TickerlensError> {
    let bars = data.fetch_bars(symbol)?;

    let mut series = Vec::with_capacity(indicators.len());
    let mut failures = Vec::new();
    for (indicator, result) in compute_indicators(&bars, indicators) {
        match result {
            Ok(s) => series.push(s),
            Err(e) => {
                warn!(symbol, %indicator, error = %e, "indicator failed");
                failures.push((indicator, e));
            }
        }
    }

    let output = if series.is_empty() {
        String::new()
    } else {
        render_indicators(symbol, &bars, &series, tail, format)?
    };

    Ok(IndicatorReport {
        output,
        computed: series.len(),
        failures,
    })
}

fn parse_filter(source: &str) -> Result<Filter, ExitCode> {
    Filter::parse(source).map_err(|e| {
        eprintln!("error: invalid filter:\n{}", e.display_with_context(source));
        (&TickerlensError::from(e)).into()
    })
}

fn run_screen(config_path: Option<&Path>, overrides: Overrides) -> Result<ExitCode, TickerlensError> {
    let settings = settings_for(config_path, overrides)?;
    let filter = match parse_filter(&settings.filter) {
        Ok(f) => f,
        Err(code) => return Ok(code),
    };

    let data = CsvAdapter::new(settings.data_dir);
    let output = screen_pipeline(&data, &filter, &settings.symbols, settings.format)?;
    print!("{output}");
    Ok(ExitCode::SUCCESS)
}

fn run_indicators(
    config_path: Option<&Path>,
    overrides: Overrides,
    symbol: &str,
) -> Result<ExitCode, TickerlensError> {
    let settings = settings_for(config_path, overrides)?;
    let indicators = parse_indicator_specs(&settings.indicators)?;

    let data = CsvAdapter::new(settings.data_dir);
    let report = indicators_pipeline(&data, symbol, &indicators, settings.tail, settings.format)?;

    for (indicator, err) in &report.failures {
        eprintln!("warning: {indicator}: {err}");
    }
    report.require_any(symbol)?;

    print!("{}", report.output);
    Ok(ExitCode::SUCCESS)
}

fn run_check(expr: &str) -> Result<ExitCode, TickerlensError> {
    let filter = match parse_filter(expr) {
        Ok(f) => f,
        Err(code) => return Ok(code),
    };

    match filter.expr() {
        Some(tree) => {
            println!("{tree}");
            for name in tree.fields() {
                if Field::from_name(name).is_none() {
                    eprintln!("warning: unknown field '{}' is always absent", name);
                }
            }
        }
        None => println!("(match all)"),
    }
    Ok(ExitCode::SUCCESS)
}

fn run_symbols(config_path: Option<&Path>, overrides: Overrides) -> Result<ExitCode, TickerlensError> {
    let settings = settings_for(config_path, overrides)?;
    let data = CsvAdapter::new(settings.data_dir);
    let symbols = data.list_symbols()?;

    if symbols.is_empty() {
        eprintln!("No symbols found");
    }
    for symbol in &symbols {
        println!("{}", symbol);
    }
    Ok(ExitCode::SUCCESS)
}
