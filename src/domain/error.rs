//! Domain error types.

/// A filter syntax error with the byte offset of the offending token.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("parse error at position {position}: {message}")]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }

    /// Format the error with a caret pointing at the error position in the input.
    pub fn display_with_context(&self, input: &str) -> String {
        // `position` is a byte offset; the caret column is counted in chars.
        let column = input
            .get(..self.position)
            .map_or(self.position, |prefix| prefix.chars().count());
        let caret = " ".repeat(column) + "^";
        format!(
            "{input}\n{caret}\n{err}",
            input = input,
            caret = caret,
            err = self
        )
    }
}

/// Failure of a single indicator computation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IndicatorError {
    #[error("insufficient data: need {required} bars for {indicator}, have {actual}")]
    InsufficientData {
        indicator: String,
        required: usize,
        actual: usize,
    },

    #[error("invalid parameter for {indicator}: {reason}")]
    InvalidParameter { indicator: String, reason: String },
}

/// Top-level error type for tickerlens.
#[derive(Debug, thiserror::Error)]
pub enum TickerlensError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error(transparent)]
    FilterSyntax(#[from] ParseError),

    #[error(transparent)]
    Indicator(#[from] IndicatorError),

    #[error("no indicator could be computed for {symbol} ({failed} failed)")]
    AllIndicatorsFailed { symbol: String, failed: usize },

    #[error("unknown indicator '{spec}': {reason}")]
    UnknownIndicator { spec: String, reason: String },

    #[error("output error: {reason}")]
    Output { reason: String },
}

impl From<&TickerlensError> for std::process::ExitCode {
    fn from(err: &TickerlensError) -> Self {
        let code: u8 = match err {
            TickerlensError::Output { .. } => 1,
            TickerlensError::ConfigParse { .. } | TickerlensError::ConfigInvalid { .. } => 2,
            TickerlensError::Data { .. } | TickerlensError::NoData { .. } => 3,
            TickerlensError::FilterSyntax(_) => 4,
            TickerlensError::Indicator(_)
            | TickerlensError::AllIndicatorsFailed { .. }
            | TickerlensError::UnknownIndicator { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
