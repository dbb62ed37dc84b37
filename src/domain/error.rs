//! Domain error types.

/// Failure modes of the trend fit.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrendError {
    #[error("cannot fit a trend to an empty series")]
    EmptySeries,

    #[error("non-finite close price at day index {index}")]
    NonFinite { index: usize },
}

/// Top-level error type for tickerdash.
#[derive(Debug, thiserror::Error)]
pub enum TickerdashError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("no stock symbol given")]
    EmptySymbol,

    #[error("invalid stock symbol '{0}'")]
    InvalidSymbol(String),

    #[error("unknown period '{0}' (expected one of 1mo, 3mo, 6mo, 1y, 2y, 5y)")]
    UnknownPeriod(String),

    #[error("unknown theme '{0}' (expected Dark or Light)")]
    UnknownTheme(String),

    #[error("invalid stock symbol or insufficient data for {symbol}: have {bars} bars, need {minimum}")]
    InsufficientData {
        symbol: String,
        bars: usize,
        minimum: usize,
    },

    #[error("bars for {symbol} are not in strictly increasing date order at {date}")]
    UnorderedSeries {
        symbol: String,
        date: chrono::NaiveDate,
    },

    #[error("price data fetch failed: {reason}")]
    DataFetch { reason: String },

    #[error("news fetch failed: {reason}")]
    NewsFetch { reason: String },

    #[error("csv error: {reason}")]
    Csv { reason: String },

    #[error(transparent)]
    Trend(#[from] TrendError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TickerdashError {
    /// True for the errors a user fixes by changing the symbol or period.
    pub fn is_invalid_data(&self) -> bool {
        matches!(
            self,
            TickerdashError::InsufficientData { .. } | TickerdashError::UnorderedSeries { .. }
        )
    }

    /// True when the entered ticker itself was rejected.
    pub fn is_bad_symbol(&self) -> bool {
        matches!(
            self,
            TickerdashError::EmptySymbol | TickerdashError::InvalidSymbol(_)
        )
    }
}

impl From<&TickerdashError> for std::process::ExitCode {
    fn from(err: &TickerdashError) -> Self {
        let code: u8 = match err {
            TickerdashError::Io(_) => 1,
            TickerdashError::ConfigParse { .. }
            | TickerdashError::ConfigMissing { .. }
            | TickerdashError::ConfigInvalid { .. } => 2,
            TickerdashError::DataFetch { .. }
            | TickerdashError::NewsFetch { .. }
            | TickerdashError::Csv { .. } => 3,
            TickerdashError::EmptySymbol
            | TickerdashError::InvalidSymbol(_)
            | TickerdashError::UnknownPeriod(_)
            | TickerdashError::UnknownTheme(_) => 4,
            TickerdashError::InsufficientData { .. }
            | TickerdashError::UnorderedSeries { .. }
            | TickerdashError::Trend(_) => 5,
        };
        std::process::ExitCode::from(code)
    }
}
