//! Daily OHLCV bars and the validated price series built from them.

use crate::domain::error::TickerdashError;
use chrono::NaiveDate;

/// Minimum number of bars any downstream computation needs.
pub const MIN_SERIES_BARS: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// An ordered, immutable run of daily bars for one symbol.
///
/// Construction enforces strictly increasing dates and at least
/// [`MIN_SERIES_BARS`] bars.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<OhlcvBar>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<OhlcvBar>) -> Result<Self, TickerdashError> {
        let symbol = symbol.into();
        if bars.len() < MIN_SERIES_BARS {
            return Err(TickerdashError::InsufficientData {
                symbol,
                bars: bars.len(),
                minimum: MIN_SERIES_BARS,
            });
        }
        if let Some(pair) = bars.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(TickerdashError::UnorderedSeries {
                symbol,
                date: pair[1].date,
            });
        }
        Ok(Self { symbol, bars })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[OhlcvBar] {
        &self.bars
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn last(&self) -> &OhlcvBar {
        &self.bars[self.bars.len() - 1]
    }

    pub fn previous(&self) -> &OhlcvBar {
        &self.bars[self.bars.len() - 2]
    }

    /// The trailing `n` bars (all of them when the series is shorter).
    pub fn tail(&self, n: usize) -> &[OhlcvBar] {
        &self.bars[self.bars.len().saturating_sub(n)..]
    }
}

/// Sorts bars by date and keeps the last bar seen for each date.
pub fn sort_and_dedup(mut bars: Vec<OhlcvBar>) -> Vec<OhlcvBar> {
    bars.sort_by_key(|b| b.date);
    let mut out: Vec<OhlcvBar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match out.last_mut() {
            Some(prev) if prev.date == bar.date => *prev = bar,
            _ => out.push(bar),
        }
    }
    out
}
