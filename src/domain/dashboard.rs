//! One dashboard interaction: fetch, validate, derive every view.
//!
//! [`build_dashboard`] is called once per change of symbol, period or theme.
//! Any failure up to and including series validation aborts the whole
//! response; nothing is partially rendered.

use crate::domain::confidence::confidence;
use crate::domain::error::{TickerdashError, TrendError};
use crate::domain::indicator::ema::calculate_ema;
use crate::domain::indicator::sma::calculate_sma;
use crate::domain::indicator::{IndicatorSeries, OVERLAY_PERIOD};
use crate::domain::news::{NewsArticle, DEFAULT_NEWS_LIMIT};
use crate::domain::ohlcv::{OhlcvBar, PriceSeries};
use crate::domain::period::Period;
use crate::domain::summary::PriceSummary;
use crate::domain::theme::Theme;
use crate::domain::trend::predict_next_close;
use crate::ports::data_port::DataPort;
use crate::ports::news_port::NewsPort;
use chrono::NaiveDate;

pub const RECENT_ROWS: usize = 25;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DashboardRequest {
    pub symbol: String,
    pub period: Period,
    pub theme: Theme,
}

impl DashboardRequest {
    pub fn new(symbol: impl Into<String>, period: Period, theme: Theme) -> Self {
        Self {
            symbol: symbol.into(),
            period,
            theme,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardOptions {
    pub news_limit: usize,
    pub recent_rows: usize,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            news_limit: DEFAULT_NEWS_LIMIT,
            recent_rows: RECENT_ROWS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChartData {
    pub title: String,
    pub dates: Vec<NaiveDate>,
    pub close: Vec<f64>,
    pub sma: IndicatorSeries,
    pub ema: IndicatorSeries,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub bar: OhlcvBar,
    pub sma: Option<f64>,
    pub ema: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub request: DashboardRequest,
    pub series: PriceSeries,
    pub summary: PriceSummary,
    pub chart: ChartData,
    pub recent: Vec<TableRow>,
    /// `None` when no row has every overlay defined.
    pub forecast: Option<f64>,
    pub confidence: f64,
    pub news: Vec<NewsArticle>,
}

impl Dashboard {
    pub fn symbol(&self) -> &str {
        self.series.symbol()
    }
}

/// Trims and upper-cases a user-entered ticker.
///
/// Accepts letters, digits and `.`, `-`, `^`, `=`, starting with a letter,
/// digit or `^`. The result is safe to use as a file name.
pub fn normalize_symbol(input: &str) -> Result<String, TickerdashError> {
    let symbol = input.trim().to_uppercase();
    let Some(first) = symbol.chars().next() else {
        return Err(TickerdashError::EmptySymbol);
    };
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=');
    if !(first.is_ascii_alphanumeric() || first == '^') || !symbol.chars().all(allowed) {
        return Err(TickerdashError::InvalidSymbol(symbol));
    }
    Ok(symbol)
}

/// Fetches and validates the price series for `symbol`.
///
/// Fetch failures are indistinguishable from an unknown symbol: both come
/// back as [`TickerdashError::InsufficientData`]. Bars with a non-finite
/// price are dropped before validation.
pub fn load_series(
    data: &dyn DataPort,
    symbol: &str,
    period: Period,
) -> Result<PriceSeries, TickerdashError> {
    let symbol = normalize_symbol(symbol)?;
    let mut bars = match data.fetch_history(&symbol, period) {
        Ok(bars) => bars,
        Err(e) => {
            tracing::warn!(%symbol, %period, error = %e, "price fetch failed");
            Vec::new()
        }
    };
    let fetched = bars.len();
    bars.retain(|b| [b.open, b.high, b.low, b.close].iter().all(|p| p.is_finite()));
    if bars.len() < fetched {
        tracing::debug!(%symbol, dropped = fetched - bars.len(), "dropped bars with missing prices");
    }
    PriceSeries::new(symbol, bars)
}

/// Forecast over the rows where the SMA overlay is defined.
///
/// Returns `Ok(None)` when the series is shorter than the overlay window.
pub fn forecast_next_close(
    series: &PriceSeries,
    sma: &IndicatorSeries,
) -> Result<Option<f64>, TrendError> {
    let closes: Vec<f64> = series
        .bars()
        .iter()
        .enumerate()
        .filter(|(i, _)| sma.value_at(*i).is_some())
        .map(|(_, bar)| bar.close)
        .collect();
    if closes.is_empty() {
        return Ok(None);
    }
    predict_next_close(&closes).map(Some)
}

pub fn build_chart(series: &PriceSeries) -> ChartData {
    let bars = series.bars();
    ChartData {
        title: format!("{} Price Chart", series.symbol()),
        dates: bars.iter().map(|b| b.date).collect(),
        close: series.closes(),
        sma: calculate_sma(bars, OVERLAY_PERIOD),
        ema: calculate_ema(bars, OVERLAY_PERIOD),
    }
}

pub fn recent_rows(series: &PriceSeries, chart: &ChartData, count: usize) -> Vec<TableRow> {
    let tail = series.tail(count);
    let start = series.bars().len() - tail.len();
    tail.iter()
        .enumerate()
        .map(|(offset, bar)| TableRow {
            bar: bar.clone(),
            sma: chart.sma.value_at(start + offset),
            ema: chart.ema.value_at(start + offset),
        })
        .collect()
}

pub fn fetch_news(news: &dyn NewsPort, symbol: &str, limit: usize) -> Vec<NewsArticle> {
    if limit == 0 {
        return Vec::new();
    }
    match news.fetch_news(symbol, limit) {
        Ok(mut articles) => {
            articles.truncate(limit);
            articles
        }
        Err(e) => {
            tracing::warn!(%symbol, error = %e, "news fetch failed");
            Vec::new()
        }
    }
}

pub fn forecast_label(forecast: Option<f64>) -> String {
    match forecast {
        Some(value) => format!("Predicted Next Close: ${:.2}", value),
        None => format!(
            "Predicted Next Close: unavailable (needs at least {} rows)",
            OVERLAY_PERIOD
        ),
    }
}

pub fn confidence_label(confidence: f64) -> String {
    format!("Model Confidence: {:.1}%", confidence)
}

pub fn build_dashboard(
    data: &dyn DataPort,
    news: &dyn NewsPort,
    request: &DashboardRequest,
    options: &DashboardOptions,
) -> Result<Dashboard, TickerdashError> {
    let series = load_series(data, &request.symbol, request.period)?;
    let summary = PriceSummary::from_series(&series);
    let chart = build_chart(&series);
    let forecast = forecast_next_close(&series, &chart.sma)?;
    let recent = recent_rows(&series, &chart, options.recent_rows);
    let articles = fetch_news(news, series.symbol(), options.news_limit);

    tracing::info!(
        symbol = series.symbol(),
        period = %request.period,
        bars = series.bars().len(),
        forecast = ?forecast,
        "dashboard built"
    );

    Ok(Dashboard {
        request: DashboardRequest {
            symbol: series.symbol().to_string(),
            ..request.clone()
        },
        confidence: confidence(summary.close, summary.previous_close),
        summary,
        chart,
        recent,
        forecast,
        news: articles,
        series,
    })
}
