//! Yahoo Finance HTTP adapter for daily history and news headlines.
//!
//! History comes from the v8 chart endpoint, whose quote fields arrive as
//! parallel per-column arrays under `chart.result[0].indicators.quote[0]`.
//! They are flattened into one [`OhlcvBar`] per timestamp, dropping any row
//! with a null field. News comes from the v1 search endpoint.

use crate::domain::error::TickerdashError;
use crate::domain::news::NewsArticle;
use crate::domain::ohlcv::{sort_and_dedup, OhlcvBar};
use crate::domain::period::Period;
use crate::domain::settings::Settings;
use crate::ports::data_port::DataPort;
use crate::ports::news_port::NewsPort;
use chrono::DateTime;
use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;

#[derive(Clone)]
pub struct YahooAdapter {
    client: Client,
    base_url: Url,
}

impl YahooAdapter {
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self, TickerdashError> {
        let base_url = Url::parse(base_url).map_err(|e| TickerdashError::ConfigInvalid {
            section: "data".into(),
            key: "base_url".into(),
            reason: e.to_string(),
        })?;
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| TickerdashError::DataFetch {
                reason: format!("failed to build http client: {}", e),
            })?;
        Ok(Self { client, base_url })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, TickerdashError> {
        Self::new(&settings.base_url, &settings.user_agent, settings.timeout)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, TickerdashError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| TickerdashError::ConfigInvalid {
                section: "data".into(),
                key: "base_url".into(),
                reason: "base url cannot carry a path".into(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn get_text(&self, url: Url, query: &[(&str, String)]) -> Result<(StatusCode, String), reqwest::Error> {
        let response = self.client.get(url).query(query).send()?;
        let status = response.status();
        let body = response.text()?;
        Ok((status, body))
    }
}

impl DataPort for YahooAdapter {
    fn fetch_history(
        &self,
        symbol: &str,
        period: Period,
    ) -> Result<Vec<OhlcvBar>, TickerdashError> {
        let url = self.endpoint(&["v8", "finance", "chart", symbol])?;
        let query = [
            ("range", period.as_str().to_string()),
            ("interval", "1d".to_string()),
            ("includePrePost", "false".to_string()),
        ];

        tracing::debug!(%symbol, %period, "fetching chart history");
        let (status, body) = self
            .get_text(url, &query)
            .map_err(|e| TickerdashError::DataFetch {
                reason: e.to_string(),
            })?;

        if status == StatusCode::NOT_FOUND {
            tracing::debug!(%symbol, "chart endpoint reports unknown symbol");
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(TickerdashError::DataFetch {
                reason: format!("chart request for {} returned {}", symbol, status),
            });
        }
        parse_chart_response(&body)
    }
}

impl NewsPort for YahooAdapter {
    fn fetch_news(&self, symbol: &str, limit: usize) -> Result<Vec<NewsArticle>, TickerdashError> {
        let url = self.endpoint(&["v1", "finance", "search"])?;
        let query = [
            ("q", symbol.to_string()),
            ("quotesCount", "0".to_string()),
            ("newsCount", limit.to_string()),
        ];

        let (status, body) = self
            .get_text(url, &query)
            .map_err(|e| TickerdashError::NewsFetch {
                reason: e.to_string(),
            })?;
        if !status.is_success() {
            return Err(TickerdashError::NewsFetch {
                reason: format!("search request for {} returned {}", symbol, status),
            });
        }
        parse_news_response(&body, limit)
    }
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteColumns>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteColumns {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Flattens a chart response into date-ordered bars.
///
/// A response without a result (unknown symbol) yields an empty vector.
pub fn parse_chart_response(body: &str) -> Result<Vec<OhlcvBar>, TickerdashError> {
    let envelope: ChartEnvelope =
        serde_json::from_str(body).map_err(|e| TickerdashError::DataFetch {
            reason: format!("malformed chart response: {}", e),
        })?;

    if let Some(err) = &envelope.chart.error {
        tracing::debug!(
            code = err.code.as_deref().unwrap_or(""),
            description = err.description.as_deref().unwrap_or(""),
            "chart endpoint returned an error object"
        );
    }

    let Some(result) = envelope.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };
    let Some(quote) = result.indicators.quote.into_iter().next() else {
        return Ok(Vec::new());
    };

    let cell = |column: &[Option<f64>], i: usize| column.get(i).copied().flatten();
    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let fields = (
            cell(&quote.open, i),
            cell(&quote.high, i),
            cell(&quote.low, i),
            cell(&quote.close, i),
            cell(&quote.volume, i),
        );
        let (Some(open), Some(high), Some(low), Some(close), Some(volume)) = fields else {
            continue;
        };
        if ![open, high, low, close, volume].iter().all(|v| v.is_finite()) {
            continue;
        }
        let Some(local) = DateTime::from_timestamp(ts + result.meta.gmtoffset, 0) else {
            continue;
        };
        bars.push(OhlcvBar {
            date: local.date_naive(),
            open,
            high,
            low,
            close,
            volume: volume as i64,
        });
    }

    Ok(sort_and_dedup(bars))
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    news: Vec<SearchNewsItem>,
}

#[derive(Debug, Deserialize)]
struct SearchNewsItem {
    title: Option<String>,
    publisher: Option<String>,
    link: Option<String>,
}

pub fn parse_news_response(body: &str, limit: usize) -> Result<Vec<NewsArticle>, TickerdashError> {
    let envelope: SearchEnvelope =
        serde_json::from_str(body).map_err(|e| TickerdashError::NewsFetch {
            reason: format!("malformed search response: {}", e),
        })?;
    Ok(envelope
        .news
        .into_iter()
        .take(limit)
        .map(|item| NewsArticle {
            title: item.title,
            publisher: item.publisher,
            link: item.link,
        })
        .collect())
}
