#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tickerdash::domain::error::TickerdashError;
use tickerdash::domain::news::NewsArticle;
pub use tickerdash::domain::ohlcv::OhlcvBar;
use tickerdash::domain::period::Period;
use tickerdash::ports::data_port::DataPort;
use tickerdash::ports::news_port::NewsPort;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
    pub calls: Arc<AtomicUsize>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }

    /// Shared handle on the fetch counter, usable after the port is boxed.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl DataPort for MockDataPort {
    fn fetch_history(
        &self,
        symbol: &str,
        _period: Period,
    ) -> Result<Vec<OhlcvBar>, TickerdashError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = self.errors.get(symbol) {
            return Err(TickerdashError::DataFetch {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(symbol).cloned().unwrap_or_default())
    }
}

pub struct MockNewsPort {
    pub articles: Vec<NewsArticle>,
    pub fail: bool,
}

impl MockNewsPort {
    pub fn empty() -> Self {
        Self {
            articles: Vec::new(),
            fail: false,
        }
    }

    pub fn with_headlines(count: usize) -> Self {
        Self {
            articles: (0..count)
                .map(|i| NewsArticle {
                    title: Some(format!("Headline {}", i + 1)),
                    publisher: Some("Wire".to_string()),
                    link: Some(format!("https://news.example.com/{}", i + 1)),
                })
                .collect(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            articles: Vec::new(),
            fail: true,
        }
    }
}

impl NewsPort for MockNewsPort {
    fn fetch_news(&self, _symbol: &str, limit: usize) -> Result<Vec<NewsArticle>, TickerdashError> {
        if self.fail {
            return Err(TickerdashError::NewsFetch {
                reason: "HTTP 503".into(),
            });
        }
        Ok(self.articles.iter().take(limit).cloned().collect())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(date: &str, close: f64) -> OhlcvBar {
    OhlcvBar {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1000,
    }
}

/// Consecutive daily bars with a gently oscillating close.
pub fn generate_bars(start_date: &str, count: usize, start_price: f64) -> Vec<OhlcvBar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    (0..count)
        .map(|i| {
            let close = start_price + (i as f64 * 0.3).sin() * 5.0 + i as f64 * 0.1;
            OhlcvBar {
                date: start + chrono::Duration::days(i as i64),
                open: close - 0.5,
                high: close + 1.5,
                low: close - 1.5,
                close,
                volume: 1_000_000 + (i as i64 * 1_000),
            }
        })
        .collect()
}

/// Bars whose close is exactly `start + step * i`.
pub fn linear_bars(start_date: &str, count: usize, start: f64, step: f64) -> Vec<OhlcvBar> {
    let first = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    (0..count)
        .map(|i| {
            let close = start + step * i as f64;
            OhlcvBar {
                date: first + chrono::Duration::days(i as i64),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 5_000,
            }
        })
        .collect()
}
