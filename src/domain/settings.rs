//! Runtime settings read from the INI config, validated up front.

use crate::domain::dashboard::{DashboardOptions, DashboardRequest, RECENT_ROWS};
use crate::domain::error::TickerdashError;
use crate::domain::news::DEFAULT_NEWS_LIMIT;
use crate::domain::period::Period;
use crate::domain::theme::Theme;
use crate::ports::config_port::ConfigPort;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; tickerdash/0.1)";
pub const DEFAULT_LISTEN: &str = "127.0.0.1:3000";
pub const DEFAULT_SYMBOL: &str = "AAPL";
pub const MAX_NEWS_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Yahoo,
    Csv(PathBuf),
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub source: DataSource,
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub cache_ttl: Duration,
    pub news_limit: usize,
    pub listen: SocketAddr,
    pub defaults: DashboardRequest,
}

impl Settings {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, TickerdashError> {
        let source = match config.get_string_or("data", "source", "yahoo").to_lowercase().as_str() {
            "yahoo" => DataSource::Yahoo,
            "csv" => {
                let dir = config.get_string("data", "csv_dir").ok_or_else(|| {
                    TickerdashError::ConfigMissing {
                        section: "data".into(),
                        key: "csv_dir".into(),
                    }
                })?;
                DataSource::Csv(PathBuf::from(dir))
            }
            other => {
                return Err(invalid(
                    "data",
                    "source",
                    format!("unknown source '{}' (expected yahoo or csv)", other),
                ));
            }
        };

        let timeout_secs = config.get_int("data", "timeout_secs", 10);
        if timeout_secs <= 0 {
            return Err(invalid("data", "timeout_secs", "timeout_secs must be positive"));
        }

        let ttl_secs = config.get_int("cache", "ttl_seconds", 3600);
        if ttl_secs <= 0 {
            return Err(invalid("cache", "ttl_seconds", "ttl_seconds must be positive"));
        }

        let news_limit = config.get_int("news", "limit", DEFAULT_NEWS_LIMIT as i64);
        if !(0..=MAX_NEWS_LIMIT as i64).contains(&news_limit) {
            return Err(invalid(
                "news",
                "limit",
                format!("limit must be between 0 and {}", MAX_NEWS_LIMIT),
            ));
        }

        let listen = config.get_string_or("web", "listen", DEFAULT_LISTEN);
        let listen = SocketAddr::from_str(&listen)
            .map_err(|e| invalid("web", "listen", e.to_string()))?;

        let period = match config.get_string("web", "default_period") {
            Some(p) => p
                .parse::<Period>()
                .map_err(|e| invalid("web", "default_period", e.to_string()))?,
            None => Period::default(),
        };
        let theme = match config.get_string("web", "default_theme") {
            Some(t) => t
                .parse::<Theme>()
                .map_err(|e| invalid("web", "default_theme", e.to_string()))?,
            None => Theme::default(),
        };
        let symbol = config.get_string_or("web", "default_symbol", DEFAULT_SYMBOL);

        Ok(Self {
            source,
            base_url: config.get_string_or("data", "base_url", DEFAULT_BASE_URL),
            user_agent: config.get_string_or("data", "user_agent", DEFAULT_USER_AGENT),
            timeout: Duration::from_secs(timeout_secs as u64),
            cache_ttl: Duration::from_secs(ttl_secs as u64),
            news_limit: news_limit as usize,
            listen,
            defaults: DashboardRequest::new(symbol.to_uppercase(), period, theme),
        })
    }

    pub fn dashboard_options(&self) -> DashboardOptions {
        DashboardOptions {
            news_limit: self.news_limit,
            recent_rows: RECENT_ROWS,
        }
    }
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> TickerdashError {
    TickerdashError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}
