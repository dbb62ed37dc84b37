//! CSV file adapter: offline price/news source plus the CSV export format.
//!
//! Price files live at `<dir>/<SYMBOL>.csv` with a header row naming
//! `Date, Open, High, Low, Close, Volume` in any order and case. News files
//! live at `<dir>/<SYMBOL>_news.csv` with `title, publisher, link` columns.

use crate::domain::error::TickerdashError;
use crate::domain::news::NewsArticle;
use crate::domain::ohlcv::{sort_and_dedup, OhlcvBar};
use crate::domain::period::Period;
use crate::ports::data_port::DataPort;
use crate::ports::news_port::NewsPort;
use chrono::NaiveDate;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

pub const EXPORT_HEADER: [&str; 6] = ["Date", "Open", "High", "Low", "Close", "Volume"];

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    fn news_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}_news.csv", symbol))
    }
}

/// Download file name for an export of `symbol`.
pub fn export_file_name(symbol: &str) -> String {
    format!("{}_data.csv", symbol)
}

/// Writes bars with a header row and the date as the first column.
pub fn write_csv<W: Write>(bars: &[OhlcvBar], writer: W) -> Result<(), TickerdashError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(EXPORT_HEADER).map_err(csv_error)?;
    for bar in bars {
        wtr.write_record([
            bar.date.format("%Y-%m-%d").to_string(),
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
            bar.volume.to_string(),
        ])
        .map_err(csv_error)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn to_csv_bytes(bars: &[OhlcvBar]) -> Result<Vec<u8>, TickerdashError> {
    let mut buf = Vec::new();
    write_csv(bars, &mut buf)?;
    Ok(buf)
}

struct PriceColumns {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: usize,
}

impl PriceColumns {
    fn locate(headers: &csv::StringRecord) -> Result<Self, TickerdashError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| TickerdashError::Csv {
                    reason: format!("missing {} column", name),
                })
        };
        Ok(Self {
            date: find("date")?,
            open: find("open")?,
            high: find("high")?,
            low: find("low")?,
            close: find("close")?,
            volume: find("volume")?,
        })
    }
}

/// Parses price rows, oldest first.
///
/// Rows with a blank or non-finite field are skipped; malformed values are
/// errors.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<OhlcvBar>, TickerdashError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let columns = PriceColumns::locate(rdr.headers().map_err(csv_error)?)?;
    let mut bars = Vec::new();

    for (line, result) in rdr.records().enumerate() {
        let record = result.map_err(csv_error)?;
        let field = |idx: usize| record.get(idx).map(str::trim).filter(|s| !s.is_empty());

        let (Some(date), Some(open), Some(high), Some(low), Some(close), Some(volume)) = (
            field(columns.date),
            field(columns.open),
            field(columns.high),
            field(columns.low),
            field(columns.close),
            field(columns.volume),
        ) else {
            tracing::debug!(row = line + 1, "skipping csv row with missing fields");
            continue;
        };

        let date = parse_date(date)?;
        let prices = [
            parse_price("open", open)?,
            parse_price("high", high)?,
            parse_price("low", low)?,
            parse_price("close", close)?,
        ];
        if prices.iter().any(|p| !p.is_finite()) {
            tracing::debug!(row = line + 1, "skipping csv row with non-finite price");
            continue;
        }

        bars.push(OhlcvBar {
            date,
            open: prices[0],
            high: prices[1],
            low: prices[2],
            close: prices[3],
            volume: parse_volume(volume)?,
        });
    }

    Ok(sort_and_dedup(bars))
}

fn parse_date(value: &str) -> Result<NaiveDate, TickerdashError> {
    // Exports from other tools sometimes carry a time component.
    let date_part = value.split([' ', 'T']).next().unwrap_or(value);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|e| TickerdashError::Csv {
        reason: format!("invalid date '{}': {}", value, e),
    })
}

fn parse_price(name: &str, value: &str) -> Result<f64, TickerdashError> {
    value.parse().map_err(|e| TickerdashError::Csv {
        reason: format!("invalid {} value '{}': {}", name, value, e),
    })
}

fn parse_volume(value: &str) -> Result<i64, TickerdashError> {
    value
        .parse::<i64>()
        .or_else(|_| value.parse::<f64>().map(|v| v as i64))
        .map_err(|e| TickerdashError::Csv {
            reason: format!("invalid volume value '{}': {}", value, e),
        })
}

fn csv_error(e: csv::Error) -> TickerdashError {
    TickerdashError::Csv {
        reason: e.to_string(),
    }
}

fn open_if_exists(path: &Path) -> Result<Option<fs::File>, TickerdashError> {
    match fs::File::open(path) {
        Ok(f) => Ok(Some(f)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(TickerdashError::DataFetch {
            reason: format!("failed to read {}: {}", path.display(), e),
        }),
    }
}

impl DataPort for CsvAdapter {
    fn fetch_history(
        &self,
        symbol: &str,
        period: Period,
    ) -> Result<Vec<OhlcvBar>, TickerdashError> {
        let path = self.csv_path(symbol);
        let Some(file) = open_if_exists(&path)? else {
            tracing::debug!(path = %path.display(), "no price file for symbol");
            return Ok(Vec::new());
        };

        let bars = read_csv(file)?;
        let Some(newest) = bars.last().map(|b| b.date) else {
            return Ok(bars);
        };
        let cutoff = period.cutoff(newest);
        Ok(bars.into_iter().filter(|b| b.date > cutoff).collect())
    }
}

impl NewsPort for CsvAdapter {
    fn fetch_news(&self, symbol: &str, limit: usize) -> Result<Vec<NewsArticle>, TickerdashError> {
        let path = self.news_path(symbol);
        let Some(file) = open_if_exists(&path)? else {
            return Ok(Vec::new());
        };

        let mut rdr = csv::Reader::from_reader(file);
        let headers = rdr.headers().map_err(csv_error)?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let (title, publisher, link) = (column("title"), column("publisher"), column("link"));

        let mut articles = Vec::new();
        for result in rdr.records().take(limit) {
            let record = result.map_err(csv_error)?;
            let get = |idx: Option<usize>| {
                idx.and_then(|i| record.get(i))
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
            };
            articles.push(NewsArticle {
                title: get(title),
                publisher: get(publisher),
                link: get(link),
            });
        }
        Ok(articles)
    }
}
