//! Latest-session metrics shown above the chart.

use crate::domain::ohlcv::PriceSeries;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceSummary {
    pub open: f64,
    pub high: f64,
    pub close: f64,
    pub previous_close: f64,
    pub volume: i64,
    pub delta: f64,
}

impl PriceSummary {
    pub fn from_series(series: &PriceSeries) -> Self {
        let last = series.last();
        let previous_close = series.previous().close;
        Self {
            open: last.open,
            high: last.high,
            close: last.close,
            previous_close,
            volume: last.volume,
            delta: last.close - previous_close,
        }
    }

    /// `Up` only for a strictly positive delta; a flat day counts as `Down`.
    pub fn direction(&self) -> Direction {
        if self.delta > 0.0 {
            Direction::Up
        } else {
            Direction::Down
        }
    }
}

/// Formats an integer with comma thousands separators.
pub fn format_volume(volume: i64) -> String {
    let digits = volume.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if volume < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::OhlcvBar;
    use chrono::NaiveDate;

    fn series(closes: &[f64]) -> PriceSeries {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                date: NaiveDate::from_ymd_opt(2024, 5, (i + 1) as u32).unwrap(),
                open: close - 0.5,
                high: close + 2.0,
                low: close - 2.0,
                close,
                volume: 1_234_567 + i as i64,
            })
            .collect();
        PriceSeries::new("MSFT", bars).unwrap()
    }

    #[test]
    fn summary_uses_last_two_bars() {
        let s = PriceSummary::from_series(&series(&[100.0, 98.0, 103.5]));
        assert_eq!(s.close, 103.5);
        assert_eq!(s.previous_close, 98.0);
        assert_eq!(s.open, 103.0);
        assert_eq!(s.high, 105.5);
        assert_eq!(s.volume, 1_234_569);
        assert_eq!(s.delta, 5.5);
        assert_eq!(s.direction(), Direction::Up);
    }

    #[test]
    fn flat_day_is_down() {
        let s = PriceSummary::from_series(&series(&[100.0, 100.0]));
        assert_eq!(s.direction(), Direction::Down);
    }

    #[test]
    fn volume_gets_thousands_separators() {
        assert_eq!(format_volume(0), "0");
        assert_eq!(format_volume(999), "999");
        assert_eq!(format_volume(1_000), "1,000");
        assert_eq!(format_volume(52_164_511), "52,164,511");
        assert_eq!(format_volume(-12_345), "-12,345");
    }
}
