//! Moving-average overlays for the price chart.
//!
//! - `IndicatorPoint`: one value per bar, flagged invalid during warmup
//! - `IndicatorType`: indicator identity + parameters
//! - `IndicatorSeries`: a time series of indicator values

pub mod ema;
pub mod sma;

use chrono::NaiveDate;

/// Window used for both chart overlays.
pub const OVERLAY_PERIOD: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: f64,
}

impl IndicatorPoint {
    pub fn get(&self) -> Option<f64> {
        self.valid.then_some(self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
}

impl IndicatorType {
    /// Legend label, e.g. "SMA 20".
    pub fn label(&self) -> String {
        match self {
            IndicatorType::Sma(period) => format!("SMA {}", period),
            IndicatorType::Ema(period) => format!("EMA {}", period),
        }
    }

    /// Column name used in tables, e.g. "SMA_20".
    pub fn column(&self) -> String {
        match self {
            IndicatorType::Sma(period) => format!("SMA_{}", period),
            IndicatorType::Ema(period) => format!("EMA_{}", period),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// Value at bar `index`, `None` during warmup or past the end.
    pub fn value_at(&self, index: usize) -> Option<f64> {
        self.values.get(index).and_then(IndicatorPoint::get)
    }
}
