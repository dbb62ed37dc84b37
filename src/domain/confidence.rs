//! Display-only confidence score for the forecast.
//!
//! Not a statistical interval: it grows with the size of the latest daily
//! move and is clamped to [`CONFIDENCE_FLOOR`, `CONFIDENCE_CEILING`].

pub const CONFIDENCE_FLOOR: f64 = 70.0;
pub const CONFIDENCE_CEILING: f64 = 95.0;

/// `min(95, 70 + |last_close - previous_close| * 2)`
pub fn confidence(last_close: f64, previous_close: f64) -> f64 {
    confidence_from_delta(last_close - previous_close)
}

pub fn confidence_from_delta(delta: f64) -> f64 {
    (CONFIDENCE_FLOOR + delta.abs() * 2.0).min(CONFIDENCE_CEILING)
}
