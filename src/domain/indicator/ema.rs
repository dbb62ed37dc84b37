//! Exponential Moving Average.
//!
//! k = 2/(n+1), seed with the first close, then EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//! No warmup: every bar has a value.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

pub fn smoothing_factor(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

pub fn calculate_ema(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    if period == 0 || bars.is_empty() {
        return IndicatorSeries {
            indicator_type: IndicatorType::Ema(period),
            values: Vec::new(),
        };
    }

    let mut values = Vec::with_capacity(bars.len());
    let k = smoothing_factor(period);
    let mut ema = bars[0].close;

    for (i, bar) in bars.iter().enumerate() {
        if i > 0 {
            ema = bar.close * k + ema * (1.0 - k);
        }
        values.push(IndicatorPoint {
            date: bar.date,
            valid: true,
            value: ema,
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Ema(period),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bars(prices: &[f64]) -> Vec<OhlcvBar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                date: NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32).unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect()
    }

    #[test]
    fn ema_seed_is_first_close() {
        let series = calculate_ema(&make_bars(&[10.0, 20.0, 30.0]), 3);
        assert!(series.values.iter().all(|p| p.valid));
        assert_eq!(series.value_at(0), Some(10.0));
    }

    #[test]
    fn ema_recursive_calculation() {
        let series = calculate_ema(&make_bars(&[10.0, 20.0, 30.0, 40.0]), 3);
        let k = 2.0 / 4.0;

        let ema_1 = 20.0 * k + 10.0 * (1.0 - k);
        let ema_2 = 30.0 * k + ema_1 * (1.0 - k);
        let ema_3 = 40.0 * k + ema_2 * (1.0 - k);

        assert!((series.values[1].value - ema_1).abs() < f64::EPSILON);
        assert!((series.values[2].value - ema_2).abs() < f64::EPSILON);
        assert!((series.values[3].value - ema_3).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_equal_prices() {
        let series = calculate_ema(&make_bars(&[100.0; 5]), 20);
        for p in &series.values {
            assert!((p.value - 100.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn ema_indicator_type() {
        let series = calculate_ema(&make_bars(&[10.0, 20.0, 30.0]), 20);
        assert_eq!(series.indicator_type, IndicatorType::Ema(20));
    }

    #[test]
    fn ema_empty_bars() {
        let series = calculate_ema(&[], 20);
        assert!(series.values.is_empty());
    }

    #[test]
    fn ema_period_0() {
        let series = calculate_ema(&make_bars(&[10.0, 20.0]), 0);
        assert!(series.values.is_empty());
    }

    #[test]
    fn ema_smoothing_factor_for_span_20() {
        assert!((smoothing_factor(20) - 2.0 / 21.0).abs() < f64::EPSILON);
    }
}
