//! Linear trend forecast of the next close.
//!
//! Close is regressed on a synthetic day index 0..n-1 by ordinary least
//! squares with intercept, and the fitted line is evaluated at index n+1.
//! The index ignores weekends and holidays.

use crate::domain::error::TrendError;

/// Fitted `close = slope * day_index + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendModel {
    pub slope: f64,
    pub intercept: f64,
}

impl TrendModel {
    /// Fits the model over `closes`, using position as the day index.
    ///
    /// With a single observation the day index has zero variance; the slope is
    /// then 0 and the intercept is the mean close.
    pub fn fit(closes: &[f64]) -> Result<Self, TrendError> {
        if closes.is_empty() {
            return Err(TrendError::EmptySeries);
        }
        if let Some(index) = closes.iter().position(|c| !c.is_finite()) {
            return Err(TrendError::NonFinite { index });
        }

        let n = closes.len() as f64;
        let mean_x = (n - 1.0) / 2.0;
        let mean_y = closes.iter().sum::<f64>() / n;

        let mut sxx = 0.0;
        let mut sxy = 0.0;
        for (i, &y) in closes.iter().enumerate() {
            let dx = i as f64 - mean_x;
            sxx += dx * dx;
            sxy += dx * (y - mean_y);
        }

        let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };
        Ok(Self {
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }

    pub fn predict(&self, day_index: f64) -> f64 {
        self.slope * day_index + self.intercept
    }
}

/// Day index the forecast is evaluated at for a series of `len` closes.
///
/// This is `len + 1`, one step past the index right after the last
/// observation.
pub fn forecast_day_index(len: usize) -> usize {
    len + 1
}

/// Predicted next close, rounded to cents.
pub fn predict_next_close(closes: &[f64]) -> Result<f64, TrendError> {
    let model = TrendModel::fit(closes)?;
    Ok(round_cents(model.predict(forecast_day_index(closes.len()) as f64)))
}

/// Rounds to two decimals, ties to even on the scaled value.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn empty_input_is_an_error() {
        assert_eq!(predict_next_close(&[]), Err(TrendError::EmptySeries));
    }

    #[test]
    fn non_finite_close_is_an_error() {
        assert_eq!(
            TrendModel::fit(&[1.0, f64::NAN, 3.0]),
            Err(TrendError::NonFinite { index: 1 })
        );
    }

    #[test]
    fn single_observation_returns_that_close() {
        let model = TrendModel::fit(&[123.456]).unwrap();
        assert_eq!(model.slope, 0.0);
        assert_eq!(predict_next_close(&[123.456]).unwrap(), 123.46);
    }

    #[test]
    fn constant_closes_predict_the_constant() {
        assert_eq!(predict_next_close(&[42.5; 10]).unwrap(), 42.5);
    }

    #[test]
    fn horizon_skips_index_n() {
        // closes = 10 + 2i for i in 0..5; index 6 -> 22
        let closes = [10.0, 12.0, 14.0, 16.0, 18.0];
        assert_eq!(forecast_day_index(closes.len()), 6);
        assert_eq!(predict_next_close(&closes).unwrap(), 22.0);
    }

    #[test]
    fn fit_matches_hand_computed_least_squares() {
        // x = 0,1,2,3; y = 1,3,2,5 -> slope 1.1, intercept 1.1
        let model = TrendModel::fit(&[1.0, 3.0, 2.0, 5.0]).unwrap();
        assert_abs_diff_eq!(model.slope, 1.1, epsilon = 1e-12);
        assert_abs_diff_eq!(model.intercept, 1.1, epsilon = 1e-12);
        // 1.1 * 5 + 1.1 = 6.6
        assert_eq!(predict_next_close(&[1.0, 3.0, 2.0, 5.0]).unwrap(), 6.6);
    }

    #[test]
    fn round_cents_ties_to_even() {
        assert_eq!(round_cents(0.125), 0.12);
        assert_eq!(round_cents(0.375), 0.38);
        assert_eq!(round_cents(-1.234), -1.23);
    }

    proptest! {
        #[test]
        fn recovers_exactly_linear_data(
            m in -50i32..50,
            c in 1i32..1000,
            n in 2usize..300,
        ) {
            let (m, c) = (m as f64 / 4.0, c as f64);
            let closes: Vec<f64> = (0..n).map(|i| m * i as f64 + c).collect();
            let expected = round_cents(m * (n + 1) as f64 + c);
            let got = predict_next_close(&closes).unwrap();
            prop_assert!((got - expected).abs() < 1e-6, "got {got}, expected {expected}");
        }
    }
}
