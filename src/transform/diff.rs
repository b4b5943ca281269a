//! Differencing transforms.
//!
//! [`difference`] and [`seasonal_difference`] are the plain array operations.
//! [`Differencer`] remembers the values dropped by differencing so the
//! transform can be inverted.

use crate::error::{Result, StatsError};

/// Apply first-order differencing `d` times.
///
/// # Arguments
/// * `series` - The input series
/// * `d` - Differencing order (number of times to difference)
///
/// # Returns
/// The differenced series.
pub fn difference(series: &[f64], d: usize) -> Vec<f64> {
    if d == 0 || series.is_empty() {
        return series.to_vec();
    }

    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() <= 1 {
            break;
        }
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Apply seasonal differencing at lag `period`, `d` times.
///
/// # Arguments
/// * `series` - The input series
/// * `d` - Seasonal differencing order
/// * `period` - Seasonal period
///
/// # Returns
/// The seasonally differenced series.
pub fn seasonal_difference(series: &[f64], d: usize, period: usize) -> Vec<f64> {
    if d == 0 || period == 0 || series.len() <= period {
        return series.to_vec();
    }

    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() <= period {
            break;
        }
        result = result
            .iter()
            .skip(period)
            .zip(result.iter())
            .map(|(curr, prev)| curr - prev)
            .collect();
    }
    result
}

/// Invertible lag differencing.
///
/// # Example
/// ```
/// use tsstat::transform::Differencer;
///
/// let series = vec![1.0, 3.0, 6.0, 10.0, 15.0];
/// let (diffed, state) = Differencer::new(1).fit_transform(&series).unwrap();
/// assert_eq!(diffed, vec![2.0, 3.0, 4.0, 5.0]);
/// assert_eq!(state.inverse_transform(&diffed), series);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Differencer {
    lag: usize,
}

/// Values consumed by a [`Differencer`], needed to undo it.
#[derive(Debug, Clone, PartialEq)]
pub struct DifferencerState {
    lag: usize,
    head: Vec<f64>,
}

impl Default for Differencer {
    fn default() -> Self {
        Self { lag: 1 }
    }
}

impl Differencer {
    /// Create a differencer at the given lag (1 for ordinary differencing).
    pub fn new(lag: usize) -> Self {
        Self { lag }
    }

    /// Difference the series once, returning the result and the inversion state.
    pub fn fit_transform(&self, series: &[f64]) -> Result<(Vec<f64>, DifferencerState)> {
        if self.lag == 0 {
            return Err(StatsError::Configuration(
                "differencing lag must be positive".into(),
            ));
        }
        if series.len() <= self.lag {
            return Err(StatsError::InsufficientData {
                needed: self.lag + 1,
                got: series.len(),
            });
        }

        let diffed = seasonal_difference(series, 1, self.lag);
        let state = DifferencerState {
            lag: self.lag,
            head: series[..self.lag].to_vec(),
        };
        Ok((diffed, state))
    }

    /// Difference the series `times` times in a row.
    pub fn fit_transform_n(
        &self,
        series: &[f64],
        times: usize,
    ) -> Result<(Vec<f64>, Vec<DifferencerState>)> {
        let mut current = series.to_vec();
        let mut states = Vec::with_capacity(times);
        for _ in 0..times {
            let (next, state) = self.fit_transform(&current)?;
            current = next;
            states.push(state);
        }
        Ok((current, states))
    }
}

impl DifferencerState {
    /// Rebuild the undifferenced series from its differences.
    pub fn inverse_transform(&self, differenced: &[f64]) -> Vec<f64> {
        let mut restored = self.head.clone();
        restored.reserve(differenced.len());
        for (i, d) in differenced.iter().enumerate() {
            let prev = restored[i];
            restored.push(prev + d);
        }
        restored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difference_order_0() {
        let series = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = difference(&series, 0);
        assert_eq!(result, series);
    }

    #[test]
    fn difference_order_1() {
        let series = vec![1.0, 3.0, 6.0, 10.0, 15.0];
        let result = difference(&series, 1);
        assert_eq!(result, vec![2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn difference_order_2() {
        let series = vec![1.0, 3.0, 6.0, 10.0, 15.0];
        let result = difference(&series, 2);
        assert_eq!(result, vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn difference_empty() {
        let series: Vec<f64> = vec![];
        let result = difference(&series, 1);
        assert!(result.is_empty());
    }

    #[test]
    fn seasonal_difference_basic() {
        // Quarterly data: Q1 values increase by 10 each year
        let series = vec![
            100.0, 120.0, 80.0, 90.0, // Year 1
            110.0, 130.0, 90.0, 100.0, // Year 2
        ];
        let result = seasonal_difference(&series, 1, 4);
        assert_eq!(result, vec![10.0, 10.0, 10.0, 10.0]);
    }

    #[test]
    fn seasonal_difference_order_0() {
        let series = vec![1.0, 2.0, 3.0, 4.0];
        let result = seasonal_difference(&series, 0, 2);
        assert_eq!(result, series);
    }

    #[test]
    fn differencer_inverts_seasonal_lag() {
        let series = vec![5.0, 1.0, 7.0, 6.0, 3.0, 9.0, 8.0];
        let (diffed, state) = Differencer::new(3).fit_transform(&series).unwrap();

        assert_eq!(diffed, vec![1.0, 2.0, 2.0, 2.0]);
        assert_eq!(state.inverse_transform(&diffed), series);
    }

    #[test]
    fn differencer_repeated_matches_difference() {
        let series: Vec<f64> = (0..10).map(|i| (i * i) as f64).collect();
        let (diffed, states) = Differencer::default().fit_transform_n(&series, 2).unwrap();

        assert_eq!(diffed, difference(&series, 2));
        assert_eq!(states.len(), 2);

        let once = states[1].inverse_transform(&diffed);
        assert_eq!(states[0].inverse_transform(&once), series);
    }

    #[test]
    fn differencer_rejects_short_series() {
        let result = Differencer::new(4).fit_transform(&[1.0, 2.0, 3.0]);
        assert_eq!(
            result.unwrap_err(),
            StatsError::InsufficientData { needed: 5, got: 3 }
        );
    }

    #[test]
    fn differencer_rejects_zero_lag() {
        let result = Differencer::new(0).fit_transform(&[1.0, 2.0, 3.0]);
        assert!(matches!(result, Err(StatsError::Configuration(_))));
    }
}
