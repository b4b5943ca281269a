//! Osborn-Chui-Smith-Birchenhall (OCSB) seasonal unit-root test.
//!
//! Regresses `Δ₁Δₘ x_t` on its own lags, `Δₘ x_{t-1}` and `Δ₁ x_{t-m}`.
//! The t-value of the last regressor is compared with a critical value
//! taken from a response surface in `ln(m)`. A statistic above the critical
//! value means the seasonal unit root is not rejected and the series should
//! be seasonally differenced.

use crate::error::{Result, StatsError};
use crate::utils::ols::{ols_fit, OLSResult};
use tracing::debug;

/// Configuration for the OCSB test.
#[derive(Debug, Clone, PartialEq)]
pub struct OcsbConfig {
    /// Largest autoregressive lag of `Δ₁Δₘ x` tried; the order is picked by AIC.
    pub max_lag: usize,
}

impl Default for OcsbConfig {
    fn default() -> Self {
        Self { max_lag: 3 }
    }
}

impl OcsbConfig {
    /// Set the largest autoregressive lag.
    pub fn with_max_lag(mut self, max_lag: usize) -> Self {
        self.max_lag = max_lag;
        self
    }
}

/// Outcome of the OCSB test.
#[derive(Debug, Clone)]
pub struct OcsbResult {
    /// t-value of the `Δ₁ x_{t-m}` coefficient.
    pub statistic: f64,
    /// 5% critical value for the seasonal period.
    pub critical_value: f64,
    /// Autoregressive lag order selected by AIC.
    pub lag: usize,
    /// Whether a seasonal difference is indicated.
    pub should_difference: bool,
}

/// 5% critical value of the OCSB statistic for seasonal period `m`.
pub fn ocsb_critical_value(m: usize) -> f64 {
    let log_m = (m as f64).ln() - 0.7656451;
    -0.2937411 * (-0.2850853 * log_m - 0.05983644 * log_m * log_m).exp() - 1.652202
}

/// Minimum series length for the test at period `m` with `max_lag` AR lags.
fn required_length(m: usize, max_lag: usize) -> usize {
    (2 * m + max_lag + 2).max(m + 2 * max_lag + 6)
}

/// Run the OCSB test on `series` at seasonal period `m`.
///
/// # Errors
/// * `Configuration` if `m < 2`
/// * `InsufficientData` if the series is too short for the regression
/// * `SeasonalDifferencingTest` if no lag order yields a usable regression
pub fn ocsb_test(series: &[f64], m: usize, config: &OcsbConfig) -> Result<OcsbResult> {
    if m < 2 {
        return Err(StatsError::Configuration(format!(
            "seasonal period must be at least 2 for the OCSB test, got {m}"
        )));
    }

    let n = series.len();
    let needed = required_length(m, config.max_lag);
    if n < needed {
        return Err(StatsError::InsufficientData { needed, got: n });
    }

    // Δm x, indexed by series time t >= m
    let seasonal_diff = |t: usize| series[t] - series[t - m];
    // Δ1 Δm x, indexed by t >= m + 1
    let w = |t: usize| seasonal_diff(t) - seasonal_diff(t - 1);

    let start = m + 1 + config.max_lag;
    let rows: Vec<usize> = (start..n).collect();
    let y: Vec<f64> = rows.iter().map(|&t| w(t)).collect();

    let design = |lag: usize| -> Vec<Vec<f64>> {
        let mut columns: Vec<Vec<f64>> = (1..=lag)
            .map(|i| rows.iter().map(|&t| w(t - i)).collect())
            .collect();
        columns.push(rows.iter().map(|&t| seasonal_diff(t - 1)).collect());
        columns.push(rows.iter().map(|&t| series[t - m] - series[t - m - 1]).collect());
        columns
    };

    let mut best: Option<(usize, OLSResult)> = None;
    for lag in 0..=config.max_lag {
        let fit = match ols_fit(&y, &design(lag)) {
            Ok(fit) => fit,
            Err(e) => {
                debug!(lag, error = %e, "OCSB regression skipped");
                continue;
            }
        };
        let aic = fit.aic();
        if !aic.is_finite() {
            continue;
        }
        if best.as_ref().map_or(true, |(_, b)| aic < b.aic()) {
            best = Some((lag, fit));
        }
    }

    let (lag, fit) = best.ok_or_else(|| {
        StatsError::SeasonalDifferencingTest(format!(
            "OCSB regression could not be fitted at period {m}"
        ))
    })?;

    let statistic = fit.t_values().last().copied().unwrap_or(f64::NAN);
    if !statistic.is_finite() {
        return Err(StatsError::SeasonalDifferencingTest(format!(
            "OCSB statistic is not finite at period {m}"
        )));
    }

    let critical_value = ocsb_critical_value(m);
    let should_difference = statistic > critical_value;

    debug!(m, lag, statistic, critical_value, should_difference, "OCSB test");

    Ok(OcsbResult {
        statistic,
        critical_value,
        lag,
        should_difference,
    })
}
