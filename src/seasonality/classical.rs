//! Classical moving-average seasonal decomposition.
//!
//! The trend is a centred moving average over one full period (a `2 x m`
//! average for even periods), so the first and last half-window of the trend
//! and residual are undefined and reported as NaN. The seasonal component is
//! the per-position mean of the detrended series, normalised to sum to zero
//! (additive) or average one (multiplicative).

use crate::error::{Result, StatsError};
use crate::utils::stats::{nan_mean, nan_population_variance};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the seasonal component combines with trend and residual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecompositionModel {
    /// `y = trend + seasonal + resid`
    Additive,
    /// `y = trend * seasonal * resid`
    Multiplicative,
}

impl DecompositionModel {
    fn combine(self, a: f64, b: f64) -> f64 {
        match self {
            Self::Additive => a + b,
            Self::Multiplicative => a * b,
        }
    }

    fn remove(self, a: f64, b: f64) -> f64 {
        match self {
            Self::Additive => a - b,
            Self::Multiplicative => a / b,
        }
    }
}

impl fmt::Display for DecompositionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Additive => write!(f, "additive"),
            Self::Multiplicative => write!(f, "multiplicative"),
        }
    }
}

impl FromStr for DecompositionModel {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "additive" | "add" => Ok(Self::Additive),
            "multiplicative" | "mul" | "mult" => Ok(Self::Multiplicative),
            other => Err(StatsError::Configuration(format!(
                "unknown decomposition model '{other}'"
            ))),
        }
    }
}

/// Result of a classical decomposition.
#[derive(Debug, Clone)]
pub struct ClassicalDecomposition {
    /// Model used.
    pub model: DecompositionModel,
    /// Seasonal period.
    pub period: usize,
    /// Trend component (NaN at the edges).
    pub trend: Vec<f64>,
    /// Seasonal component.
    pub seasonal: Vec<f64>,
    /// Residual component (NaN at the edges).
    pub resid: Vec<f64>,
}

impl ClassicalDecomposition {
    /// Seasonal strength `max(1 - Var(resid) / Var(resid (+|*) seasonal), 0)`.
    ///
    /// The residual is combined with the seasonal component by the same
    /// operation the model uses. Undefined edge positions are ignored.
    pub fn seasonal_strength(&self) -> f64 {
        let combined: Vec<f64> = self
            .resid
            .iter()
            .zip(self.seasonal.iter())
            .map(|(r, s)| self.model.combine(*r, *s))
            .collect();

        let var_r = nan_population_variance(&self.resid);
        let var_rs = nan_population_variance(&combined);

        if !var_rs.is_finite() || var_rs <= 0.0 || !var_r.is_finite() {
            return 0.0;
        }

        (1.0 - var_r / var_rs).max(0.0)
    }
}

/// Decompose a series at the given period.
///
/// # Errors
/// * `Configuration` if `period < 2`
/// * `InsufficientData` if the series holds fewer than two full periods
/// * `InvalidInput` for a multiplicative decomposition of non-positive data
pub fn decompose(
    series: &[f64],
    period: usize,
    model: DecompositionModel,
) -> Result<ClassicalDecomposition> {
    let n = series.len();

    if period < 2 {
        return Err(StatsError::Configuration(format!(
            "decomposition period must be at least 2, got {period}"
        )));
    }
    if n < 2 * period {
        return Err(StatsError::InsufficientData {
            needed: 2 * period,
            got: n,
        });
    }
    if model == DecompositionModel::Multiplicative && series.iter().any(|&v| v <= 0.0) {
        return Err(StatsError::InvalidInput(
            "multiplicative decomposition requires strictly positive values".into(),
        ));
    }

    let trend = centered_moving_average(series, period);

    let detrended: Vec<f64> = series
        .iter()
        .zip(trend.iter())
        .map(|(y, t)| model.remove(*y, *t))
        .collect();

    let mut period_averages: Vec<f64> = (0..period)
        .map(|i| {
            let column: Vec<f64> = detrended.iter().skip(i).step_by(period).copied().collect();
            nan_mean(&column)
        })
        .collect();

    let center = nan_mean(&period_averages);
    for avg in period_averages.iter_mut() {
        *avg = model.remove(*avg, center);
    }

    let seasonal: Vec<f64> = (0..n).map(|i| period_averages[i % period]).collect();

    let resid: Vec<f64> = detrended
        .iter()
        .zip(seasonal.iter())
        .map(|(d, s)| model.remove(*d, *s))
        .collect();

    Ok(ClassicalDecomposition {
        model,
        period,
        trend,
        seasonal,
        resid,
    })
}

/// Centred moving average spanning one period; NaN where the window does not fit.
fn centered_moving_average(series: &[f64], period: usize) -> Vec<f64> {
    let n = series.len();
    let weights: Vec<f64> = if period % 2 == 0 {
        let mut w = vec![1.0 / period as f64; period + 1];
        w[0] = 0.5 / period as f64;
        w[period] = 0.5 / period as f64;
        w
    } else {
        vec![1.0 / period as f64; period]
    };

    let half = weights.len() / 2;
    let mut trend = vec![f64::NAN; n];
    for t in half..n.saturating_sub(half) {
        trend[t] = weights
            .iter()
            .enumerate()
            .map(|(k, w)| w * series[t + k - half])
            .sum();
    }
    trend
}
