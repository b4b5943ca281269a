//! Stationarity tests for time series.
//!
//! Provides the KPSS level-stationarity test and the augmented Dickey-Fuller
//! unit-root test. Both report a p-value interpolated from tabulated
//! critical values, clamped to the range of the table.

use crate::utils::ols::ols_fit;

/// Result of a stationarity test.
#[derive(Debug, Clone)]
pub struct StationarityResult {
    /// Test statistic
    pub statistic: f64,
    /// P-value (interpolated)
    pub p_value: f64,
    /// Number of lags used
    pub lags: usize,
    /// Whether series appears stationary at the 5% level
    pub is_stationary: bool,
    /// Critical values at common significance levels
    pub critical_values: CriticalValues,
}

impl StationarityResult {
    fn undefined(lags: usize) -> Self {
        Self {
            statistic: f64::NAN,
            p_value: f64::NAN,
            lags,
            is_stationary: false,
            critical_values: CriticalValues::default(),
        }
    }
}

/// Critical values for stationarity tests.
#[derive(Debug, Clone, Default)]
pub struct CriticalValues {
    /// Critical value at 1% significance
    pub cv_1pct: f64,
    /// Critical value at 5% significance
    pub cv_5pct: f64,
    /// Critical value at 10% significance
    pub cv_10pct: f64,
}

/// KPSS level-stationarity critical values and their p-values.
const KPSS_TABLE: [f64; 4] = [0.347, 0.463, 0.574, 0.739];
const KPSS_TABLE_P: [f64; 4] = [0.10, 0.05, 0.025, 0.01];

/// Asymptotic Dickey-Fuller quantiles for a regression with constant.
const ADF_TABLE: [f64; 8] = [-3.43, -3.12, -2.86, -2.57, -0.44, -0.07, 0.23, 0.60];
const ADF_TABLE_P: [f64; 8] = [0.01, 0.025, 0.05, 0.10, 0.90, 0.95, 0.975, 0.99];

/// Piecewise-linear interpolation of `p` at `x`, clamped at both ends.
///
/// `xs` must be sorted ascending.
fn interpolate_clamped(x: f64, xs: &[f64], ps: &[f64]) -> f64 {
    if x.is_nan() || xs.is_empty() {
        return f64::NAN;
    }
    if x <= xs[0] {
        return ps[0];
    }
    let last = xs.len() - 1;
    if x >= xs[last] {
        return ps[last];
    }
    let i = xs.windows(2).position(|w| x >= w[0] && x <= w[1]).unwrap_or(last - 1);
    let t = (x - xs[i]) / (xs[i + 1] - xs[i]);
    ps[i] + t * (ps[i + 1] - ps[i])
}

/// Augmented Dickey-Fuller test for unit root (non-stationarity).
///
/// Tests null hypothesis that series has a unit root (non-stationary).
/// Rejection implies stationarity. Fits
/// `Δy_t = α + β*y_{t-1} + Σγ_i*Δy_{t-i} + ε_t` and picks the number of
/// augmentation lags by AIC over a common estimation sample.
///
/// # Arguments
/// * `series` - Time series data
/// * `max_lags` - Maximum lags to include (default: (n-1)^(1/3))
///
/// # Returns
/// `StationarityResult` with test statistic and p-value
pub fn adf_test(series: &[f64], max_lags: Option<usize>) -> StationarityResult {
    let n = series.len();

    if n < 6 {
        return StationarityResult::undefined(0);
    }

    // Default lag selection: (n-1)^(1/3)
    let max_lags = max_lags.unwrap_or_else(|| ((n - 1) as f64).powf(1.0 / 3.0).floor() as usize);
    let max_lags = max_lags.min((n - 4) / 2);

    let diff: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();

    // Rows t = max_lags..diff.len() share one sample for every lag order
    let rows: Vec<usize> = (max_lags..diff.len()).collect();
    let y: Vec<f64> = rows.iter().map(|&t| diff[t]).collect();

    let design = |lag: usize| -> Vec<Vec<f64>> {
        let mut columns = vec![vec![1.0; rows.len()], rows.iter().map(|&t| series[t]).collect()];
        for i in 1..=lag {
            columns.push(rows.iter().map(|&t| diff[t - i]).collect());
        }
        columns
    };

    let best_lag = (0..=max_lags)
        .filter_map(|lag| ols_fit(&y, &design(lag)).ok().map(|fit| (lag, fit.aic())))
        .filter(|(_, aic)| aic.is_finite())
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(lag, _)| lag);

    let Some(best_lag) = best_lag else {
        return StationarityResult::undefined(max_lags);
    };

    let fit = match ols_fit(&y, &design(best_lag)) {
        Ok(fit) => fit,
        Err(_) => return StationarityResult::undefined(best_lag),
    };

    let se = fit.std_errors[1];
    if se == 0.0 || se.is_nan() {
        return StationarityResult::undefined(best_lag);
    }

    let t_stat = fit.coefficients[1] / se;

    let critical_values = CriticalValues {
        cv_1pct: -3.43,
        cv_5pct: -2.86,
        cv_10pct: -2.57,
    };

    let p_value = interpolate_clamped(t_stat, &ADF_TABLE, &ADF_TABLE_P);

    // Series is stationary if we reject null (t_stat < critical value)
    let is_stationary = t_stat < critical_values.cv_5pct;

    StationarityResult {
        statistic: t_stat,
        p_value,
        lags: best_lag,
        is_stationary,
        critical_values,
    }
}

/// KPSS test for level stationarity.
///
/// Tests null hypothesis that series is level stationary.
/// Rejection implies non-stationarity.
///
/// # Arguments
/// * `series` - Time series data
/// * `lags` - Newey-West truncation lag (default: trunc(3*sqrt(n)/13))
///
/// # Returns
/// `StationarityResult` with test statistic and p-value
pub fn kpss_test(series: &[f64], lags: Option<usize>) -> StationarityResult {
    let n = series.len();

    if n < 4 {
        return StationarityResult::undefined(0);
    }

    let lags = lags.unwrap_or_else(|| (3.0 * (n as f64).sqrt() / 13.0).floor() as usize);
    let lags = lags.min(n - 1);

    // Demean the series (level stationarity)
    let mean: f64 = series.iter().sum::<f64>() / n as f64;
    let residuals: Vec<f64> = series.iter().map(|&x| x - mean).collect();

    // Sum of squared partial sums
    let mut cumsum = 0.0;
    let mut eta = 0.0;
    for r in &residuals {
        cumsum += r;
        eta += cumsum * cumsum;
    }
    let eta = eta / (n * n) as f64;

    // Long-run variance with Bartlett weights
    let mut variance = residuals.iter().map(|&r| r * r).sum::<f64>() / n as f64;

    for j in 1..=lags {
        let weight = 1.0 - j as f64 / (lags + 1) as f64;
        let autocovar: f64 = residuals
            .iter()
            .skip(j)
            .zip(residuals.iter())
            .map(|(&a, &b)| a * b)
            .sum::<f64>()
            / n as f64;
        variance += 2.0 * weight * autocovar;
    }

    if variance <= 0.0 {
        return StationarityResult {
            is_stationary: true,
            ..StationarityResult::undefined(lags)
        };
    }

    let stat = eta / variance;

    let critical_values = CriticalValues {
        cv_1pct: 0.739,
        cv_5pct: 0.463,
        cv_10pct: 0.347,
    };

    let p_value = interpolate_clamped(stat, &KPSS_TABLE, &KPSS_TABLE_P);

    // Series is stationary if we fail to reject null (stat < critical value)
    let is_stationary = stat < critical_values.cv_5pct;

    StationarityResult {
        statistic: stat,
        p_value,
        lags,
        is_stationary,
        critical_values,
    }
}
