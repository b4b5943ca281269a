//! Autocorrelation-based seasonal period estimation.
//!
//! [`SeasonalityAcf`] computes the sample autocorrelation function together
//! with Bartlett confidence bounds and reports every candidate lag whose lower
//! bound is above zero, ranked by autocorrelation strength.

use crate::error::{Result, StatsError};
use crate::utils::stats::quantile_normal;
use rustfft::{num_complex::Complex64, FftPlanner};
use tracing::{debug, warn};

/// Critical value used by [`acf_seasonality_test`] (90% two-sided).
const SEASONALITY_TEST_TCRIT: f64 = 1.645;

/// Sample autocorrelation function up to `nlags`, computed through the FFT.
///
/// Uses the biased autocovariance estimator (divides by `n` at every lag).
/// A series whose values differ only by rounding error has an
/// autocorrelation of 1 at lag 0 and 0 elsewhere.
pub fn acf(series: &[f64], nlags: usize) -> Vec<f64> {
    let n = series.len();
    if n == 0 {
        return Vec::new();
    }
    let nlags = nlags.min(n - 1);

    let mean = series.iter().sum::<f64>() / n as f64;

    // Deviations within the rounding error of the mean count as no variation
    let max_abs = series.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()));
    let spread = series.iter().fold(0.0_f64, |acc, x| acc.max((x - mean).abs()));
    if spread <= n as f64 * f64::EPSILON * max_abs {
        let mut flat = vec![0.0; nlags + 1];
        flat[0] = 1.0;
        return flat;
    }

    let padded_len = (2 * n).next_power_of_two();

    let mut buffer: Vec<Complex64> = series
        .iter()
        .map(|&x| Complex64::new(x - mean, 0.0))
        .chain(std::iter::repeat(Complex64::new(0.0, 0.0)))
        .take(padded_len)
        .collect();

    let mut planner = FftPlanner::new();
    planner.plan_fft_forward(padded_len).process(&mut buffer);
    for c in buffer.iter_mut() {
        *c = Complex64::new(c.norm_sqr(), 0.0);
    }
    planner.plan_fft_inverse(padded_len).process(&mut buffer);

    // rustfft leaves the inverse unnormalized
    let acov: Vec<f64> = buffer
        .iter()
        .take(nlags + 1)
        .map(|c| c.re / padded_len as f64 / n as f64)
        .collect();

    let acov0 = acov[0];
    acov.iter().map(|c| c / acov0).collect()
}

/// Bartlett standard errors of the autocorrelations.
///
/// `se[0] = 0`, `se[1] = 1/sqrt(n)` and
/// `se[k] = sqrt((1 + 2 * sum_{j<k} acf[j]^2) / n)` for `k >= 2`.
pub fn bartlett_std_errors(acf: &[f64], n: usize) -> Vec<f64> {
    let mut se = Vec::with_capacity(acf.len());
    let mut cumulative = 0.0;
    for k in 0..acf.len() {
        if k == 0 {
            se.push(0.0);
            continue;
        }
        if k >= 2 {
            cumulative += acf[k - 1].powi(2);
        }
        se.push(((1.0 + 2.0 * cumulative) / n as f64).sqrt());
    }
    se
}

/// ACF seasonal period estimator.
#[derive(Debug, Clone)]
pub struct SeasonalityAcf {
    /// Number of lags to compute.
    pub nlags: usize,
    /// Candidate periods; `None` means every lag from 2 to `nlags`.
    pub candidate_sp: Option<Vec<usize>>,
    /// Significance level of the confidence bounds.
    pub alpha: f64,
}

impl SeasonalityAcf {
    /// Create an estimator over the given number of lags.
    pub fn new(nlags: usize) -> Self {
        Self {
            nlags,
            candidate_sp: None,
            alpha: 0.05,
        }
    }

    /// Restrict the candidate periods.
    pub fn with_candidates(mut self, candidates: Vec<usize>) -> Self {
        self.candidate_sp = Some(candidates);
        self
    }

    /// Set the significance level.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Fit the estimator to a (stationary) series.
    ///
    /// # Errors
    /// * `InsufficientData` if the series has fewer than 3 observations
    /// * `EstimatorFitting` if `nlags` does not fit the series or the
    ///   autocorrelations are not finite
    pub fn fit(&self, series: &[f64]) -> Result<AcfFit> {
        let n = series.len();
        if n < 3 {
            return Err(StatsError::InsufficientData { needed: 3, got: n });
        }
        if self.nlags >= n {
            return Err(StatsError::EstimatorFitting(format!(
                "nlags ({}) must be smaller than the number of observations ({n})",
                self.nlags
            )));
        }
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(StatsError::Configuration(format!(
                "alpha must lie in (0, 1), got {}",
                self.alpha
            )));
        }

        let acf_values = acf(series, self.nlags);
        if acf_values.iter().any(|v| !v.is_finite()) {
            return Err(StatsError::EstimatorFitting(
                "autocorrelation function is not finite".into(),
            ));
        }

        let z = quantile_normal(1.0 - self.alpha / 2.0);
        let confint: Vec<(f64, f64)> = bartlett_std_errors(&acf_values, n)
            .iter()
            .zip(acf_values.iter())
            .map(|(se, a)| (a - z * se, a + z * se))
            .collect();

        let candidates: Vec<usize> = match &self.candidate_sp {
            Some(list) => list
                .iter()
                .copied()
                .filter(|&sp| sp >= 1 && sp <= self.nlags)
                .collect(),
            None => (2..=self.nlags).collect(),
        };

        let mut significant: Vec<(usize, f64)> = candidates
            .iter()
            .filter(|&&sp| confint[sp].0 > 0.0)
            .map(|&sp| (sp, acf_values[sp]))
            .collect();
        // Stable sort keeps shorter lags first on ties
        significant.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let sp_significant: Vec<usize> = significant.iter().map(|(sp, _)| *sp).collect();
        let sp = sp_significant.first().copied().unwrap_or(1);

        debug!(
            nlags = self.nlags,
            candidates = candidates.len(),
            significant = sp_significant.len(),
            sp,
            "ACF seasonality estimator fitted"
        );

        Ok(AcfFit {
            sp,
            sp_significant,
            acf: acf_values,
            confint,
        })
    }
}

/// Fitted parameters of [`SeasonalityAcf`].
#[derive(Debug, Clone)]
pub struct AcfFit {
    sp: usize,
    sp_significant: Vec<usize>,
    acf: Vec<f64>,
    confint: Vec<(f64, f64)>,
}

impl AcfFit {
    /// Most significant period, or 1 if none is significant.
    pub fn sp(&self) -> usize {
        self.sp
    }

    /// Significant periods, strongest autocorrelation first.
    pub fn sp_significant(&self) -> &[usize] {
        &self.sp_significant
    }

    /// Autocorrelations from lag 0 to `nlags`.
    pub fn acf(&self) -> &[f64] {
        &self.acf
    }

    /// Confidence interval for each lag.
    pub fn confint(&self) -> &[(f64, f64)] {
        &self.confint
    }
}

/// Test a single seasonal period for significant autocorrelation.
///
/// Returns `false` for `sp <= 1` and for series shorter than three periods.
pub fn acf_seasonality_test(series: &[f64], sp: usize) -> bool {
    let n = series.len();
    if sp <= 1 {
        return false;
    }
    if n < 3 * sp {
        warn!(n, sp, "series too short for seasonality test, at least 3 periods needed");
        return false;
    }

    let coefs = acf(series, sp);
    let limit = SEASONALITY_TEST_TCRIT / (n as f64).sqrt()
        * (1.0 + 2.0 * coefs[1..sp].iter().map(|c| c * c).sum::<f64>()).sqrt();

    coefs[sp].abs() > limit
}
