//! Ordinary Least Squares (OLS) regression with coefficient standard errors.
//!
//! Used by the unit-root tests for t-values and information criteria.

use crate::error::{Result, StatsError};

/// Fitted OLS regression.
#[derive(Debug, Clone)]
pub struct OLSResult {
    /// Regression coefficients, one per design column (intercept first if added).
    pub coefficients: Vec<f64>,
    /// Standard errors of the coefficients.
    pub std_errors: Vec<f64>,
    /// Residual sum of squares.
    pub rss: f64,
    /// Number of observations.
    pub nobs: usize,
}

impl OLSResult {
    /// Number of estimated parameters.
    pub fn num_params(&self) -> usize {
        self.coefficients.len()
    }

    /// t-values of the coefficients.
    pub fn t_values(&self) -> Vec<f64> {
        self.coefficients
            .iter()
            .zip(self.std_errors.iter())
            .map(|(b, se)| if *se > 0.0 { b / se } else { f64::NAN })
            .collect()
    }

    /// Gaussian log-likelihood at the maximum likelihood variance.
    pub fn log_likelihood(&self) -> f64 {
        let n = self.nobs as f64;
        -n / 2.0 * ((2.0 * std::f64::consts::PI).ln() + (self.rss / n).ln() + 1.0)
    }

    /// Akaike information criterion.
    pub fn aic(&self) -> f64 {
        -2.0 * self.log_likelihood() + 2.0 * self.num_params() as f64
    }
}

/// Fit `y = X @ beta` by least squares, `X` given as columns.
///
/// Solves the normal equations by Cholesky decomposition and derives the
/// coefficient covariance from the inverse of `X'X`.
pub fn ols_fit(y: &[f64], columns: &[Vec<f64>]) -> Result<OLSResult> {
    let n = y.len();
    let k = columns.len();

    if k == 0 {
        return Err(StatsError::Computation("no design columns".into()));
    }
    if n <= k {
        return Err(StatsError::InsufficientData {
            needed: k + 1,
            got: n,
        });
    }
    if let Some(bad) = columns.iter().find(|c| c.len() != n) {
        return Err(StatsError::Computation(format!(
            "design column has length {}, expected {}",
            bad.len(),
            n
        )));
    }

    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![0.0; k];

    for i in 0..k {
        for j in 0..=i {
            let s: f64 = columns[i]
                .iter()
                .zip(columns[j].iter())
                .map(|(a, b)| a * b)
                .sum();
            xtx[i][j] = s;
            xtx[j][i] = s;
        }
        xty[i] = columns[i].iter().zip(y).map(|(a, b)| a * b).sum();
    }

    let l = cholesky(&xtx).ok_or_else(|| {
        StatsError::Computation("OLS regression failed: matrix not positive definite".into())
    })?;
    let beta = cholesky_solve(&l, &xty);

    let mut rss = 0.0;
    for obs in 0..n {
        let fitted: f64 = (0..k).map(|j| beta[j] * columns[j][obs]).sum();
        rss += (y[obs] - fitted).powi(2);
    }

    let sigma_sq = rss / (n - k) as f64;
    let std_errors = (0..k)
        .map(|j| {
            let mut unit = vec![0.0; k];
            unit[j] = 1.0;
            let col = cholesky_solve(&l, &unit);
            (sigma_sq * col[j]).max(0.0).sqrt()
        })
        .collect();

    Ok(OLSResult {
        coefficients: beta,
        std_errors,
        rss,
        nobs: n,
    })
}

/// Cholesky decomposition `A = L @ L'` of a symmetric positive definite matrix.
fn cholesky(a: &[Vec<f64>]) -> Option<Vec<Vec<f64>>> {
    let n = a.len();
    let mut l = vec![vec![0.0; n]; n];

    // Pivots below this fraction of the diagonal are treated as singular.
    let scale = (0..n).map(|i| a[i][i].abs()).fold(0.0, f64::max);
    let tol = scale * 1e-12;

    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }

            if i == j {
                if sum <= tol {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }
    Some(l)
}

/// Solve `L @ L' @ x = b` given the Cholesky factor.
fn cholesky_solve(l: &[Vec<f64>], b: &[f64]) -> Vec<f64> {
    let n = b.len();

    // Forward substitution: L @ y = b
    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    // Backward substitution: L' @ x = y
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ols_fit_simple_linear() {
        // y = 2 + 3*x
        let y = vec![5.0, 8.0, 11.0, 14.0, 17.0];
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];

        let result = ols_fit(&y, &[vec![1.0; 5], x]).unwrap();

        assert_relative_eq!(result.coefficients[0], 2.0, epsilon = 1e-8);
        assert_relative_eq!(result.coefficients[1], 3.0, epsilon = 1e-8);
        assert!(result.rss < 1e-12);
    }

    #[test]
    fn ols_fit_multiple_regressors() {
        // y = 1 + 2*x1 + 3*x2
        let x1 = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let x2 = vec![0.5, 2.5, 1.0, 3.0, 1.5, 3.5, 2.0, 4.0];
        let y: Vec<f64> = x1
            .iter()
            .zip(x2.iter())
            .map(|(a, b)| 1.0 + 2.0 * a + 3.0 * b)
            .collect();

        let result = ols_fit(&y, &[vec![1.0; 8], x1, x2]).unwrap();

        assert_relative_eq!(result.coefficients[0], 1.0, epsilon = 1e-6);
        assert_relative_eq!(result.coefficients[1], 2.0, epsilon = 1e-6);
        assert_relative_eq!(result.coefficients[2], 3.0, epsilon = 1e-6);
    }

    #[test]
    fn ols_standard_errors_match_closed_form() {
        // Simple regression: se(slope) = sqrt(sigma^2 / Sxx)
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let y: Vec<f64> = x
            .iter()
            .enumerate()
            .map(|(i, xi)| 1.0 + 0.5 * xi + if i % 2 == 0 { 0.3 } else { -0.3 })
            .collect();

        let result = ols_fit(&y, &[vec![1.0; 10], x.clone()]).unwrap();

        let x_mean = x.iter().sum::<f64>() / 10.0;
        let sxx: f64 = x.iter().map(|v| (v - x_mean).powi(2)).sum();
        let sigma_sq = result.rss / 8.0;
        assert_relative_eq!(
            result.std_errors[1],
            (sigma_sq / sxx).sqrt(),
            epsilon = 1e-8
        );
        let t = result.t_values();
        assert_relative_eq!(t[1], result.coefficients[1] / result.std_errors[1]);
    }

    #[test]
    fn ols_fit_collinear_columns_fail() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let doubled: Vec<f64> = x.iter().map(|v| 2.0 * v).collect();
        let y = vec![1.0, 2.0, 2.5, 4.0, 5.5];

        let result = ols_fit(&y, &[x, doubled]);

        assert!(matches!(result, Err(StatsError::Computation(_))));
    }

    #[test]
    fn ols_fit_too_few_observations() {
        let result = ols_fit(&[1.0, 2.0], &[vec![1.0, 1.0], vec![0.0, 1.0]]);
        assert_eq!(result.unwrap_err(), StatsError::InsufficientData { needed: 3, got: 2 });
    }

    #[test]
    fn aic_prefers_better_fit() {
        let x: Vec<f64> = (0..30).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v + (v * 1.7).sin() * 0.1).collect();

        let good = ols_fit(&y, &[vec![1.0; 30], x.clone()]).unwrap();
        let bad = ols_fit(&y, &[vec![1.0; 30]]).unwrap();

        assert!(good.aic() < bad.aic());
    }
}
